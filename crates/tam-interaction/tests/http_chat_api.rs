use serde_json::json;
use tam_core::TamError;
use tam_core::chat::{ChatApi, ChatRequest};
use tam_core::config::ClientConfig;
use tam_core::patient::{PatientId, PatientProfile};
use tam_core::session::SessionId;
use tam_interaction::HttpChatApi;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> HttpChatApi {
    let config = ClientConfig {
        endpoint: server.uri(),
        ..Default::default()
    };
    HttpChatApi::new(&config)
}

fn request(patient_id: Option<&str>) -> ChatRequest {
    ChatRequest {
        message: "I have a fever".to_string(),
        session_id: SessionId::from_raw("chat_1700000000000_abc123xyz"),
        patient_data: PatientProfile::new("Maria", "Santos"),
        patient_id: patient_id.map(PatientId::new),
    }
}

#[tokio::test]
async fn test_send_message_posts_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "message": "I have a fever",
            "session_id": "chat_1700000000000_abc123xyz",
            "patient_data": {"firstName": "Maria", "lastName": "Santos"},
            "patient_id": "42"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "How long have you had it?",
            "session_id": "chat_1700000000000_abc123xyz"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .send_message(&request(Some("42")))
        .await
        .expect("chat should succeed");

    assert_eq!(response.reply.as_deref(), Some("How long have you had it?"));
    assert!(!response.is_emergency);
}

#[tokio::test]
async fn test_send_message_reads_emergency_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Please call 911 now.",
            "is_emergency": true
        })))
        .mount(&server)
        .await;

    let response = api_for(&server).send_message(&request(None)).await.unwrap();
    assert!(response.is_emergency);
}

#[tokio::test]
async fn test_missing_reply_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let response = api_for(&server).send_message(&request(None)).await.unwrap();
    assert!(response.reply.is_none());
}

#[tokio::test]
async fn test_non_json_body_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .send_message(&request(None))
        .await
        .unwrap_err();
    assert!(err.is_serialization());
}

#[tokio::test]
async fn test_server_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .send_message(&request(None))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TamError::Http {
            status: 500,
            message: "boom".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let config = ClientConfig {
        // Port 9 (discard) on localhost is closed in test environments.
        endpoint: "http://127.0.0.1:9".to_string(),
        ..Default::default()
    };

    let err = HttpChatApi::new(&config)
        .send_message(&request(None))
        .await
        .unwrap_err();
    assert!(matches!(err, TamError::Network(_)));
}

#[tokio::test]
async fn test_end_session_posts_old_session_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/new-chat"))
        .and(body_json(json!({"session_id": "chat_1_old"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "New chat started",
            "session_id": "chat_1_old"
        })))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server)
        .end_session(&SessionId::from_raw("chat_1_old"))
        .await
        .expect("new-chat should succeed");
}

#[tokio::test]
async fn test_end_session_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/new-chat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .end_session(&SessionId::from_raw("chat_1_old"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}
