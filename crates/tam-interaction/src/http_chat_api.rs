//! HttpChatApi - reqwest implementation of the chat endpoint.
//!
//! Talks to `POST {endpoint}/chat` and `POST {endpoint}/new-chat`. One
//! request per call; the transport's default timeout is the only timeout.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use tam_core::TamError;
use tam_core::chat::{ChatApi, ChatRequest, ChatResponse, NewChatRequest};
use tam_core::config::ClientConfig;
use tam_core::error::Result;
use tam_core::session::SessionId;

/// [`ChatApi`] over HTTP with JSON bodies.
#[derive(Clone)]
pub struct HttpChatApi {
    client: Client,
    chat_url: String,
    new_chat_url: String,
}

impl HttpChatApi {
    /// Creates a client for the endpoint named in `config`.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a client reusing an existing reqwest `Client`.
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            chat_url: config.chat_url(),
            new_chat_url: config.new_chat_url(),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    async fn post<B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| TamError::network(format!("Chat service request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            session_id = %request.session_id,
            chars = request.message.len(),
            "Sending chat message"
        );

        let response = self.post(&self.chat_url, request).await?;

        let parsed: ChatResponse = response.json().await.map_err(|err| {
            TamError::Serialization {
                format: "JSON".to_string(),
                message: format!("Failed to parse chat response: {err}"),
            }
        })?;

        tracing::debug!(
            session_id = %request.session_id,
            has_reply = parsed.reply.is_some(),
            is_emergency = parsed.is_emergency,
            "Chat reply received"
        );
        Ok(parsed)
    }

    async fn end_session(&self, session_id: &SessionId) -> Result<()> {
        let body = NewChatRequest {
            session_id: session_id.clone(),
        };
        // The acknowledgement body carries nothing the client needs.
        self.post(&self.new_chat_url, &body).await?;
        tracing::info!(session_id = %session_id, "Server session discarded");
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(alias = "message")]
    error: String,
}

fn map_http_error(status: StatusCode, body: String) -> TamError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body
            }
        });

    TamError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_prefers_json_message() {
        let err = map_http_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "model overloaded"}"#.to_string(),
        );
        assert_eq!(
            err,
            TamError::Http {
                status: 500,
                message: "model overloaded".to_string()
            }
        );
    }

    #[test]
    fn test_map_http_error_falls_back_to_body_or_reason() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err.to_string(), "HTTP 502: upstream down");

        let err = map_http_error(StatusCode::NOT_FOUND, String::new());
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_urls_come_from_config() {
        let config = ClientConfig {
            endpoint: "http://localhost:9000/".to_string(),
            ..Default::default()
        };
        let api = HttpChatApi::new(&config);
        assert_eq!(api.chat_url(), "http://localhost:9000/chat");
        assert_eq!(api.new_chat_url, "http://localhost:9000/new-chat");
    }
}
