//! Port to the remote chat endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::patient::{PatientId, PatientProfile};
use crate::session::SessionId;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: SessionId,
    pub patient_data: PatientProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<PatientId>,
}

/// Body returned by `POST /chat`.
///
/// Both fields are optional on the wire: a missing reply is surfaced to the
/// user as a fallback notice, a missing flag means "not an emergency".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub is_emergency: bool,
}

/// Body of `POST /new-chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChatRequest {
    pub session_id: SessionId,
}

/// The remote conversation service.
///
/// Implementations perform exactly one request per call: no retry, no
/// timeout beyond the transport's own.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends one user message and returns the decoded reply.
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Asks the server to forget the conversation kept for `session_id`.
    async fn end_session(&self, session_id: &SessionId) -> Result<()>;
}
