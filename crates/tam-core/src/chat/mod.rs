//! Chat exchange types: messages, the visible transcript, reply formatting,
//! the emergency panel and the port to the remote chat endpoint.

pub mod api;
pub mod emergency;
pub mod format;
pub mod message;
pub mod transcript;

pub use api::{ChatApi, ChatRequest, ChatResponse, NewChatRequest};
pub use emergency::{EMERGENCY_HEADER, EMERGENCY_INSTRUCTION, EMERGENCY_NOTE, HOTLINES, Hotline};
pub use format::{ReplyLine, escape_html, format_reply, reply_lines};
pub use message::{ChatMessage, MessageRole, welcome_text};
pub use transcript::{Transcript, TranscriptEntry, TypingId};
