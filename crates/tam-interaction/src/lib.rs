//! Remote collaborators of the Tam client.

pub mod http_chat_api;

pub use http_chat_api::HttpChatApi;
