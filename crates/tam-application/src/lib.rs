//! Use cases of the Tam chat client.

pub mod chat_client;
pub mod registration;
pub mod view;

pub use chat_client::{
    ChatClient, ChatClientDeps, LoadOutcome, NewChatOutcome, NewPatientOutcome, SubmitOutcome,
};
pub use registration::{RegistrationForm, register_patient};
pub use view::{ChatView, Prompter, Route};
