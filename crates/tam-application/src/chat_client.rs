use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use tam_core::TamError;
use tam_core::chat::{
    ChatApi, ChatMessage, ChatRequest, Transcript, TranscriptEntry, TypingId, welcome_text,
};
use tam_core::error::Result;
use tam_core::patient::{PatientId, PatientProfile};
use tam_core::session::SessionId;
use tam_core::storage::{ClientStorage, PATIENT_DATA_KEY, PATIENT_ID_KEY};

use crate::view::{ChatView, Prompter, Route};

/// Shown in place of a reply when the server answered without one.
pub const MISSING_REPLY_TEXT: &str = "Sorry, I didn't get a reply. Please try again.";

const NEW_CHAT_QUESTION: &str = "Start a new chat? The current conversation will be cleared.";
const NEW_PATIENT_QUESTION: &str = "Register a new patient? Current chat will be lost.";

/// Collaborators a [`ChatClient`] is built from.
#[derive(Clone)]
pub struct ChatClientDeps {
    pub api: Arc<dyn ChatApi>,
    pub storage: Arc<dyn ClientStorage>,
    pub view: Arc<dyn ChatView>,
    pub assistant_name: String,
}

/// Result of [`ChatClient::load`].
pub enum LoadOutcome {
    /// A profile was found; the welcome bubble has been rendered.
    Ready(ChatClient),
    /// No usable profile is stored. Nothing was rendered.
    RegistrationRequired,
}

/// What happened to one submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input: nothing rendered, nothing sent.
    Ignored,
    /// A reply bubble was rendered.
    Replied { emergency: bool },
    /// The server answered without a reply; the fallback bubble was rendered.
    MissingReply { emergency: bool },
    /// The request failed; an error bubble was rendered.
    Failed(TamError),
    /// The session changed while the request was in flight; the answer was dropped.
    Stale,
}

/// Result of [`ChatClient::start_new_chat`].
pub enum NewChatOutcome {
    Cancelled,
    Started {
        session_id: SessionId,
        /// The fire-and-forget `/new-chat` call for the previous session.
        cleanup: JoinHandle<()>,
    },
}

/// Result of [`ChatClient::start_new_patient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewPatientOutcome {
    Cancelled,
    Redirect(Route),
}

/// The chat widget's behaviour, independent of how it is drawn.
///
/// Cheap to clone; clones share one session and one transcript, so each
/// submission can run on its own task. Replies land in arrival order.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn ChatApi>,
    storage: Arc<dyn ClientStorage>,
    view: Arc<dyn ChatView>,
    assistant_name: String,
    patient: PatientProfile,
    patient_id: Option<PatientId>,
    /// Never held across a network await.
    state: Mutex<ClientState>,
}

struct ClientState {
    session_id: SessionId,
    transcript: Transcript,
    /// Set once the patient is forgotten; nothing renders afterwards.
    closed: bool,
}

impl ChatClient {
    /// Reads the stored profile and, if present, starts a session and
    /// renders the welcome bubble.
    ///
    /// # Errors
    ///
    /// Only storage access failures. A missing or unreadable profile is
    /// reported as [`LoadOutcome::RegistrationRequired`].
    pub async fn load(deps: ChatClientDeps) -> Result<LoadOutcome> {
        let Some(raw) = deps.storage.get_item(PATIENT_DATA_KEY)? else {
            tracing::info!("No stored patient profile, registration required");
            return Ok(LoadOutcome::RegistrationRequired);
        };

        let patient = match PatientProfile::from_json(&raw) {
            Ok(patient) => patient,
            Err(err) => {
                tracing::warn!(error = %err, "Stored patient profile is unreadable");
                return Ok(LoadOutcome::RegistrationRequired);
            }
        };

        let patient_id = deps
            .storage
            .get_item(PATIENT_ID_KEY)?
            .filter(|id| !id.trim().is_empty())
            .map(PatientId::new);

        let session_id = SessionId::mint();
        tracing::info!(session_id = %session_id, has_patient_id = patient_id.is_some(), "Chat session started");

        let client = Self {
            inner: Arc::new(Inner {
                api: deps.api,
                storage: deps.storage,
                view: deps.view,
                assistant_name: deps.assistant_name,
                patient,
                patient_id,
                state: Mutex::new(ClientState {
                    session_id,
                    transcript: Transcript::new(),
                    closed: false,
                }),
            }),
        };

        {
            let mut state = client.inner.state.lock().await;
            client.inner.render_welcome(&mut state);
        }

        Ok(LoadOutcome::Ready(client))
    }

    pub fn patient(&self) -> &PatientProfile {
        &self.inner.patient
    }

    pub fn patient_id(&self) -> Option<&PatientId> {
        self.inner.patient_id.as_ref()
    }

    pub fn assistant_name(&self) -> &str {
        &self.inner.assistant_name
    }

    pub async fn session_id(&self) -> SessionId {
        self.inner.state.lock().await.session_id.clone()
    }

    /// Copy of the current transcript entries.
    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.inner.state.lock().await.transcript.entries().to_vec()
    }

    /// Sends one user message and renders the outcome.
    ///
    /// Every failure ends up as a bubble; the returned outcome only reports
    /// which one.
    pub async fn submit(&self, message: &str) -> SubmitOutcome {
        let text = message.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let (typing, session_id) = {
            let mut state = self.inner.state.lock().await;
            if state.closed {
                return SubmitOutcome::Stale;
            }
            self.inner.render_message(&mut state, ChatMessage::user(text));
            let typing = self.inner.render_typing(&mut state);
            (typing, state.session_id.clone())
        };

        let request = ChatRequest {
            message: text.to_string(),
            session_id: session_id.clone(),
            patient_data: self.inner.patient.clone(),
            patient_id: self.inner.patient_id.clone(),
        };

        let result = self.inner.api.send_message(&request).await;

        let mut state = self.inner.state.lock().await;
        if state.closed {
            tracing::debug!(dispatched = %session_id, "Dropping reply for a forgotten patient");
            return SubmitOutcome::Stale;
        }
        self.inner.remove_typing(&mut state, typing);

        if state.session_id != session_id {
            tracing::debug!(
                dispatched = %session_id,
                current = %state.session_id,
                "Dropping reply for a discarded session"
            );
            return SubmitOutcome::Stale;
        }

        match result {
            Ok(response) => {
                let emergency = response.is_emergency;
                if emergency {
                    tracing::warn!(session_id = %session_id, "Reply flagged as emergency");
                    self.inner.render_emergency(&mut state);
                }

                match response.reply {
                    Some(reply) => {
                        self.inner.render_message(&mut state, ChatMessage::bot(reply));
                        SubmitOutcome::Replied { emergency }
                    }
                    None => {
                        tracing::warn!(session_id = %session_id, "Chat response had no reply field");
                        self.inner
                            .render_message(&mut state, ChatMessage::error(MISSING_REPLY_TEXT));
                        SubmitOutcome::MissingReply { emergency }
                    }
                }
            }
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "Chat request failed");
                self.inner
                    .render_message(&mut state, ChatMessage::error(format!("Error: {}", err)));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Discards the current conversation after confirmation.
    ///
    /// Does nothing once [`ChatClient::start_new_patient`] has closed the client.
    ///
    /// The server is told to forget the old session in the background; the
    /// transcript is cleared and the welcome bubble re-rendered right away.
    pub async fn start_new_chat(&self, prompter: &mut dyn Prompter) -> NewChatOutcome {
        if !prompter.confirm(NEW_CHAT_QUESTION) {
            return NewChatOutcome::Cancelled;
        }

        let mut state = self.inner.state.lock().await;
        if state.closed {
            return NewChatOutcome::Cancelled;
        }
        let old_session = std::mem::replace(&mut state.session_id, SessionId::mint());

        let inner = Arc::clone(&self.inner);
        let cleanup_session = old_session.clone();
        let cleanup = tokio::spawn(async move {
            if let Err(err) = inner.api.end_session(&cleanup_session).await {
                tracing::warn!(session_id = %cleanup_session, error = %err, "Failed to discard server session");
                let mut state = inner.state.lock().await;
                if state.closed {
                    return;
                }
                inner.render_message(
                    &mut state,
                    ChatMessage::error(format!("Error starting new chat: {}", err)),
                );
            }
        });

        state.transcript.clear();
        self.inner.view.cleared();
        self.inner.render_welcome(&mut state);

        tracing::info!(
            old_session = %old_session,
            session_id = %state.session_id,
            "New chat started"
        );

        NewChatOutcome::Started {
            session_id: state.session_id.clone(),
            cleanup,
        }
    }

    /// Forgets the stored patient after confirmation and closes the client.
    ///
    /// The session ends here: replies still in flight are dropped without
    /// rendering, and later submissions are refused.
    ///
    /// # Errors
    ///
    /// Storage failures while removing the profile or id.
    pub async fn start_new_patient(&self, prompter: &mut dyn Prompter) -> Result<NewPatientOutcome> {
        if !prompter.confirm(NEW_PATIENT_QUESTION) {
            return Ok(NewPatientOutcome::Cancelled);
        }

        {
            let mut state = self.inner.state.lock().await;
            state.closed = true;
            let old_session = std::mem::replace(&mut state.session_id, SessionId::mint());
            tracing::info!(session_id = %old_session, "Session ended for new patient");
        }

        self.inner.storage.remove_item(PATIENT_DATA_KEY)?;
        self.inner.storage.remove_item(PATIENT_ID_KEY)?;
        tracing::info!("Stored patient profile cleared");

        Ok(NewPatientOutcome::Redirect(Route::Registration))
    }
}

impl Inner {
    fn render_welcome(&self, state: &mut ClientState) {
        let text = welcome_text(self.patient.first_name(), &self.assistant_name);
        self.render_message(state, ChatMessage::bot(text));
    }

    fn render_message(&self, state: &mut ClientState, message: ChatMessage) {
        let added = state.transcript.push_message(message);
        self.announce(added);
    }

    fn render_emergency(&self, state: &mut ClientState) {
        let added = state.transcript.show_emergency();
        self.announce(added);
    }

    fn render_typing(&self, state: &mut ClientState) -> TypingId {
        let id = state.transcript.show_typing();
        self.announce(&TranscriptEntry::Typing(id));
        id
    }

    fn announce(&self, entry: &TranscriptEntry) {
        self.view.entry_added(entry);
        self.view.scroll_to_latest();
    }

    fn remove_typing(&self, state: &mut ClientState, id: TypingId) {
        if state.transcript.remove_typing(id) {
            self.view.typing_removed(id);
        }
    }
}
