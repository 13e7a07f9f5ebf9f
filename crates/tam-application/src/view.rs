//! Presentation ports.
//!
//! The client owns the transcript model; a [`ChatView`] only mirrors its
//! changes onto whatever surface the user is looking at.

use tam_core::chat::{TranscriptEntry, TypingId};

/// Receives every transcript change, in order.
pub trait ChatView: Send + Sync {
    /// `entry` was appended to the end of the transcript.
    fn entry_added(&self, entry: &TranscriptEntry);

    /// A typing placeholder went away.
    fn typing_removed(&self, id: TypingId);

    /// The whole transcript was cleared.
    fn cleared(&self);

    /// Bring the newest entry into view. Called after every render.
    fn scroll_to_latest(&self);
}

/// Asks the user a yes/no question.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Places the client can hand control to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Patient registration; the chat cannot run without a stored profile.
    Registration,
}
