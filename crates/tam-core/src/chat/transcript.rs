//! The visible transcript.
//!
//! Holds what the user currently sees: message bubbles, typing placeholders
//! and emergency panels, in render order. Cleared on new chat, never saved.

use super::message::ChatMessage;

/// Handle to one typing placeholder, used to remove exactly that one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypingId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Message(ChatMessage),
    Typing(TypingId),
    EmergencyPanel,
}

#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_typing_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bubble and returns the new entry.
    pub fn push_message(&mut self, message: ChatMessage) -> &TranscriptEntry {
        self.push(TranscriptEntry::Message(message))
    }

    /// Appends a typing placeholder.
    pub fn show_typing(&mut self) -> TypingId {
        let id = TypingId(self.next_typing_id);
        self.next_typing_id += 1;
        self.entries.push(TranscriptEntry::Typing(id));
        id
    }

    /// Removes a typing placeholder. Returns false if it was already gone
    /// (for instance because the transcript was cleared meanwhile).
    pub fn remove_typing(&mut self, id: TypingId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, TranscriptEntry::Typing(t) if *t == id));
        self.entries.len() != before
    }

    pub fn show_emergency(&mut self) -> &TranscriptEntry {
        self.push(TranscriptEntry::EmergencyPanel)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    fn push(&mut self, entry: TranscriptEntry) -> &TranscriptEntry {
        self.entries.push(entry);
        // Just pushed, so the vector is non-empty.
        &self.entries[self.entries.len() - 1]
    }
}
