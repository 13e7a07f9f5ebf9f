//! Chat message types.

use super::format::{escape_html, format_reply};

/// Who a transcript bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    /// Text the user submitted.
    User,
    /// Reply from the assistant.
    Bot,
    /// A locally generated failure notice.
    Error,
}

/// A single bubble in the transcript. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Bot,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Error,
            text: text.into(),
        }
    }

    /// Heading shown above the bubble.
    pub fn label(&self, assistant_name: &str) -> String {
        match self.role {
            MessageRole::User => "You".to_string(),
            MessageRole::Bot => format!("AI Health Assistant ({})", assistant_name),
            MessageRole::Error => "Error".to_string(),
        }
    }

    /// HTML body of the bubble. Only bot replies get list formatting.
    pub fn body_html(&self) -> String {
        match self.role {
            MessageRole::Bot => format_reply(&self.text),
            MessageRole::User | MessageRole::Error => escape_html(&self.text),
        }
    }
}

/// Greeting rendered on load and after every new chat.
pub fn welcome_text(first_name: &str, assistant_name: &str) -> String {
    format!(
        "Hello {}! I'm your AI health assistant, My name is {}. How can I help you today?",
        first_name, assistant_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ChatMessage::user("hi").label("Tam"), "You");
        assert_eq!(
            ChatMessage::bot("hi").label("Tam"),
            "AI Health Assistant (Tam)"
        );
        assert_eq!(ChatMessage::error("x").label("Tam"), "Error");
    }

    #[test]
    fn test_user_text_is_not_list_formatted() {
        let message = ChatMessage::user("- <not a bullet>");
        assert_eq!(message.body_html(), "- &lt;not a bullet&gt;");

        let reply = ChatMessage::bot("- a bullet");
        assert_eq!(reply.body_html(), "• a bullet");
    }

    #[test]
    fn test_welcome_text_uses_first_name() {
        assert_eq!(
            welcome_text("Maria", "Tam"),
            "Hello Maria! I'm your AI health assistant, My name is Tam. How can I help you today?"
        );
    }
}
