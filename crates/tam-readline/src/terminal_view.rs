use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use colored::Colorize;
use rustyline::ExternalPrinter;
use tam_application::ChatView;
use tam_core::chat::{
    ChatMessage, EMERGENCY_HEADER, EMERGENCY_INSTRUCTION, EMERGENCY_NOTE, HOTLINES, MessageRole,
    ReplyLine, TranscriptEntry, TypingId, reply_lines,
};

/// ANSI: cursor up one line, erase that line.
const ERASE_PREVIOUS_LINE: &str = "\x1B[1A\x1B[2K";
/// ANSI: clear screen, cursor home.
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

pub type BoxedPrinter = Box<dyn ExternalPrinter + Send>;

/// Prints transcript changes as they happen.
///
/// Output from background tasks goes through rustyline's external printer,
/// which redraws the `>> ` prompt below it. A typing line is erased when the
/// next thing printed lands directly under it.
pub struct TerminalView {
    assistant_name: String,
    output: Mutex<Output>,
}

struct Output {
    printer: Option<BoxedPrinter>,
    /// Typing placeholder that is currently the last printed line.
    last_typing: Option<TypingId>,
    erase_pending: bool,
}

impl TerminalView {
    /// Writes straight to stdout. Used when no line editor is attached.
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self::build(assistant_name.into(), None)
    }

    pub fn with_printer(assistant_name: impl Into<String>, printer: BoxedPrinter) -> Self {
        Self::build(assistant_name.into(), Some(printer))
    }

    fn build(assistant_name: String, printer: Option<BoxedPrinter>) -> Self {
        Self {
            assistant_name,
            output: Mutex::new(Output {
                printer,
                last_typing: None,
                erase_pending: false,
            }),
        }
    }

    fn output(&self) -> MutexGuard<'_, Output> {
        // A panic mid-print leaves nothing inconsistent worth refusing over.
        self.output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Output {
    fn emit(&mut self, text: String) {
        let text = if std::mem::take(&mut self.erase_pending) {
            format!("{}{}", ERASE_PREVIOUS_LINE, text)
        } else {
            text
        };

        match self.printer.as_mut() {
            Some(printer) => {
                if let Err(err) = printer.print(text.clone()) {
                    tracing::warn!(error = %err, "External printer failed, falling back to stdout");
                    self.printer = None;
                    println!("{}", text);
                }
            }
            None => println!("{}", text),
        }
    }
}

impl ChatView for TerminalView {
    fn entry_added(&self, entry: &TranscriptEntry) {
        let text = render_entry(entry, &self.assistant_name).join("\n");
        let mut output = self.output();
        output.emit(text);
        output.last_typing = match entry {
            TranscriptEntry::Typing(id) => Some(*id),
            _ => None,
        };
    }

    fn typing_removed(&self, id: TypingId) {
        let mut output = self.output();
        if output.last_typing == Some(id) {
            output.last_typing = None;
            output.erase_pending = true;
        }
        tracing::trace!(?id, "Typing indicator removed");
    }

    fn cleared(&self) {
        let mut output = self.output();
        output.last_typing = None;
        output.erase_pending = false;
        output.emit(CLEAR_SCREEN.to_string());
    }

    fn scroll_to_latest(&self) {
        if self.output().printer.is_none() {
            let _ = std::io::stdout().flush();
        }
    }
}

/// Terminal lines for one transcript entry.
pub fn render_entry(entry: &TranscriptEntry, assistant_name: &str) -> Vec<String> {
    match entry {
        TranscriptEntry::Message(message) => render_message(message, assistant_name),
        TranscriptEntry::Typing(_) => {
            vec![format!("{} is typing…", assistant_name).bright_black().italic().to_string()]
        }
        TranscriptEntry::EmergencyPanel => render_emergency_panel(),
    }
}

fn render_message(message: &ChatMessage, assistant_name: &str) -> Vec<String> {
    let label = message.label(assistant_name);
    let mut lines = Vec::new();

    match message.role {
        MessageRole::User => {
            lines.push(format!("[{}]", label).green().bold().to_string());
            lines.extend(message.text.lines().map(|line| line.green().to_string()));
        }
        MessageRole::Bot => {
            lines.push(format!("[{}]", label).bright_magenta().bold().to_string());
            lines.extend(reply_lines(&message.text).iter().map(render_reply_line));
        }
        MessageRole::Error => {
            lines.push(format!("[{}]", label).red().bold().to_string());
            lines.extend(message.text.lines().map(|line| line.red().to_string()));
        }
    }

    lines.push(String::new());
    lines
}

fn render_reply_line(line: &ReplyLine) -> String {
    match line {
        ReplyLine::Plain(text) => text.bright_blue().to_string(),
        ReplyLine::Bullet(text) => format!("  • {}", text).bright_blue().to_string(),
        ReplyLine::Numbered { number, rest } => {
            format!("{}{}", format!("{}.", number).bold(), rest.bright_blue())
        }
    }
}

fn render_emergency_panel() -> Vec<String> {
    let mut lines = vec![
        EMERGENCY_HEADER.red().bold().to_string(),
        EMERGENCY_INSTRUCTION.red().to_string(),
    ];
    for hotline in HOTLINES.iter() {
        lines.push(format!(
            "  {} {}  {}  ({})",
            hotline.icon,
            hotline.number.bright_red().bold(),
            hotline.label,
            hotline.tel_uri().bright_black()
        ));
    }
    lines.push(EMERGENCY_NOTE.yellow().to_string());
    lines.push(String::new());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tam_core::chat::Transcript;

    #[derive(Clone, Default)]
    struct CapturePrinter {
        printed: Arc<Mutex<Vec<String>>>,
    }

    impl ExternalPrinter for CapturePrinter {
        fn print(&mut self, msg: String) -> rustyline::Result<()> {
            self.printed.lock().unwrap().push(msg);
            Ok(())
        }
    }

    fn captured_view() -> (TerminalView, CapturePrinter) {
        colored::control::set_override(false);
        let printer = CapturePrinter::default();
        let view = TerminalView::with_printer("Tam", Box::new(printer.clone()));
        (view, printer)
    }

    fn plain(entry: &TranscriptEntry) -> Vec<String> {
        colored::control::set_override(false);
        render_entry(entry, "Tam")
    }

    #[test]
    fn test_bot_reply_lists() {
        let entry = TranscriptEntry::Message(ChatMessage::bot("Try this:\n- rest\n2. drink water"));

        assert_eq!(
            plain(&entry),
            vec![
                "[AI Health Assistant (Tam)]",
                "Try this:",
                "  • rest",
                "2. drink water",
                "",
            ]
        );
    }

    #[test]
    fn test_user_text_is_not_formatted() {
        let entry = TranscriptEntry::Message(ChatMessage::user("- not a bullet"));

        assert_eq!(plain(&entry), vec!["[You]", "- not a bullet", ""]);
    }

    #[test]
    fn test_emergency_panel_lists_every_hotline() {
        let lines = plain(&TranscriptEntry::EmergencyPanel);

        assert_eq!(lines[0], EMERGENCY_HEADER);
        for hotline in HOTLINES.iter() {
            assert!(lines.iter().any(|line| line.contains(hotline.number)));
        }
        assert!(lines.iter().any(|line| line == EMERGENCY_NOTE));
    }

    #[test]
    fn test_typing_placeholder_names_assistant() {
        let id = Transcript::new().show_typing();
        assert_eq!(plain(&TranscriptEntry::Typing(id)), vec!["Tam is typing…"]);
    }

    #[test]
    fn test_reply_replaces_typing_line() {
        let (view, printer) = captured_view();
        let mut transcript = Transcript::new();
        let typing = transcript.show_typing();

        view.entry_added(&TranscriptEntry::Typing(typing));
        view.typing_removed(typing);
        view.entry_added(&TranscriptEntry::Message(ChatMessage::bot("Rest well.")));

        let printed = printer.printed.lock().unwrap().clone();
        assert_eq!(printed.len(), 2);
        assert_eq!(printed[0], "Tam is typing…");
        assert!(printed[1].starts_with(ERASE_PREVIOUS_LINE));
        assert!(printed[1].contains("Rest well."));
    }

    #[test]
    fn test_typing_line_kept_when_something_else_printed_after_it() {
        let (view, printer) = captured_view();
        let mut transcript = Transcript::new();
        let typing = transcript.show_typing();

        view.entry_added(&TranscriptEntry::Typing(typing));
        view.entry_added(&TranscriptEntry::Message(ChatMessage::user("another")));
        view.typing_removed(typing);
        view.entry_added(&TranscriptEntry::Message(ChatMessage::bot("answer")));

        let printed = printer.printed.lock().unwrap().clone();
        assert!(printed.iter().all(|text| !text.starts_with(ERASE_PREVIOUS_LINE)));
    }
}
