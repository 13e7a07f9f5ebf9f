use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use tam_application::{Prompter, RegistrationForm};

use crate::helper::CliHelper;

pub type TamEditor = Editor<CliHelper, DefaultHistory>;

/// Yes/no confirmation on the REPL's own editor.
pub struct EditorPrompter<'a> {
    editor: &'a mut TamEditor,
}

impl<'a> EditorPrompter<'a> {
    pub fn new(editor: &'a mut TamEditor) -> Self {
        Self { editor }
    }
}

impl Prompter for EditorPrompter<'_> {
    fn confirm(&mut self, question: &str) -> bool {
        let prompt = format!("{} [y/N] ", question.bright_yellow());
        match self.editor.readline(&prompt) {
            Ok(answer) => is_yes(&answer),
            // Ctrl-C / Ctrl-D mean no
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks for every registration field in order.
///
/// `ask` reads one answer for a prompt. Returns `Ok(None)` when the user
/// abandons the form with Ctrl-C or Ctrl-D.
pub fn read_registration<F>(mut ask: F) -> rustyline::Result<Option<RegistrationForm>>
where
    F: FnMut(&str) -> rustyline::Result<String>,
{
    let mut form = RegistrationForm::default();
    let fields: [(&str, &mut String); 8] = [
        ("First name", &mut form.first_name),
        ("Last name", &mut form.last_name),
        ("Age (optional)", &mut form.age),
        ("Sex (optional)", &mut form.sex),
        ("Address (optional)", &mut form.address),
        ("Contact number (optional)", &mut form.contact_number),
        ("Medical history (optional)", &mut form.medical_history),
        ("Patient ID (optional)", &mut form.patient_id),
    ];

    for (label, slot) in fields {
        match ask(&format!("{}: ", label)) {
            Ok(answer) => *slot = answer,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err),
        }
    }

    Ok(Some(form))
}
