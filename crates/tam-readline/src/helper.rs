use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::matching_commands;

/// Rustyline helper: slash-command completion, hints and highlighting.
#[derive(Clone, Default)]
pub struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = matching_commands(line)
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        command_hint(&line[..pos])
    }
}

impl Validator for CliHelper {}

/// Remaining text of the first command that extends `line`.
fn command_hint(line: &str) -> Option<String> {
    if !line.starts_with('/') || line.contains(' ') {
        return None;
    }
    matching_commands(line)
        .find(|cmd| cmd.len() > line.len())
        .map(|cmd| cmd[line.len()..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_hint() {
        assert_eq!(command_hint("/new-p"), Some("atient".to_string()));
        assert_eq!(command_hint("/q"), Some("uit".to_string()));
        assert_eq!(command_hint("/quit"), None);
        assert_eq!(command_hint("hello"), None);
        assert_eq!(command_hint("/new-chat now"), None);
    }
}
