//! Reply formatting.
//!
//! Replies are plain text with light list markup. Each line is classified
//! once into a [`ReplyLine`]; the HTML form and the terminal renderer both
//! work from that classification.

/// One line of a formatted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyLine {
    /// Ordinary text.
    Plain(String),
    /// A line that started with `- ` or `* `; holds the text after the marker.
    Bullet(String),
    /// A line that started with `N.`; holds the numeral and the remainder.
    Numbered { number: String, rest: String },
}

/// Escapes the characters that would otherwise be read as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Splits a reply into classified lines.
pub fn reply_lines(text: &str) -> Vec<ReplyLine> {
    text.split('\n').map(classify_line).collect()
}

/// Formats a bot reply as HTML: escaped text, `<br>` between lines, `•`
/// for bullets and an emphasized numeral for numbered items.
pub fn format_reply(text: &str) -> String {
    reply_lines(text)
        .iter()
        .map(|line| match line {
            ReplyLine::Plain(text) => escape_html(text),
            ReplyLine::Bullet(text) => format!("• {}", escape_html(text)),
            ReplyLine::Numbered { number, rest } => {
                format!("<strong>{}.</strong>{}", number, escape_html(rest))
            }
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn classify_line(line: &str) -> ReplyLine {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return ReplyLine::Bullet(rest.to_string());
    }

    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && line[digits..].starts_with('.') {
        return ReplyLine::Numbered {
            number: line[..digits].to_string(),
            rest: line[digits + 1..].to_string(),
        };
    }

    ReplyLine::Plain(line.to_string())
}
