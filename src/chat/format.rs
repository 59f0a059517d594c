//! IRC formatting codes inserted by the format bar.

use crate::chat::composer::Composer;

pub const BOLD: char = '\x02';
pub const COLOR: char = '\x03';
pub const RESET: char = '\x0f';
pub const ITALIC: char = '\x1d';
pub const UNDERLINE: char = '\x1f';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Bold,
    Italic,
    Underline,
    /// mIRC colour index, 0-98.
    Color(u8),
    Reset,
}

impl TextFormat {
    /// Code that turns the format on.
    pub fn code(&self) -> String {
        match self {
            TextFormat::Bold => BOLD.to_string(),
            TextFormat::Italic => ITALIC.to_string(),
            TextFormat::Underline => UNDERLINE.to_string(),
            TextFormat::Color(n) => format!("{}{:02}", COLOR, (*n).min(98)),
            TextFormat::Reset => RESET.to_string(),
        }
    }

    /// Code that turns the format back off after a wrapped selection.
    fn closing_code(&self) -> Option<String> {
        match self {
            TextFormat::Color(_) => Some(COLOR.to_string()),
            TextFormat::Reset => None,
            other => Some(other.code()),
        }
    }
}

/// Wrap the selection in `format`, or insert the opening code at the cursor.
pub fn apply_format(composer: &mut Composer, format: TextFormat) {
    let open = format.code();
    match (composer.selection(), format.closing_code()) {
        (Some(range), Some(close)) => {
            let inner = composer.text()[range.clone()].to_string();
            let start = range.start;
            let wrapped = format!("{}{}{}", open, inner, close);
            composer.replace_range(range, &wrapped);
            // Keep the formatted text selected for further formatting.
            composer.set_selection(start..start + wrapped.len());
        }
        _ => {
            composer.clear_selection();
            composer.insert_str(&open);
        }
    }
}

/// Remove every formatting code, including colour numbers.
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            BOLD | ITALIC | UNDERLINE | RESET | '\x16' => {}
            COLOR => {
                skip_digits(&mut chars);
                if chars.peek() == Some(&',') {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                        chars.next();
                        skip_digits(&mut chars);
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn skip_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    for _ in 0..2 {
        if chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            chars.next();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_selection() {
        let mut c = Composer::new();
        c.set_text("say hi now");
        c.set_selection(4..6);
        apply_format(&mut c, TextFormat::Bold);
        assert_eq!(c.text(), "say \x02hi\x02 now");
        assert!(c.has_selection());

        let mut c = Composer::new();
        c.set_text("red");
        c.set_selection(0..3);
        apply_format(&mut c, TextFormat::Color(4));
        assert_eq!(c.text(), "\x0304red\x03");
    }

    #[test]
    fn test_inserts_at_cursor_without_selection() {
        let mut c = Composer::new();
        c.set_text("ab");
        c.move_left(false);
        apply_format(&mut c, TextFormat::Underline);
        assert_eq!(c.text(), "a\x1fb");
        assert_eq!(c.cursor(), 2);
    }

    #[test]
    fn test_strip_formatting() {
        assert_eq!(strip_formatting("\x02bold\x02 \x0304,12red\x03 \x1dit\x0f"), "bold red it");
        assert_eq!(strip_formatting("\x03,x"), ",x");
        assert_eq!(strip_formatting("\x0312,"), ",");
    }
}
