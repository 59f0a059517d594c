use crate::chat::format::{BOLD, COLOR, ITALIC, RESET, UNDERLINE};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use std::iter::Peekable;
use std::str::Chars;

const REVERSE: char = '\x16';

/// mIRC 16-color palette
const MIRC_PALETTE: [Color; 16] = [
    Color::Rgb(255, 255, 255), // 0  White
    Color::Rgb(0, 0, 0),       // 1  Black
    Color::Rgb(0, 0, 127),     // 2  Dark Blue
    Color::Rgb(0, 147, 0),     // 3  Dark Green
    Color::Rgb(255, 0, 0),     // 4  Red
    Color::Rgb(127, 0, 0),     // 5  Dark Red
    Color::Rgb(156, 0, 156),   // 6  Purple
    Color::Rgb(252, 127, 0),   // 7  Orange
    Color::Rgb(255, 255, 0),   // 8  Yellow
    Color::Rgb(0, 252, 0),     // 9  Light Green
    Color::Rgb(0, 147, 147),   // 10 Teal
    Color::Rgb(0, 255, 255),   // 11 Light Cyan
    Color::Rgb(0, 0, 252),     // 12 Light Blue
    Color::Rgb(255, 0, 255),   // 13 Pink
    Color::Rgb(127, 127, 127), // 14 Dark Gray
    Color::Rgb(210, 210, 210), // 15 Light Gray
];

/// Up to two digits of a colour number.
fn take_color_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value = None;
    for _ in 0..2 {
        match chars.peek().and_then(|c| c.to_digit(10)) {
            Some(d) => {
                value = Some(value.unwrap_or(0) * 10 + d as usize);
                chars.next();
            }
            None => break,
        }
    }
    value
}

fn toggle(style: Style, modifier: Modifier) -> Style {
    if style.add_modifier.contains(modifier) {
        style.remove_modifier(modifier)
    } else {
        style.add_modifier(modifier)
    }
}

/// Parse mIRC-formatted text into styled spans.
pub fn parse_mirc_formatted(text: &str, base_style: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut style = base_style;
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let next_style = match c {
            BOLD => toggle(style, Modifier::BOLD),
            ITALIC => toggle(style, Modifier::ITALIC),
            UNDERLINE => toggle(style, Modifier::UNDERLINED),
            RESET => base_style,
            REVERSE => {
                let mut swapped = style;
                swapped.fg = style.bg.or(base_style.bg);
                swapped.bg = style.fg.or(base_style.fg);
                swapped
            }
            COLOR => match take_color_number(&mut chars) {
                Some(fg) => {
                    let mut colored = style;
                    if let Some(&color) = MIRC_PALETTE.get(fg) {
                        colored = colored.fg(color);
                    }
                    // A comma only belongs to the code when digits follow it.
                    let mut lookahead = chars.clone();
                    if lookahead.next() == Some(',') {
                        if let Some(bg) = take_color_number(&mut lookahead) {
                            chars = lookahead;
                            if let Some(&color) = MIRC_PALETTE.get(bg) {
                                colored = colored.bg(color);
                            }
                        }
                    }
                    colored
                }
                // Bare \x03 restores the base colours
                None => Style {
                    fg: base_style.fg,
                    bg: base_style.bg,
                    ..style
                },
            },
            _ => {
                current.push(c);
                continue;
            }
        };
        if !current.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current), style));
        }
        style = next_style;
    }

    if !current.is_empty() {
        spans.push(Span::styled(current, style));
    }
    if spans.is_empty() {
        spans.push(Span::styled(String::new(), base_style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_span() {
        let spans = parse_mirc_formatted("héllo wörld", Style::default());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "héllo wörld");
    }

    #[test]
    fn test_toggles_and_reset() {
        let spans = parse_mirc_formatted("a\x02b\x02c\x1fd\x0fe", Style::default());
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[2].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[3].style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(spans[4].style, Style::default());
    }

    #[test]
    fn test_colors_with_background() {
        let spans = parse_mirc_formatted("\x034,12red\x03 plain", Style::default());
        assert_eq!(spans[0].content, "red");
        assert_eq!(spans[0].style.fg, Some(MIRC_PALETTE[4]));
        assert_eq!(spans[0].style.bg, Some(MIRC_PALETTE[12]));
        assert_eq!(spans[1].content, " plain");
        assert_eq!(spans[1].style.fg, None);
    }

    #[test]
    fn test_comma_without_digits_stays_text() {
        let spans = parse_mirc_formatted("\x033,x", Style::default());
        assert_eq!(spans[0].content, ",x");
        assert_eq!(spans[0].style.fg, Some(MIRC_PALETTE[3]));
        assert_eq!(spans[0].style.bg, None);
    }

    #[test]
    fn test_empty_input_keeps_one_span() {
        let spans = parse_mirc_formatted("\x02", Style::default());
        assert_eq!(spans.len(), 1);
        assert!(spans[0].content.is_empty());
    }
}
