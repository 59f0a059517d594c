use crate::chat::format::TextFormat;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatButton {
    Apply(TextFormat),
    Close,
}

pub const BUTTONS: [(&str, FormatButton); 8] = [
    (" B ", FormatButton::Apply(TextFormat::Bold)),
    (" I ", FormatButton::Apply(TextFormat::Italic)),
    (" U ", FormatButton::Apply(TextFormat::Underline)),
    (" ● ", FormatButton::Apply(TextFormat::Color(4))),
    (" ● ", FormatButton::Apply(TextFormat::Color(3))),
    (" ● ", FormatButton::Apply(TextFormat::Color(12))),
    (" ⌀ ", FormatButton::Apply(TextFormat::Reset)),
    (" ✕ ", FormatButton::Close),
];

const BUTTON_GAP: u16 = 1;

fn button_style(button: FormatButton) -> Style {
    let base = Theme::app_bar();
    match button {
        FormatButton::Apply(TextFormat::Bold) => base.add_modifier(Modifier::BOLD),
        FormatButton::Apply(TextFormat::Italic) => base.add_modifier(Modifier::ITALIC),
        FormatButton::Apply(TextFormat::Underline) => base.add_modifier(Modifier::UNDERLINED),
        FormatButton::Apply(TextFormat::Color(4)) => base.fg(Color::Rgb(255, 0, 0)),
        FormatButton::Apply(TextFormat::Color(3)) => base.fg(Color::Rgb(0, 147, 0)),
        FormatButton::Apply(TextFormat::Color(12)) => base.fg(Color::Rgb(0, 0, 252)),
        _ => base,
    }
}

/// Start column and width of every button, relative to the bar.
fn button_spans() -> impl Iterator<Item = (u16, u16, FormatButton)> {
    let mut x = 1;
    BUTTONS.iter().map(move |&(label, button)| {
        let width = u16::try_from(label.width()).unwrap_or(0);
        let span = (x, width, button);
        x += width + BUTTON_GAP;
        span
    })
}

pub fn render(frame: &mut Frame, area: Rect) {
    let buf = frame.buffer_mut();
    buf.set_style(area, Theme::app_bar());
    for ((start, _, button), (label, _)) in button_spans().zip(BUTTONS.iter()) {
        if start >= area.width {
            break;
        }
        let room = usize::from(area.width - start);
        buf.set_stringn(area.x + start, area.y, label, room, button_style(button));
    }
}

pub fn button_at(area: Rect, column: u16) -> Option<FormatButton> {
    let x = column.checked_sub(area.x)?;
    button_spans()
        .find(|&(start, width, _)| x >= start && x < start + width)
        .map(|(_, _, button)| button)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_hit_test() {
        let area = Rect::new(5, 0, 60, 1);
        assert_eq!(button_at(area, 5), None);
        assert_eq!(button_at(area, 6), Some(FormatButton::Apply(TextFormat::Bold)));
        assert_eq!(button_at(area, 9), None);
        assert_eq!(button_at(area, 10), Some(FormatButton::Apply(TextFormat::Italic)));
        assert_eq!(button_at(area, 6 + 7 * 4), Some(FormatButton::Close));
    }
}
