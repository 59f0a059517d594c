use crate::chat::composer::{Composer, SendIconTint};
use crate::chat::ChatFragment;
use crate::ui::layout::ChatLayout;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

pub const TAB_ICON: &str = "⇥";
pub const SEND_ICON: &str = "➤";

/// Formatting codes are shown as their control pictures (U+2400 block).
fn display_char(c: char) -> char {
    match c {
        '\0'..='\x1f' => char::from_u32(0x2400 + c as u32).unwrap_or('?'),
        _ => c,
    }
}

/// One drawn character of the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    byte: usize,
    ch: char,
    col: usize,
    width: usize,
    control: bool,
}

fn glyphs(text: &str) -> Vec<Glyph> {
    let mut col = 0;
    text.char_indices()
        .map(|(byte, c)| {
            let ch = display_char(c);
            let width = ch.width().unwrap_or(0);
            let glyph = Glyph {
                byte,
                ch,
                col,
                width,
                control: c.is_control(),
            };
            col += width;
            glyph
        })
        .collect()
}

/// First visible column and the cursor column for a line `width` wide.
pub fn visible_window(text: &str, cursor: usize, width: u16) -> (usize, usize) {
    let cursor_col = glyphs(text)
        .iter()
        .take_while(|g| g.byte < cursor)
        .map(|g| g.width)
        .sum::<usize>();
    let width = usize::from(width.max(1));
    let offset = cursor_col.saturating_sub(width - 1);
    (offset, cursor_col)
}

fn input_line(composer: &Composer, offset: usize, width: u16) -> Line<'static> {
    let selection = composer.selection();
    let limit = offset + usize::from(width);
    let spans: Vec<Span<'static>> = glyphs(composer.text())
        .into_iter()
        .filter(|g| g.col >= offset && g.col + g.width <= limit)
        .map(|g| {
            let selected = selection.as_ref().is_some_and(|r| r.contains(&g.byte));
            let style = if selected {
                Theme::selection()
            } else if g.control {
                Style::default().fg(Theme::TEXT_MUTED)
            } else {
                Theme::input_text()
            };
            Span::styled(g.ch.to_string(), style)
        })
        .collect();
    Line::from(spans)
}

pub fn render(frame: &mut Frame, layout: &ChatLayout, fragment: &ChatFragment) {
    let composer = fragment.composer();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused())
        .style(Theme::panel_bg());
    frame.render_widget(block, layout.composer);

    if let Some(tab) = layout.tab_button {
        frame.render_widget(
            Paragraph::new(format!(" {}", TAB_ICON)).style(Style::default().fg(Theme::ACCENT_TEAL)),
            tab,
        );
    }

    let send_color = match composer.send_icon_tint() {
        SendIconTint::Accent => Theme::ACCENT_TEAL,
        SendIconTint::Inactive => Theme::ICON_INACTIVE,
    };
    frame.render_widget(
        Paragraph::new(format!(" {}", SEND_ICON)).style(Style::default().fg(send_color)),
        layout.send_button,
    );

    let area = layout.composer_text;
    if area.width == 0 {
        return;
    }
    if composer.is_empty() {
        let hint = match fragment.current_channel() {
            Some(channel) => format!("Message {}", channel),
            None => "Type a /command".to_string(),
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Theme::TEXT_MUTED)),
            area,
        );
        frame.set_cursor_position((area.x, area.y));
        return;
    }

    let (offset, cursor_col) = visible_window(composer.text(), composer.cursor(), area.width);
    frame.render_widget(Paragraph::new(input_line(composer, offset, area.width)), area);

    let col = u16::try_from(cursor_col - offset).unwrap_or(u16::MAX);
    frame.set_cursor_position((area.x + col.min(area.width - 1), area.y));
}

/// Byte offset in the composer text under screen column `column` of the
/// text area. Clicks past the end land at the end.
pub fn byte_at_column(composer: &Composer, column: u16, width: u16) -> usize {
    let (offset, _) = visible_window(composer.text(), composer.cursor(), width);
    let target = offset + usize::from(column);
    glyphs(composer.text())
        .iter()
        .find(|g| g.col + g.width > target)
        .map_or(composer.text().len(), |g| g.byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_follows_cursor() {
        assert_eq!(visible_window("hello", 5, 10), (0, 5));
        assert_eq!(visible_window("hello world", 11, 5), (7, 11));
        // Wide characters count two columns.
        assert_eq!(visible_window("日本", "日本".len(), 10), (0, 4));
    }

    #[test]
    fn test_format_codes_are_visible() {
        let mut composer = Composer::new();
        composer.set_text("\x02hi");
        let line = input_line(&composer, 0, 10);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "␂hi");
        assert_eq!(line.spans[0].style.fg, Some(Theme::TEXT_MUTED));
    }

    #[test]
    fn test_selection_is_highlighted() {
        let mut composer = Composer::new();
        composer.set_text("abcd");
        composer.set_selection(1..3);
        let line = input_line(&composer, 0, 10);
        assert_eq!(line.spans[0].style, Theme::input_text());
        assert_eq!(line.spans[1].style, Theme::selection());
        assert_eq!(line.spans[2].style, Theme::selection());
        assert_eq!(line.spans[3].style, Theme::input_text());
    }

    #[test]
    fn test_click_maps_to_byte() {
        let mut composer = Composer::new();
        composer.set_text("héllo");
        composer.set_cursor(0);
        assert_eq!(byte_at_column(&composer, 0, 20), 0);
        assert_eq!(byte_at_column(&composer, 2, 20), 3);
        assert_eq!(byte_at_column(&composer, 15, 20), "héllo".len());
    }
}
