use crate::chat::tabs::TabBar;
use crate::chat::ChatFragment;
use crate::irc::session::ConnectionStatus;
use crate::ui::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// Toolbar row. The title is only drawn in the expanded layout; in the
/// compact layout the tab strip takes over the row.
pub fn render_toolbar(frame: &mut Frame, area: Rect, fragment: &ChatFragment) {
    frame.render_widget(Paragraph::new("").style(Theme::app_bar()), area);
    if !fragment.toolbar().shows_title() {
        return;
    }

    let info = fragment.connection_info();
    let (dot, status_style) = match info.status() {
        ConnectionStatus::Connected => ("●", Theme::server_connected()),
        ConnectionStatus::Connecting => ("◌", Theme::server_connecting()),
        ConnectionStatus::Disconnected => ("○", Theme::server_disconnected()),
    };
    let mut spans = vec![
        Span::styled(format!(" {} ", dot), status_style.bg(Theme::APP_BAR_BG)),
        Span::styled(info.name().to_string(), Theme::title().bg(Theme::APP_BAR_BG)),
        Span::styled(format!("  {}", info.user_nick()), Theme::app_bar()),
    ];
    if let Some(channel) = fragment.current_channel() {
        spans.push(Span::styled(
            format!("  {}", channel),
            Style::default().fg(Theme::TEXT_MUTED).bg(Theme::APP_BAR_BG),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if fragment.drawer().lock_mode() == crate::chat::drawer::DrawerLockMode::Unlocked {
        let hint = " ☰ F2 ";
        let width = u16::try_from(hint.width()).unwrap_or(0);
        if area.width > width {
            frame.buffer_mut().set_string(
                area.right() - width,
                area.y,
                hint,
                Theme::app_bar(),
            );
        }
    }
}

pub fn render_tab_strip(frame: &mut Frame, area: Rect, fragment: &ChatFragment) {
    draw_tabs(frame.buffer_mut(), area, fragment.tabs());
}

/// Paint the tab labels, shifted by the strip's scroll offset and clipped
/// to `area`.
pub fn draw_tabs(buf: &mut Buffer, area: Rect, tabs: &TabBar) {
    buf.set_style(area, Theme::app_bar());
    let scroll = tabs.scroll_offset();
    let selected = tabs.selected_tab_position();

    for (index, (tab, (start, width))) in tabs.tabs().iter().zip(tabs.tab_spans()).enumerate() {
        let end = start.saturating_add(width);
        if end <= scroll || start >= scroll.saturating_add(area.width) {
            continue;
        }
        let style = if selected == Some(index) {
            Theme::tab_selected()
        } else {
            Theme::tab()
        };
        let label = tab.label();
        // Labels cut off on the left are drawn from their first visible column.
        let skip = usize::from(scroll.saturating_sub(start));
        let visible: String = label.chars().skip(skip).collect();
        let x = area.x + start.saturating_sub(scroll);
        let room = usize::from(area.right().saturating_sub(x));
        buf.set_stringn(x, area.y, &visible, room, style);

        if tab.highlighted {
            // Recolour the marker so it stands out from the title.
            let marker_col = end.saturating_sub(2);
            if marker_col >= scroll && marker_col < scroll.saturating_add(area.width) {
                let mx = area.x + (marker_col - scroll);
                let marker = if tab.mentioned {
                    Theme::tab_mention_marker()
                } else {
                    Theme::tab_unread_marker()
                };
                buf[(mx, area.y)].set_style(marker);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::tabs::Tab;

    fn row(buf: &Buffer, area: Rect) -> String {
        (area.left()..area.right())
            .map(|x| buf[(x, area.y)].symbol().to_string())
            .collect()
    }

    fn bar(titles: &[&str]) -> TabBar {
        let mut tabs = TabBar::new();
        for title in titles {
            tabs.add_tab(Tab::new(title, None));
        }
        tabs
    }

    #[test]
    fn test_tabs_are_drawn_in_order() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        let mut tabs = bar(&["Status", "#a"]);
        tabs.select(0);
        draw_tabs(&mut buf, area, &tabs);
        assert_eq!(row(&buf, area), " Status   #a        ");
        assert_eq!(buf[(1, 0)].style().fg, Theme::tab_selected().fg);
    }

    #[test]
    fn test_unread_marker_is_recoloured() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        let mut tabs = bar(&["#a"]);
        if let Some(tab) = tabs.tab_at_mut(0) {
            tab.highlighted = true;
        }
        draw_tabs(&mut buf, area, &tabs);
        assert_eq!(buf[(4, 0)].symbol(), "●");
        assert_eq!(buf[(4, 0)].style().fg, Theme::tab_unread_marker().fg);
    }

    #[test]
    fn test_mention_marker_has_its_own_colour() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        let mut tabs = bar(&["#a"]);
        if let Some(tab) = tabs.tab_at_mut(0) {
            tab.highlighted = true;
            tab.mentioned = true;
        }
        draw_tabs(&mut buf, area, &tabs);
        assert_eq!(buf[(4, 0)].symbol(), "●");
        assert_eq!(buf[(4, 0)].style().fg, Theme::tab_mention_marker().fg);
        assert_ne!(Theme::tab_mention_marker().fg, Theme::tab_unread_marker().fg);
    }

    #[test]
    fn test_scrolled_strip_clips_left_tabs() {
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        let mut tabs = bar(&["Status", "#abc"]);
        tabs.set_viewport_width(6);
        tabs.select(1);
        assert!(tabs.scroll_offset() > 0);
        draw_tabs(&mut buf, area, &tabs);
        assert_eq!(row(&buf, area), " #abc ");
    }
}
