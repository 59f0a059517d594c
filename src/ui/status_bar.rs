use crate::app::state::AppState;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = Vec::new();

    // Active server nick
    if let Some(info) = state.active_connection() {
        parts.push(Span::styled(
            format!(" [{}] ", info.user_nick()),
            Style::default().fg(Color::Green).bg(Color::DarkGray),
        ));
    }

    parts.push(Span::styled(
        format!(" {} ", state.status_line()),
        Theme::status_bar(),
    ));

    // Page indicator
    let page = state
        .fragment
        .as_ref()
        .map(|f| {
            let pager = f.pager();
            format!(" {}/{} ", pager.current_item() + 1, pager.page_count())
        })
        .unwrap_or_default();

    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = usize::from(area.width).saturating_sub(used + page.width());
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        page,
        Style::default().fg(Color::Cyan).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
