use crate::chat::suggestions::Suggestions;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Completion dropdown drawn over the bottom of the message view.
pub fn render(frame: &mut Frame, area: Rect, suggestions: &Suggestions) {
    let items: Vec<ListItem> = suggestions
        .items()
        .iter()
        .map(|item| ListItem::new(format!(" {}", item)))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused())
        .style(Theme::suggestion());
    let list = List::new(items)
        .block(block)
        .highlight_style(Theme::suggestion_selected());
    let mut state = ListState::default().with_selected(Some(suggestions.selected()));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

/// Item index under a click at `row`, given the dropdown area.
pub fn item_at_row(area: Rect, suggestions: &Suggestions, row: u16) -> Option<usize> {
    let inner_top = area.y + 1;
    let inner_rows = area.height.saturating_sub(2);
    if row < inner_top || row >= inner_top + inner_rows {
        return None;
    }
    // The list keeps the selection on screen, so it scrolls once the
    // selection passes the last visible row.
    let rows = usize::from(inner_rows);
    let first = (suggestions.selected() + 1).saturating_sub(rows);
    let index = first + usize::from(row - inner_top);
    (index < suggestions.items().len()).then_some(index)
}
