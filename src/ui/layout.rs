use crate::chat::ChatFragment;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const DRAWER_WIDTH: u16 = 22;
pub const MAX_SUGGESTION_ROWS: u16 = 6;
const BUTTON_WIDTH: u16 = 3;

/// Screen state the layout depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutInputs {
    pub app_bar_rows: u16,
    pub compact: bool,
    pub tabs_hidden: bool,
    pub drawer_open: bool,
    pub suggestion_count: usize,
    pub banner: bool,
    pub format_bar: bool,
    pub tab_button: bool,
}

impl LayoutInputs {
    pub fn from_fragment(fragment: &ChatFragment) -> Self {
        let toolbar = fragment.toolbar();
        Self {
            app_bar_rows: toolbar.app_bar_rows(),
            compact: toolbar.is_compact(),
            tabs_hidden: toolbar.tabs_hidden(),
            drawer_open: fragment.drawer().is_open(),
            suggestion_count: fragment.suggestions().items().len(),
            banner: fragment.composer().banner().is_some(),
            format_bar: fragment.is_format_bar_visible(),
            tab_button: fragment.is_tab_button_visible(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatLayout {
    /// Toolbar row; in the compact layout the tab strip shares it.
    pub toolbar: Option<Rect>,
    pub tab_strip: Option<Rect>,
    pub messages: Rect,
    pub drawer: Option<Rect>,
    /// Dropdown overlaid on the bottom of the message view.
    pub suggestions: Option<Rect>,
    pub banner: Option<Rect>,
    pub format_bar: Option<Rect>,
    pub composer: Rect,
    /// Single text row inside the composer border.
    pub composer_text: Rect,
    pub tab_button: Option<Rect>,
    pub send_button: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect, inputs: LayoutInputs) -> ChatLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(inputs.app_bar_rows),
            Constraint::Min(1),                                // Messages
            Constraint::Length(u16::from(inputs.banner)),      // Command banner
            Constraint::Length(u16::from(inputs.format_bar)),  // Format bar
            Constraint::Length(3),                             // Composer
            Constraint::Length(1),                             // Status bar
        ])
        .split(area);

    let app_bar = rows[0];
    let (toolbar, tab_strip) = match (app_bar.height, inputs.compact) {
        (0, _) => (None, None),
        (_, true) => {
            let row = Rect { height: 1, ..app_bar };
            (Some(row), (!inputs.tabs_hidden).then_some(row))
        }
        (_, false) => {
            let toolbar = Rect { height: 1, ..app_bar };
            let strip = (app_bar.height > 1 && !inputs.tabs_hidden).then(|| Rect {
                y: app_bar.y + 1,
                height: 1,
                ..app_bar
            });
            (Some(toolbar), strip)
        }
    };

    let mut messages = rows[1];
    let drawer = if inputs.drawer_open && messages.width > DRAWER_WIDTH * 2 {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(DRAWER_WIDTH)])
            .split(messages);
        messages = split[0];
        Some(split[1])
    } else {
        None
    };

    let suggestions = (inputs.suggestion_count > 0 && messages.height > 0).then(|| {
        let wanted = u16::try_from(inputs.suggestion_count)
            .unwrap_or(u16::MAX)
            .min(MAX_SUGGESTION_ROWS)
            .saturating_add(2);
        let height = wanted.min(messages.height);
        Rect {
            y: messages.bottom() - height,
            height,
            width: messages.width.min(40),
            ..messages
        }
    });

    let composer = rows[4];
    let inner = Rect {
        x: composer.x.saturating_add(1),
        y: composer.y.saturating_add(1),
        width: composer.width.saturating_sub(2),
        height: composer.height.saturating_sub(2).min(1),
    };
    let tab_button = (inputs.tab_button && inner.width > BUTTON_WIDTH * 3).then(|| Rect {
        width: BUTTON_WIDTH,
        ..inner
    });
    let send_button = Rect {
        x: inner.right().saturating_sub(BUTTON_WIDTH),
        width: BUTTON_WIDTH.min(inner.width),
        ..inner
    };
    let text_x = tab_button.map_or(inner.x, |b| b.right());
    let composer_text = Rect {
        x: text_x,
        width: send_button.x.saturating_sub(text_x),
        ..inner
    };

    ChatLayout {
        toolbar,
        tab_strip,
        messages,
        drawer,
        suggestions,
        banner: inputs.banner.then_some(rows[2]),
        format_bar: inputs.format_bar.then_some(rows[3]),
        composer,
        composer_text,
        tab_button,
        send_button,
        status_bar: rows[5],
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 40,
    };

    #[test]
    fn test_expanded_layout_has_separate_tab_row() {
        let layout = compute_layout(
            AREA,
            LayoutInputs {
                app_bar_rows: 2,
                ..Default::default()
            },
        );
        assert_eq!(layout.toolbar.map(|r| r.y), Some(0));
        assert_eq!(layout.tab_strip.map(|r| r.y), Some(1));
        assert_eq!(layout.messages.y, 2);
        assert_eq!(layout.composer.height, 3);
        assert_eq!(layout.status_bar.y, 39);
        assert!(layout.banner.is_none());
    }

    #[test]
    fn test_compact_layout_shares_toolbar_row() {
        let layout = compute_layout(
            AREA,
            LayoutInputs {
                app_bar_rows: 1,
                compact: true,
                ..Default::default()
            },
        );
        assert_eq!(layout.toolbar, layout.tab_strip);
        assert_eq!(layout.messages.y, 1);

        let hidden = compute_layout(AREA, LayoutInputs::default());
        assert!(hidden.toolbar.is_none() && hidden.tab_strip.is_none());
        assert_eq!(hidden.messages.y, 0);
    }

    #[test]
    fn test_optional_rows_and_buttons() {
        let layout = compute_layout(
            AREA,
            LayoutInputs {
                app_bar_rows: 2,
                drawer_open: true,
                suggestion_count: 10,
                banner: true,
                format_bar: true,
                tab_button: true,
                ..Default::default()
            },
        );
        let drawer = layout.drawer.unwrap();
        assert_eq!(drawer.width, DRAWER_WIDTH);
        assert_eq!(layout.messages.right(), drawer.x);
        assert_eq!(layout.suggestions.unwrap().height, MAX_SUGGESTION_ROWS + 2);
        assert_eq!(layout.banner.unwrap().bottom(), layout.format_bar.unwrap().y);
        let tab = layout.tab_button.unwrap();
        assert_eq!(layout.composer_text.x, tab.right());
        assert_eq!(layout.composer_text.right(), layout.send_button.x);
        assert!(contains(layout.send_button, layout.send_button.x, layout.send_button.y));
    }
}
