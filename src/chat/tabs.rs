//! Horizontal tab strip mirroring the pager.

use unicode_width::UnicodeWidthStr;

/// Columns between two tab labels.
pub const TAB_GAP: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub title: String,
    /// Channel name; `None` for the status page.
    pub tag: Option<String>,
    /// Unread indicator.
    pub highlighted: bool,
    /// Some unread message mentions the user.
    pub mentioned: bool,
}

impl Tab {
    pub fn new(title: &str, tag: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            tag: tag.map(str::to_string),
            highlighted: false,
            mentioned: false,
        }
    }

    /// Rendered label, including the unread marker.
    pub fn label(&self) -> String {
        if self.highlighted {
            format!(" {} ● ", self.title)
        } else {
            format!(" {} ", self.title)
        }
    }

    pub fn width(&self) -> u16 {
        u16::try_from(self.label().width()).unwrap_or(u16::MAX)
    }
}

#[derive(Debug, Default)]
pub struct TabBar {
    tabs: Vec<Tab>,
    selected: Option<usize>,
    /// First visible column of the strip.
    scroll: u16,
    /// Width the strip was last laid out with.
    viewport: u16,
}

impl TabBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_all_tabs(&mut self) {
        self.tabs.clear();
        self.selected = None;
    }

    /// Append a tab without selecting it.
    pub fn add_tab(&mut self, tab: Tab) {
        self.tabs.push(tab);
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    #[cfg(test)]
    pub fn tab_at(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub fn tab_at_mut(&mut self, index: usize) -> Option<&mut Tab> {
        self.tabs.get_mut(index)
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn selected_tab_position(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.selected = Some(index);
        self.ensure_selected_visible();
        true
    }

    /// Start column and width of each tab, before scrolling.
    pub fn tab_spans(&self) -> Vec<(u16, u16)> {
        let mut x: u16 = 0;
        self.tabs
            .iter()
            .map(|tab| {
                let w = tab.width();
                let span = (x, w);
                x = x.saturating_add(w).saturating_add(TAB_GAP);
                span
            })
            .collect()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll
    }

    /// Record the strip width and keep the selection visible. Called
    /// whenever the strip geometry changes.
    pub fn set_viewport_width(&mut self, width: u16) {
        if width != self.viewport {
            self.viewport = width;
            self.ensure_selected_visible();
        }
    }

    pub fn ensure_selected_visible(&mut self) {
        let Some((start, width)) = self.selected.and_then(|i| self.tab_spans().get(i).copied())
        else {
            self.scroll = 0;
            return;
        };
        if self.viewport == 0 {
            return;
        }
        let end = start.saturating_add(width);
        if start < self.scroll {
            self.scroll = start;
        } else if end > self.scroll.saturating_add(self.viewport) {
            self.scroll = end.saturating_sub(self.viewport);
        }
    }

    /// Tab under `column`, relative to the strip's left edge.
    pub fn tab_at_column(&self, column: u16) -> Option<usize> {
        let x = column.saturating_add(self.scroll);
        self.tab_spans()
            .iter()
            .position(|&(start, width)| x >= start && x < start.saturating_add(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(titles: &[&str]) -> TabBar {
        let mut bar = TabBar::new();
        for t in titles {
            bar.add_tab(Tab::new(t, Some(t)));
        }
        bar
    }

    #[test]
    fn test_add_does_not_select() {
        let mut bar = bar(&["Status", "#a"]);
        assert_eq!(bar.selected_tab_position(), None);
        assert!(bar.select(1));
        assert!(!bar.select(5));
        assert_eq!(bar.selected_tab_position(), Some(1));
        bar.remove_all_tabs();
        assert_eq!(bar.tab_count(), 0);
        assert_eq!(bar.selected_tab_position(), None);
    }

    #[test]
    fn test_highlight_widens_label() {
        let mut tab = Tab::new("#a", Some("#a"));
        let plain = tab.width();
        tab.highlighted = true;
        assert_eq!(tab.width(), plain + 2);
    }

    #[test]
    fn test_selected_tab_scrolls_into_view() {
        // Each " #cN " label is 5 columns plus a 1 column gap.
        let mut bar = bar(&["#c0", "#c1", "#c2", "#c3", "#c4"]);
        bar.set_viewport_width(12);
        bar.select(4);
        assert_eq!(bar.scroll_offset(), 29 - 12);
        assert_eq!(bar.tab_at_column(11), Some(4));
        bar.select(0);
        assert_eq!(bar.scroll_offset(), 0);
        assert_eq!(bar.tab_at_column(0), Some(0));
        assert_eq!(bar.tab_at_column(5), None);
    }
}
