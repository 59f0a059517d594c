//! App bar layout: the tab strip either sits in its own row below the
//! toolbar or is merged into the toolbar row to save height.

use crate::config::CompactMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabParent {
    /// Separate row below the toolbar.
    AppBar,
    /// Inside the toolbar row, replacing the title.
    Toolbar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarThresholds {
    /// Below this height `auto` mode turns compact.
    pub compact_height: u16,
    /// Below this height the app bar is hidden entirely.
    pub collapse_height: u16,
}

#[derive(Debug)]
pub struct ToolbarLayout {
    tab_parent: TabParent,
    app_bar_visible: bool,
    tabs_hidden: bool,
}

impl Default for ToolbarLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolbarLayout {
    pub fn new() -> Self {
        Self {
            tab_parent: TabParent::AppBar,
            app_bar_visible: true,
            tabs_hidden: false,
        }
    }

    pub fn is_compact(&self) -> bool {
        self.tab_parent == TabParent::Toolbar
    }

    /// The title gives way to the tabs when they share the toolbar row.
    pub fn shows_title(&self) -> bool {
        !self.is_compact() || self.tabs_hidden
    }

    pub fn tabs_hidden(&self) -> bool {
        self.tabs_hidden
    }

    pub fn set_tabs_hidden(&mut self, hidden: bool) {
        self.tabs_hidden = hidden;
    }

    /// Rows taken by the app bar in the current state.
    pub fn app_bar_rows(&self) -> u16 {
        match (self.app_bar_visible, self.tab_parent, self.tabs_hidden) {
            (false, _, _) => 0,
            (true, TabParent::Toolbar, _) | (true, _, true) => 1,
            (true, TabParent::AppBar, false) => 2,
        }
    }

    /// Switch layouts. Returns whether anything changed.
    pub fn set_use_compact_layout(&mut self, enable: bool) -> bool {
        if enable == self.is_compact() {
            return false;
        }
        self.tab_parent = if enable {
            TabParent::Toolbar
        } else {
            TabParent::AppBar
        };
        tracing::debug!(compact = enable, "toolbar layout changed");
        true
    }

    pub fn update_compact_layout_status(
        &mut self,
        mode: CompactMode,
        height: u16,
        thresholds: ToolbarThresholds,
    ) -> bool {
        let enabled = mode == CompactMode::Always
            || (mode == CompactMode::Auto && height < thresholds.compact_height);
        self.set_use_compact_layout(enabled)
    }

    /// Re-evaluate after the available height changed. Very short screens
    /// hide the app bar and leave the compact state untouched.
    pub fn on_layout_changed(
        &mut self,
        mode: CompactMode,
        height: u16,
        thresholds: ToolbarThresholds,
    ) -> bool {
        if height < thresholds.collapse_height {
            let changed = self.app_bar_visible;
            self.app_bar_visible = false;
            return changed;
        }
        let shown = !self.app_bar_visible;
        self.app_bar_visible = true;
        self.update_compact_layout_status(mode, height, thresholds) || shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: ToolbarThresholds = ToolbarThresholds {
        compact_height: 30,
        collapse_height: 12,
    };

    #[test]
    fn test_transition_happens_once() {
        let mut bar = ToolbarLayout::new();
        assert!(bar.set_use_compact_layout(true));
        assert!(!bar.set_use_compact_layout(true));
        assert!(bar.is_compact());
        assert!(!bar.shows_title());
        assert!(bar.set_use_compact_layout(false));
        assert!(!bar.is_compact());
        assert_eq!(bar.app_bar_rows(), 2);
    }

    #[test]
    fn test_mode_rules() {
        let mut bar = ToolbarLayout::new();
        assert!(bar.update_compact_layout_status(CompactMode::Always, 100, T));
        assert!(bar.update_compact_layout_status(CompactMode::Never, 5, T));
        assert!(!bar.is_compact());
        assert!(!bar.update_compact_layout_status(CompactMode::Auto, 30, T));
        assert!(bar.update_compact_layout_status(CompactMode::Auto, 29, T));
        assert!(!bar.update_compact_layout_status(CompactMode::Auto, 20, T));
    }

    #[test]
    fn test_short_screen_hides_app_bar() {
        let mut bar = ToolbarLayout::new();
        assert_eq!(bar.app_bar_rows(), 2);
        assert!(bar.on_layout_changed(CompactMode::Auto, 10, T));
        assert_eq!(bar.app_bar_rows(), 0);
        assert!(!bar.on_layout_changed(CompactMode::Auto, 11, T));

        assert!(bar.on_layout_changed(CompactMode::Auto, 20, T));
        assert!(bar.is_compact());
        assert_eq!(bar.app_bar_rows(), 1);
    }
}
