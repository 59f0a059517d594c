//! Side drawer listing the members of the current channel.

use crate::irc::session::NickWithPrefix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerLockMode {
    LockedClosed,
    Unlocked,
}

#[derive(Debug)]
pub struct MemberDrawer {
    members: Vec<NickWithPrefix>,
    lock_mode: DrawerLockMode,
    open: bool,
    scroll: usize,
}

impl Default for MemberDrawer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberDrawer {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            lock_mode: DrawerLockMode::LockedClosed,
            open: false,
            scroll: 0,
        }
    }

    /// Replace the member list. An absent or empty list locks the drawer
    /// closed.
    pub fn set_members(&mut self, members: Option<Vec<NickWithPrefix>>) {
        self.members = members.unwrap_or_default();
        self.scroll = 0;
        if self.members.is_empty() {
            self.lock_mode = DrawerLockMode::LockedClosed;
            self.open = false;
        } else {
            self.lock_mode = DrawerLockMode::Unlocked;
        }
    }

    pub fn members(&self) -> &[NickWithPrefix] {
        &self.members
    }

    pub fn nicks(&self) -> Vec<String> {
        self.members.iter().map(|m| m.nick.clone()).collect()
    }

    pub fn lock_mode(&self) -> DrawerLockMode {
        self.lock_mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns whether the drawer is open afterwards.
    pub fn toggle(&mut self) -> bool {
        if self.lock_mode == DrawerLockMode::Unlocked {
            self.open = !self.open;
        }
        self.open
    }

    pub fn close_drawer(&mut self) {
        self.open = false;
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: isize, visible_rows: usize) {
        let max = self.members.len().saturating_sub(visible_rows);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }
}
