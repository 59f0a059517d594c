//! Message input line: editing, history, selection and the inline banner
//! shown after a failed command.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendIconTint {
    Inactive,
    Accent,
}

/// Inline notice shown above the composer after a send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandBanner {
    /// The alias processor failed. `detail` is kept for logs and tests only.
    InternalError { detail: String },
    /// No alias matched. `raw` is the line without its leading `/`.
    NotFound { raw: String },
    /// Plain text typed on the status page.
    NoChannel,
}

impl CommandBanner {
    pub fn message(&self) -> &'static str {
        match self {
            CommandBanner::InternalError { .. } => "An internal error occurred while running the command",
            CommandBanner::NotFound { .. } => "Unknown command",
            CommandBanner::NoChannel => "Not a channel, messages can only be sent to channels",
        }
    }

    pub fn action_label(&self) -> Option<&'static str> {
        match self {
            CommandBanner::NotFound { .. } => Some("Send as raw"),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Composer {
    text: String,
    cursor: usize,
    /// Other end of the selection; `None` when nothing is selected.
    anchor: Option<usize>,
    history: Vec<String>,
    history_index: Option<usize>,
    banner: Option<CommandBanner>,
    tint: SendIconTint,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            anchor: None,
            history: Vec::new(),
            history_index: None,
            banner: None,
            tint: SendIconTint::Inactive,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn send_icon_tint(&self) -> SendIconTint {
        self.tint
    }

    pub fn banner(&self) -> Option<&CommandBanner> {
        self.banner.as_ref()
    }

    pub fn show_banner(&mut self, banner: CommandBanner) {
        self.banner = Some(banner);
    }

    pub fn hide_banner(&mut self) -> Option<CommandBanner> {
        self.banner.take()
    }

    /// Runs after every edit.
    fn on_text_changed(&mut self) {
        self.tint = if self.text.is_empty() {
            SendIconTint::Inactive
        } else {
            SendIconTint::Accent
        };
        self.banner = None;
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
        self.anchor = None;
        self.on_text_changed();
    }

    pub fn clear(&mut self) {
        self.set_text("");
        self.history_index = None;
    }

    /// Remember the current line in history and clear it.
    pub fn commit(&mut self) {
        if !self.text.is_empty() {
            let line = std::mem::take(&mut self.text);
            self.history.push(line);
        }
        self.clear();
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.cursor) {
            std::cmp::Ordering::Less => Some(anchor..self.cursor),
            std::cmp::Ordering::Greater => Some(self.cursor..anchor),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn set_selection(&mut self, range: Range<usize>) {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        if self.text.is_char_boundary(start) && self.text.is_char_boundary(end) {
            self.anchor = Some(start);
            self.cursor = end;
        }
    }

    /// Replace `range` with `with` and leave the cursor after the inserted text.
    pub fn replace_range(&mut self, range: Range<usize>, with: &str) {
        self.text.replace_range(range.clone(), with);
        self.cursor = range.start + with.len();
        self.anchor = None;
        self.on_text_changed();
    }

    fn delete_selection(&mut self) -> bool {
        match self.selection() {
            Some(range) => {
                self.replace_range(range, "");
                true
            }
            None => {
                self.anchor = None;
                false
            }
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.delete_selection();
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.on_text_changed();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        self.on_text_changed();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.text.len())
    }

    pub fn delete_back(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        self.on_text_changed();
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection() || self.cursor >= self.text.len() {
            return;
        }
        let next = self.next_boundary();
        self.text.drain(self.cursor..next);
        self.on_text_changed();
    }

    pub fn delete_word_back(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        let mut pos = self.cursor;
        while pos > 0 && self.text.as_bytes().get(pos - 1) == Some(&b' ') {
            pos -= 1;
        }
        while pos > 0 && self.text.as_bytes().get(pos - 1) != Some(&b' ') {
            pos -= 1;
        }
        self.text.drain(pos..self.cursor);
        self.cursor = pos;
        self.on_text_changed();
    }

    /// Delete from the cursor to the start of the line.
    pub fn delete_to_start(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.text.drain(..self.cursor);
        self.cursor = 0;
        self.anchor = None;
        self.on_text_changed();
    }

    /// Start or drop the selection before a cursor movement.
    fn begin_move(&mut self, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        self.begin_move(extend);
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self, extend: bool) {
        self.begin_move(extend);
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self, extend: bool) {
        self.begin_move(extend);
        self.cursor = 0;
    }

    pub fn move_end(&mut self, extend: bool) {
        self.begin_move(extend);
        self.cursor = self.text.len();
    }

    /// Place the cursor at a byte offset, snapping back to a char boundary.
    pub fn set_cursor(&mut self, pos: usize) {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        self.cursor = pos;
        self.anchor = None;
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => return,
            None => self.history.len() - 1,
        };
        self.history_index = Some(idx);
        let line = self.history[idx].clone();
        self.set_text(&line);
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                self.history_index = Some(i + 1);
                let line = self.history[i + 1].clone();
                self.set_text(&line);
            }
            Some(_) => {
                self.history_index = None;
                self.set_text("");
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_follows_text() {
        let mut c = Composer::new();
        assert_eq!(c.send_icon_tint(), SendIconTint::Inactive);
        c.insert_char('h');
        assert_eq!(c.send_icon_tint(), SendIconTint::Accent);
        c.delete_back();
        assert_eq!(c.send_icon_tint(), SendIconTint::Inactive);
    }

    #[test]
    fn test_edit_hides_banner() {
        let mut c = Composer::new();
        c.set_text("/foo");
        c.show_banner(CommandBanner::NotFound { raw: "foo".into() });
        c.move_left(false);
        assert!(c.banner().is_some());
        c.insert_char('x');
        assert!(c.banner().is_none());
    }

    #[test]
    fn test_selection_and_replace() {
        let mut c = Composer::new();
        c.set_text("héllo world");
        c.move_home(false);
        for _ in 0..5 {
            c.move_right(true);
        }
        assert_eq!(c.selection(), Some(0..6));
        c.insert_str("bye");
        assert_eq!(c.text(), "bye world");
        assert!(!c.has_selection());
        assert_eq!(c.cursor(), 3);
    }

    #[test]
    fn test_history() {
        let mut c = Composer::new();
        c.set_text("one");
        c.commit();
        c.set_text("two");
        c.commit();
        assert!(c.is_empty());

        c.history_up();
        assert_eq!(c.text(), "two");
        c.history_up();
        assert_eq!(c.text(), "one");
        c.history_down();
        assert_eq!(c.text(), "two");
        c.history_down();
        assert_eq!(c.text(), "");
    }

    #[test]
    fn test_delete_word_back() {
        let mut c = Composer::new();
        c.set_text("hello big  world");
        c.delete_word_back();
        assert_eq!(c.text(), "hello big  ");
        c.delete_word_back();
        assert_eq!(c.text(), "hello ");
    }

    #[test]
    fn test_banner_actions() {
        assert_eq!(
            CommandBanner::NotFound { raw: "x".into() }.action_label(),
            Some("Send as raw")
        );
        assert_eq!(CommandBanner::NoChannel.action_label(), None);
    }
}
