//! Pages of the chat screen: the server status page followed by one page
//! per channel, in the connection's channel order.

pub const STATUS_PAGE: usize = 0;

#[derive(Debug, Default)]
pub struct ChatPager {
    channels: Vec<String>,
    current: usize,
}

impl ChatPager {
    pub fn new(channels: Vec<String>) -> Self {
        Self {
            channels,
            current: STATUS_PAGE,
        }
    }

    /// Rebuild the pages from `channels`. The current page stays on its
    /// channel when that channel survives, otherwise it is clamped.
    pub fn update_channel_list(&mut self, channels: Vec<String>) {
        let previous = self.current_channel().map(str::to_string);
        self.channels = channels;
        self.current = previous
            .and_then(|ch| self.find_channel(&ch))
            .unwrap_or_else(|| self.current.min(self.page_count() - 1));
    }

    pub fn page_count(&self) -> usize {
        self.channel_count() + 1
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Channel shown on `page`; `None` for the status page or out of range.
    pub fn channel(&self, page: usize) -> Option<&str> {
        page.checked_sub(1)
            .and_then(|i| self.channels.get(i))
            .map(String::as_str)
    }

    pub fn page_title(&self, page: usize) -> String {
        match self.channel(page) {
            Some(ch) => ch.to_string(),
            None => "Status".to_string(),
        }
    }

    pub fn find_channel(&self, channel: &str) -> Option<usize> {
        self.channels
            .iter()
            .position(|c| c.eq_ignore_ascii_case(channel))
            .map(|i| i + 1)
    }

    pub fn current_item(&self) -> usize {
        self.current
    }

    /// Returns false when `page` is out of range.
    pub fn set_current_item(&mut self, page: usize) -> bool {
        if page >= self.page_count() {
            return false;
        }
        self.current = page;
        true
    }

    pub fn current_channel(&self) -> Option<&str> {
        self.channel(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pages_follow_channel_list() {
        let channels = list(&["#rust", "#tokio", "alice"]);
        let pager = ChatPager::new(channels.clone());
        assert_eq!(pager.channel_count(), channels.len());
        assert_eq!(pager.page_count(), channels.len() + 1);
        for (i, ch) in channels.iter().enumerate() {
            assert_eq!(pager.find_channel(ch), Some(i + 1));
            assert_eq!(pager.channel(i + 1), Some(ch.as_str()));
        }
        assert_eq!(pager.find_channel("#nope"), None);
        assert_eq!(pager.find_channel("#RUST"), Some(1));
        assert_eq!(pager.channel(STATUS_PAGE), None);
        assert_eq!(pager.page_title(STATUS_PAGE), "Status");
        assert_eq!(pager.channel(9), None);
    }

    #[test]
    fn test_current_page_follows_its_channel() {
        let mut pager = ChatPager::new(list(&["#a", "#b", "#c"]));
        assert!(pager.set_current_item(2));
        pager.update_channel_list(list(&["#b", "#c"]));
        assert_eq!(pager.current_channel(), Some("#b"));
        assert_eq!(pager.current_item(), 1);
    }

    #[test]
    fn test_current_page_is_clamped() {
        let mut pager = ChatPager::new(list(&["#a", "#b"]));
        pager.set_current_item(2);
        pager.update_channel_list(list(&["#x"]));
        assert_eq!(pager.current_item(), 1);
        pager.update_channel_list(Vec::new());
        assert_eq!(pager.current_item(), STATUS_PAGE);
        assert!(!pager.set_current_item(1));
    }
}
