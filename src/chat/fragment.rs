//! The chat screen of one connection.
//!
//! A [`ChatFragment`] ties the pager, tab strip, composer, member drawer and
//! toolbar to a [`ServerConnectionInfo`]. It registers its listeners when it
//! is created and removes them in [`ChatFragment::destroy_view`]. Listener
//! callbacks run on connection tasks and only post [`AppEvent`]s; the UI
//! loop then calls back into the fragment.

use crate::alias::{CommandAliasManager, CommandOutcome, VariableContext, VAR_CHANNEL, VAR_MYNICK};
use crate::app::event::AppEvent;
use crate::chat::composer::{CommandBanner, Composer};
use crate::chat::drawer::MemberDrawer;
use crate::chat::format::{apply_format, TextFormat};
use crate::chat::pager::ChatPager;
use crate::chat::suggestions::{CompletionSource, Suggestions};
use crate::chat::tabs::{Tab, TabBar};
use crate::chat::toolbar::{ToolbarLayout, ToolbarThresholds};
use crate::config::{PreferenceKey, Settings};
use crate::irc::session::{ChatMessage, NickWithPrefix, ServerConnectionInfo};
use crate::util::ListenerId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Two composer clicks closer than this count as a double tap.
pub const DOUBLE_TAP_TIMEOUT: Duration = Duration::from_millis(400);

/// Whether an unread count change flips a tab's indicator: the count
/// dropped to zero, or rose from zero.
pub fn crosses_zero(count: usize, old_count: usize) -> bool {
    count == 0 || old_count == 0
}

/// First channel of a `/join` line, without the leading slash.
fn joined_channel(command: &str) -> Option<String> {
    let mut words = command.split_whitespace();
    if !words.next()?.eq_ignore_ascii_case("join") {
        return None;
    }
    words.next()?.split(',').next().map(str::to_string)
}

struct Registrations {
    channel_list: ListenerId,
    unread: ListenerId,
    preferences: Vec<(PreferenceKey, ListenerId)>,
}

pub struct ChatFragment {
    info: Arc<ServerConnectionInfo>,
    settings: Arc<Settings>,
    aliases: Arc<CommandAliasManager>,
    registrations: Option<Registrations>,

    pager: ChatPager,
    tabs: TabBar,
    composer: Composer,
    suggestions: Suggestions,
    drawer: MemberDrawer,
    toolbar: ToolbarLayout,

    format_bar_visible: bool,
    tab_button_visible: bool,
    double_tap_complete: bool,
    last_click: Option<Instant>,
    /// Channel to switch to once the server confirms our join.
    pending_join: Option<String>,
    /// Lines scrolled up from the bottom of the message view.
    message_scroll: usize,
    height: u16,
}

impl ChatFragment {
    pub fn new(
        info: Arc<ServerConnectionInfo>,
        settings: Arc<Settings>,
        aliases: Arc<CommandAliasManager>,
        ui_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let tx = ui_tx.clone();
        let channel_list = info.add_on_channel_list_change_listener(move |change| {
            let _ = tx.send(AppEvent::ChannelListChanged {
                server_id: change.server_id,
            });
        });

        let tx = ui_tx.clone();
        let unread = info
            .notification_manager()
            .add_unread_message_count_callback(move |change| {
                if crosses_zero(change.count, change.old_count) || change.mention_raised {
                    let _ = tx.send(AppEvent::UnreadCountChanged {
                        server_id: change.server_id,
                        channel: change.channel.clone(),
                    });
                }
            });

        let preferences = PreferenceKey::ALL
            .iter()
            .map(|&key| {
                let tx = ui_tx.clone();
                let id = settings.add_preference_change_listener(key, move |key| {
                    let _ = tx.send(AppEvent::PreferenceChanged { key: *key });
                });
                (key, id)
            })
            .collect();

        let mut fragment = Self {
            pager: ChatPager::new(info.channels()),
            tabs: TabBar::new(),
            composer: Composer::new(),
            suggestions: Suggestions::new(),
            drawer: MemberDrawer::new(),
            toolbar: ToolbarLayout::new(),
            format_bar_visible: false,
            tab_button_visible: settings.is_nick_autocomplete_button_visible(),
            double_tap_complete: settings.is_nick_autocomplete_double_tap_enabled(),
            last_click: None,
            pending_join: None,
            message_scroll: 0,
            height: 0,
            registrations: Some(Registrations {
                channel_list,
                unread,
                preferences,
            }),
            info,
            settings,
            aliases,
        };
        fragment.update_tab_layout_tabs();
        fragment.on_page_selected(fragment.pager.current_item());
        tracing::debug!(server_id = fragment.info.id(), "chat view created");
        fragment
    }

    /// Remove every listener registered in [`new`](Self::new). Safe to call
    /// more than once.
    pub fn destroy_view(&mut self) {
        let Some(reg) = self.registrations.take() else {
            return;
        };
        self.info.remove_on_channel_list_change_listener(reg.channel_list);
        self.info
            .notification_manager()
            .remove_unread_message_count_callback(reg.unread);
        for (key, id) in reg.preferences {
            self.settings.remove_preference_change_listener(key, id);
        }
        self.info.notification_manager().set_open_channel(None);
        tracing::debug!(server_id = self.info.id(), "chat view destroyed");
    }

    pub fn connection_info(&self) -> &Arc<ServerConnectionInfo> {
        &self.info
    }

    pub fn pager(&self) -> &ChatPager {
        &self.pager
    }

    pub fn tabs(&self) -> &TabBar {
        &self.tabs
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn suggestions(&self) -> &Suggestions {
        &self.suggestions
    }

    pub fn drawer(&self) -> &MemberDrawer {
        &self.drawer
    }

    pub fn toolbar(&self) -> &ToolbarLayout {
        &self.toolbar
    }

    pub fn is_format_bar_visible(&self) -> bool {
        self.format_bar_visible
    }

    pub fn is_tab_button_visible(&self) -> bool {
        self.tab_button_visible
    }

    pub fn is_double_tap_complete_enabled(&self) -> bool {
        self.double_tap_complete
    }

    pub fn message_scroll(&self) -> usize {
        self.message_scroll
    }

    /// Scroll the message view; `delta > 0` moves back in time.
    pub fn scroll_messages(&mut self, delta: isize) {
        let max = self.info.messages(self.pager.current_channel()).len();
        self.message_scroll = self.message_scroll.saturating_add_signed(delta).min(max);
    }

    /// Scrollback of the current page.
    pub fn current_messages(&self) -> Vec<ChatMessage> {
        self.info.messages(self.pager.current_channel())
    }

    pub fn current_channel(&self) -> Option<&str> {
        self.pager.current_channel()
    }

    // Pages and tabs

    pub fn on_channel_list_changed(&mut self) {
        let before = self.pager.current_channel().map(str::to_string);
        self.pager.update_channel_list(self.info.channels());
        self.update_tab_layout_tabs();
        if self.pager.current_channel() != before.as_deref() {
            self.on_page_selected(self.pager.current_item());
        }
        let joined = self
            .pending_join
            .as_deref()
            .is_some_and(|c| self.pager.find_channel(c).is_some());
        if joined {
            if let Some(channel) = self.pending_join.take() {
                self.set_current_channel(&channel);
            }
        }
    }

    /// Recreate every tab from the pager and mirror its current item.
    pub fn update_tab_layout_tabs(&mut self) {
        self.tabs.remove_all_tabs();
        for page in 0..self.pager.page_count() {
            let tab = Tab::new(&self.pager.page_title(page), self.pager.channel(page));
            self.tabs.add_tab(tab);
            self.update_tab_layout_tab(page);
        }
        let current = self.pager.current_item();
        if Some(current) != self.tabs.selected_tab_position() && current < self.tabs.tab_count() {
            self.tabs.select(current);
        }
    }

    /// Refresh one tab's unread indicator from the notification manager.
    pub fn update_tab_layout_tab(&mut self, index: usize) {
        let notifications = self.info.notification_manager();
        if let Some(tab) = self.tabs.tab_at_mut(index) {
            let channel = tab.tag.as_deref();
            tab.highlighted = channel.is_some_and(|c| notifications.has_unread_messages(c));
            tab.mentioned = tab.highlighted && channel.is_some_and(|c| notifications.has_mention(c));
        }
    }

    pub fn on_unread_count_changed(&mut self, channel: &str) {
        if let Some(page) = self.pager.find_channel(channel) {
            self.update_tab_layout_tab(page);
        }
    }

    pub fn select_page(&mut self, page: usize) -> bool {
        if page == self.pager.current_item() || !self.pager.set_current_item(page) {
            return false;
        }
        self.tabs.select(page);
        self.on_page_selected(page);
        true
    }

    pub fn select_next_page(&mut self) {
        let next = (self.pager.current_item() + 1) % self.pager.page_count();
        self.select_page(next);
    }

    pub fn select_prev_page(&mut self) {
        let count = self.pager.page_count();
        self.select_page((self.pager.current_item() + count - 1) % count);
    }

    fn on_page_selected(&mut self, page: usize) {
        let channel = self.pager.channel(page).map(str::to_string);
        self.info
            .notification_manager()
            .set_open_channel(channel.as_deref());
        self.update_tab_layout_tab(page);
        self.set_current_channel_members(
            channel.as_deref().and_then(|c| self.info.channel_members(c)),
        );
        self.suggestions.dismiss();
        self.message_scroll = 0;
    }

    /// Jump to `channel`'s page; does nothing for an unknown channel.
    pub fn set_current_channel(&mut self, channel: &str) {
        if let Some(page) = self.pager.find_channel(channel) {
            self.select_page(page);
        }
    }

    pub fn set_current_channel_members(&mut self, members: Option<Vec<NickWithPrefix>>) {
        self.drawer.set_members(members);
    }

    /// Pick up member list changes of the current channel.
    pub fn refresh_members(&mut self) {
        let members = self
            .pager
            .current_channel()
            .and_then(|c| self.info.channel_members(c));
        if members.as_deref().unwrap_or_default() != self.drawer.members() {
            self.set_current_channel_members(members);
        }
    }

    pub fn set_tabs_hidden(&mut self, hidden: bool) {
        self.toolbar.set_tabs_hidden(hidden);
    }

    pub fn set_tab_strip_width(&mut self, width: u16) {
        self.tabs.set_viewport_width(width);
    }

    // Toolbar

    fn toolbar_thresholds(&self) -> ToolbarThresholds {
        ToolbarThresholds {
            compact_height: self.settings.compact_toolbar_height(),
            collapse_height: self.settings.collapse_toolbar_height(),
        }
    }

    /// Re-evaluate the app bar for a new screen height. Returns whether
    /// the layout changed.
    pub fn on_layout_changed(&mut self, height: u16) -> bool {
        self.height = height;
        let mode = self.settings.chat_appbar_compact_mode();
        let thresholds = self.toolbar_thresholds();
        self.toolbar.on_layout_changed(mode, height, thresholds)
    }

    pub fn update_toolbar_compact_layout_status(&mut self, height: u16) -> bool {
        let mode = self.settings.chat_appbar_compact_mode();
        let thresholds = self.toolbar_thresholds();
        self.toolbar
            .update_compact_layout_status(mode, height, thresholds)
    }

    pub fn on_preference_changed(&mut self, key: PreferenceKey) {
        tracing::debug!(key = key.as_str(), "applying preference");
        if self.height > 0 {
            self.update_toolbar_compact_layout_status(self.height);
        }
        self.set_tab_button_visible(self.settings.is_nick_autocomplete_button_visible());
        self.set_double_tap_complete_enabled(self.settings.is_nick_autocomplete_double_tap_enabled());
    }

    // Composer

    pub fn send_message(&mut self) {
        let text = self.composer.text().to_string();
        if text.is_empty() {
            return;
        }
        let channel = self.pager.current_channel().map(str::to_string);

        if let Some(command) = text.strip_prefix('/') {
            let mut vars = VariableContext::new();
            vars.set_opt(VAR_CHANNEL, channel.as_deref());
            vars.set(VAR_MYNICK, self.info.user_nick());
            let api = self.info.api();
            match self.aliases.process_command(api.as_ref(), command, &vars) {
                Ok(CommandOutcome::Executed) => {
                    self.composer.commit();
                    self.suggestions.dismiss();
                    if let Some(target) = joined_channel(command) {
                        if self.pager.find_channel(&target).is_some() {
                            self.set_current_channel(&target);
                        } else {
                            self.pending_join = Some(target);
                        }
                    }
                }
                Ok(CommandOutcome::NotFound) => {
                    self.composer.show_banner(CommandBanner::NotFound {
                        raw: command.to_string(),
                    });
                    self.suggestions.dismiss();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "command failed");
                    self.composer.show_banner(CommandBanner::InternalError {
                        detail: e.to_string(),
                    });
                    self.suggestions.dismiss();
                }
            }
            return;
        }

        let Some(channel) = channel else {
            self.composer.show_banner(CommandBanner::NoChannel);
            self.suggestions.dismiss();
            return;
        };
        self.composer.commit();
        self.suggestions.dismiss();
        if let Err(e) = self.info.api().send_message(&channel, &text) {
            tracing::warn!(channel = %channel, error = %e, "failed to send message");
        }
    }

    /// The banner's "send as raw" action. Returns false when there was no
    /// such banner.
    pub fn send_raw_from_banner(&mut self) -> bool {
        let Some(CommandBanner::NotFound { raw }) = self.composer.banner().cloned() else {
            return false;
        };
        if let Err(e) = self.info.api().send_command_raw(&raw) {
            tracing::warn!(error = %e, "failed to send raw command");
        }
        self.composer.hide_banner();
        true
    }

    pub fn dismiss_banner(&mut self) -> bool {
        self.composer.hide_banner().is_some()
    }

    /// Edit the composer and keep an open suggestion dropdown filtered.
    pub fn edit_composer(&mut self, edit: impl FnOnce(&mut Composer)) {
        edit(&mut self.composer);
        if self.suggestions.is_visible() {
            let source = self.completion_source();
            self.suggestions.refilter(&self.composer, &source);
        }
    }

    fn completion_source(&self) -> CompletionSource {
        CompletionSource {
            commands: self
                .aliases
                .alias_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            channels: self.pager.channels().to_vec(),
            nicks: self.drawer.nicks(),
            channel_types: self.info.channel_types(),
        }
    }

    pub fn request_tab_complete(&mut self) -> bool {
        let source = self.completion_source();
        self.suggestions
            .request_tab_complete(&mut self.composer, &source)
    }

    pub fn accept_suggestion(&mut self) -> bool {
        self.suggestions.accept(&mut self.composer)
    }

    pub fn dismiss_drop_down(&mut self) -> bool {
        let visible = self.suggestions.is_visible();
        self.suggestions.dismiss();
        visible
    }

    pub fn select_next_suggestion(&mut self) {
        self.suggestions.select_next();
    }

    pub fn select_prev_suggestion(&mut self) {
        self.suggestions.select_prev();
    }

    pub fn select_suggestion(&mut self, index: usize) {
        self.suggestions.select(index);
    }

    /// A click on the composer. Completes on a double tap when enabled.
    pub fn on_composer_click(&mut self, now: Instant) -> bool {
        if !self.is_double_tap_complete_enabled() {
            return false;
        }
        match self.last_click.take() {
            Some(prev) if now.saturating_duration_since(prev) <= DOUBLE_TAP_TIMEOUT => {
                self.request_tab_complete();
                true
            }
            _ => {
                self.last_click = Some(now);
                false
            }
        }
    }

    pub fn set_tab_button_visible(&mut self, visible: bool) {
        self.tab_button_visible = visible;
    }

    pub fn set_double_tap_complete_enabled(&mut self, enabled: bool) {
        self.double_tap_complete = enabled;
        if !enabled {
            self.last_click = None;
        }
    }

    // Formatting

    pub fn has_send_message_text_selection(&self) -> bool {
        self.composer.has_selection()
    }

    pub fn set_format_bar_visible(&mut self, visible: bool) {
        self.format_bar_visible = visible;
    }

    /// The format action is only offered while text is selected.
    pub fn show_format_bar_for_selection(&mut self) -> bool {
        if self.has_send_message_text_selection() {
            self.format_bar_visible = true;
        }
        self.format_bar_visible
    }

    pub fn apply_format(&mut self, format: TextFormat) {
        apply_format(&mut self.composer, format);
    }

    // Drawer

    pub fn toggle_drawer(&mut self) -> bool {
        self.drawer.toggle()
    }

    pub fn close_drawer(&mut self) {
        self.drawer.close_drawer();
    }

    pub fn scroll_drawer(&mut self, delta: isize, visible_rows: usize) {
        self.drawer.scroll_by(delta, visible_rows);
    }
}

impl Drop for ChatFragment {
    fn drop(&mut self) {
        self.destroy_view();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::ChatConfig;
    use crate::config::CompactMode;
    use crate::irc::api::testing::{RecordingApi, SentCall};
    use crate::irc::session::ConnectionData;

    struct Fixture {
        api: Arc<RecordingApi>,
        info: Arc<ServerConnectionInfo>,
        settings: Arc<Settings>,
        rx: mpsc::UnboundedReceiver<AppEvent>,
        fragment: ChatFragment,
    }

    fn fixture(channels: &[&str]) -> Fixture {
        let api = RecordingApi::new();
        let info = Arc::new(ServerConnectionInfo::new(
            7,
            "test",
            ConnectionData::shared("me", 100),
            api.clone(),
        ));
        info.set_channels(channels.iter().map(|c| c.to_string()).collect());
        let settings = Arc::new(Settings::new(ChatConfig::default()));
        let aliases = Arc::new(CommandAliasManager::new(&[]));
        let (tx, rx) = mpsc::unbounded_channel();
        let fragment = ChatFragment::new(Arc::clone(&info), Arc::clone(&settings), aliases, tx);
        Fixture {
            api,
            info,
            settings,
            rx,
            fragment,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_tabs_mirror_pages_after_channel_list_change() {
        let mut f = fixture(&["#a"]);
        f.info
            .set_channels(vec!["#x".into(), "#y".into(), "bob".into()]);
        let events = drain(&mut f.rx);
        assert!(matches!(
            events.as_slice(),
            [AppEvent::ChannelListChanged { server_id: 7 }]
        ));

        f.fragment.on_channel_list_changed();
        let pager = f.fragment.pager();
        assert_eq!(pager.channel_count(), 3);
        assert_eq!(pager.page_count(), 4);
        assert_eq!(f.fragment.tabs().tab_count(), pager.page_count());
        for (i, ch) in ["#x", "#y", "bob"].iter().enumerate() {
            assert_eq!(pager.find_channel(ch), Some(i + 1));
            assert_eq!(f.fragment.tabs().tab_at(i + 1).unwrap().tag.as_deref(), Some(*ch));
        }
        assert_eq!(f.fragment.tabs().tab_at(0).unwrap().tag, None);
        assert_eq!(
            f.fragment.tabs().selected_tab_position(),
            Some(pager.current_item())
        );
    }

    #[test]
    fn test_empty_text_is_not_sent() {
        let mut f = fixture(&["#test"]);
        f.fragment.set_current_channel("#test");
        f.fragment.send_message();
        assert!(f.api.calls().is_empty());
        assert!(f.fragment.composer().banner().is_none());
    }

    #[test]
    fn test_plain_text_goes_to_current_channel() {
        let mut f = fixture(&["#test"]);
        f.fragment.set_current_channel("#test");
        f.fragment.edit_composer(|c| c.set_text("hello"));
        f.fragment.send_message();
        assert_eq!(
            f.api.calls(),
            vec![SentCall::Message {
                channel: "#test".into(),
                text: "hello".into()
            }]
        );
        assert!(f.fragment.composer().is_empty());
    }

    #[test]
    fn test_unknown_command_offers_raw_send() {
        let mut f = fixture(&["#test"]);
        f.fragment.set_current_channel("#test");
        f.fragment
            .edit_composer(|c| c.set_text("/nonexistentcmd arg"));
        f.fragment.send_message();
        assert!(f.api.calls().is_empty());
        assert_eq!(f.fragment.composer().text(), "/nonexistentcmd arg");
        assert!(matches!(
            f.fragment.composer().banner(),
            Some(CommandBanner::NotFound { .. })
        ));

        assert!(f.fragment.send_raw_from_banner());
        assert!(!f.fragment.send_raw_from_banner());
        assert_eq!(
            f.api.calls(),
            vec![SentCall::Raw("nonexistentcmd arg".into())]
        );
        assert!(f.fragment.composer().banner().is_none());
    }

    #[test]
    fn test_known_command_clears_composer() {
        let mut f = fixture(&["#test"]);
        f.fragment.set_current_channel("#test");
        f.fragment.edit_composer(|c| c.set_text("/me waves"));
        f.fragment.send_message();
        assert_eq!(
            f.api.calls(),
            vec![SentCall::Raw("PRIVMSG #test :\x01ACTION waves\x01".into())]
        );
        assert!(f.fragment.composer().is_empty());
    }

    #[test]
    fn test_command_error_keeps_text() {
        let mut f = fixture(&["#test"]);
        f.fragment.edit_composer(|c| c.set_text("/join"));
        f.fragment.send_message();
        assert!(matches!(
            f.fragment.composer().banner(),
            Some(CommandBanner::InternalError { .. })
        ));
        assert_eq!(f.fragment.composer().text(), "/join");
        assert!(f.api.calls().is_empty());

        // The next edit hides the banner.
        f.fragment.edit_composer(|c| c.insert_char(' '));
        assert!(f.fragment.composer().banner().is_none());
    }

    #[test]
    fn test_status_page_refuses_plain_text() {
        let mut f = fixture(&["#test"]);
        f.fragment.edit_composer(|c| c.set_text("hello"));
        f.fragment.send_message();
        assert_eq!(f.fragment.composer().banner(), Some(&CommandBanner::NoChannel));
        assert!(f.api.calls().is_empty());
    }

    #[test]
    fn test_unread_indicator_transitions() {
        assert!(crosses_zero(3, 0));
        assert!(!crosses_zero(1, 3));
        assert!(crosses_zero(0, 1));

        let mut f = fixture(&["#test", "#other"]);
        drain(&mut f.rx);
        let notifications = f.info.notification_manager();
        for _ in 0..3 {
            notifications.on_message("#test", false);
        }
        let events = drain(&mut f.rx);
        assert_eq!(events.len(), 1);
        let AppEvent::UnreadCountChanged { channel, .. } = &events[0] else {
            panic!("unexpected event {:?}", events[0]);
        };
        f.fragment.on_unread_count_changed(channel);
        assert!(f.fragment.tabs().tab_at(1).unwrap().highlighted);

        // Opening the page clears the count and posts the 3 -> 0 change.
        f.fragment.set_current_channel("#test");
        let events = drain(&mut f.rx);
        assert_eq!(events.len(), 1);
        f.fragment.on_unread_count_changed("#test");
        assert!(!f.fragment.tabs().tab_at(1).unwrap().highlighted);

        // Unknown channels are ignored.
        f.fragment.on_unread_count_changed("#gone");
    }

    #[test]
    fn test_later_mention_reaches_the_tab() {
        let mut f = fixture(&["#test", "#other"]);
        drain(&mut f.rx);
        let notifications = f.info.notification_manager();
        notifications.on_message("#test", false);
        notifications.on_message("#test", false);
        notifications.on_message("#test", true);

        let events = drain(&mut f.rx);
        assert_eq!(events.len(), 2);
        f.fragment.on_unread_count_changed("#test");
        let tab = f.fragment.tabs().tab_at(1).unwrap();
        assert!(tab.highlighted);
        assert!(tab.mentioned);
        assert!(!f.fragment.tabs().tab_at(2).unwrap().mentioned);
    }

    #[test]
    fn test_join_switches_to_the_new_channel() {
        let mut f = fixture(&["#a"]);
        f.fragment.edit_composer(|c| c.set_text("/join #b"));
        f.fragment.send_message();
        assert_eq!(f.fragment.current_channel(), None);

        f.info.set_channels(vec!["#a".into(), "#b".into()]);
        f.fragment.on_channel_list_changed();
        assert_eq!(f.fragment.current_channel(), Some("#b"));

        // Joining a channel that already has a page switches at once.
        f.fragment.edit_composer(|c| c.set_text("/join #a"));
        f.fragment.send_message();
        assert_eq!(f.fragment.current_channel(), Some("#a"));
        f.fragment.on_channel_list_changed();
        assert_eq!(f.fragment.current_channel(), Some("#a"));
    }

    #[test]
    fn test_compact_transition_happens_once() {
        let mut f = fixture(&[]);
        assert!(f.fragment.on_layout_changed(20));
        assert!(f.fragment.toolbar().is_compact());
        assert!(!f.fragment.on_layout_changed(20));
        assert!(!f.fragment.update_toolbar_compact_layout_status(20));
    }

    #[test]
    fn test_preference_change_is_posted_and_applied() {
        let mut f = fixture(&[]);
        f.fragment.on_layout_changed(40);
        assert!(!f.fragment.toolbar().is_compact());

        f.settings.set_chat_appbar_compact_mode(CompactMode::Always);
        f.settings.set_nick_autocomplete_button_visible(true);
        let events = drain(&mut f.rx);
        assert_eq!(events.len(), 2);
        for event in events {
            if let AppEvent::PreferenceChanged { key } = event {
                f.fragment.on_preference_changed(key);
            }
        }
        assert!(f.fragment.toolbar().is_compact());
        assert!(f.fragment.is_tab_button_visible());
    }

    #[test]
    fn test_destroy_view_removes_every_listener() {
        let mut f = fixture(&["#a"]);
        assert_eq!(f.info.channel_list_listener_count(), 1);
        assert_eq!(f.info.notification_manager().callback_count(), 1);
        for key in PreferenceKey::ALL {
            assert_eq!(f.settings.listener_count(key), 1);
        }

        f.fragment.destroy_view();
        f.fragment.destroy_view();
        assert_eq!(f.info.channel_list_listener_count(), 0);
        assert_eq!(f.info.notification_manager().callback_count(), 0);
        for key in PreferenceKey::ALL {
            assert_eq!(f.settings.listener_count(key), 0);
        }
    }

    #[test]
    fn test_drop_removes_listeners() {
        let f = fixture(&["#a"]);
        let info = Arc::clone(&f.info);
        drop(f);
        assert_eq!(info.channel_list_listener_count(), 0);
    }

    #[test]
    fn test_page_selection_updates_drawer_and_open_channel() {
        let mut f = fixture(&["#a", "#b"]);
        f.info.write().members.insert(
            "#b".into(),
            vec![NickWithPrefix::new("alice", Some('@'))],
        );
        f.fragment.set_current_channel("#b");
        assert_eq!(f.fragment.current_channel(), Some("#b"));
        assert_eq!(f.fragment.tabs().selected_tab_position(), Some(2));
        assert!(f.fragment.toggle_drawer());

        f.info.notification_manager().on_message("#b", false);
        assert_eq!(f.info.notification_manager().unread_count("#b"), 0);

        f.fragment.select_next_page();
        assert_eq!(f.fragment.pager().current_item(), 0);
        assert!(!f.fragment.drawer().is_open());
        f.fragment.select_prev_page();
        assert_eq!(f.fragment.current_channel(), Some("#b"));

        f.fragment.set_current_channel("#missing");
        assert_eq!(f.fragment.current_channel(), Some("#b"));
    }

    #[test]
    fn test_double_tap_completes() {
        let mut f = fixture(&["#a"]);
        f.info
            .write()
            .members
            .insert("#a".into(), vec![NickWithPrefix::new("alice", None)]);
        f.fragment.set_current_channel("#a");
        f.fragment.edit_composer(|c| c.set_text("ali"));

        let t0 = Instant::now();
        assert!(!f.fragment.on_composer_click(t0));
        assert!(!f.fragment.on_composer_click(t0 + Duration::from_millis(100)));

        f.fragment.set_double_tap_complete_enabled(true);
        assert!(!f.fragment.on_composer_click(t0));
        assert!(f.fragment.on_composer_click(t0 + Duration::from_millis(100)));
        assert_eq!(f.fragment.composer().text(), "alice: ");
    }

    #[test]
    fn test_format_bar_needs_selection() {
        let mut f = fixture(&[]);
        f.fragment.edit_composer(|c| c.set_text("hi"));
        assert!(!f.fragment.show_format_bar_for_selection());
        f.fragment.edit_composer(|c| c.set_selection(0..2));
        assert!(f.fragment.has_send_message_text_selection());
        assert!(f.fragment.show_format_bar_for_selection());
        f.fragment.apply_format(TextFormat::Bold);
        assert_eq!(f.fragment.composer().text(), "\x02hi\x02");
        f.fragment.set_format_bar_visible(false);
        assert!(!f.fragment.is_format_bar_visible());
    }
}
