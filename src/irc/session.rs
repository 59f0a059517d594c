//! Per-connection state owned by the chat library side.
//!
//! [`ServerConnectionInfo`] is shared between the connection task, which
//! mutates it as protocol messages arrive, and the chat screen, which only
//! reads it and reacts to the change notifications it fires.

use crate::irc::api::ChatApi;
use crate::irc::notifications::NotificationManager;
use crate::util::{ListenerId, ListenerList};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type ServerId = usize;

/// Channel type prefixes assumed until the server advertises `CHANTYPES`.
pub const DEFAULT_CHANNEL_TYPES: &[char] = &['#', '&'];

/// Member mode prefixes assumed until the server advertises `PREFIX`,
/// highest rank first.
pub const DEFAULT_MEMBER_PREFIXES: &str = "~&@%+";

/// Channel modes matching [`DEFAULT_MEMBER_PREFIXES`] position by position.
pub const DEFAULT_MEMBER_PREFIX_MODES: &str = "qaohv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickWithPrefix {
    pub nick: String,
    pub prefix: Option<char>,
}

impl NickWithPrefix {
    pub fn new(nick: impl Into<String>, prefix: Option<char>) -> Self {
        Self {
            nick: nick.into(),
            prefix,
        }
    }

    /// Split a `NAMES` entry such as `@alice` using the known prefix set.
    /// With multi-prefix entries like `@+bob` the first (highest) wins.
    pub fn parse(raw: &str, prefixes: &str) -> Self {
        let prefix = raw.chars().next().filter(|c| prefixes.contains(*c));
        Self::new(raw.trim_start_matches(|c: char| prefixes.contains(c)), prefix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    Normal,
    Action,
    Notice,
    System,
    Error,
    Join,
    Part,
    Quit,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub timestamp: DateTime<Local>,
    pub sender: String,
    pub text: String,
    pub kind: MessageKind,
}

impl ChatMessage {
    pub fn now(sender: &str, text: &str, kind: MessageKind) -> Self {
        Self {
            timestamp: Local::now(),
            sender: sender.to_string(),
            text: text.to_string(),
            kind,
        }
    }
}

/// Bounded message history for one page.
#[derive(Debug, Default)]
pub struct Scrollback {
    messages: Vec<ChatMessage>,
}

impl Scrollback {
    pub fn push(&mut self, msg: ChatMessage, max: usize) {
        self.messages.push(msg);
        if self.messages.len() > max {
            let excess = self.messages.len() - max;
            self.messages.drain(..excess);
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Mutable connection state. Only the library side writes to it.
#[derive(Debug)]
pub struct ConnectionData {
    pub nick: String,
    pub status: ConnectionStatus,
    pub channels: Vec<String>,
    pub members: HashMap<String, Vec<NickWithPrefix>>,
    pub channel_types: Vec<char>,
    pub member_prefixes: String,
    pub member_prefix_modes: String,
    pub status_log: Scrollback,
    pub channel_logs: HashMap<String, Scrollback>,
    pub max_scrollback: usize,
}

impl ConnectionData {
    pub fn new(nick: &str, max_scrollback: usize) -> Self {
        Self {
            nick: nick.to_string(),
            status: ConnectionStatus::Disconnected,
            channels: Vec::new(),
            members: HashMap::new(),
            channel_types: DEFAULT_CHANNEL_TYPES.to_vec(),
            member_prefixes: DEFAULT_MEMBER_PREFIXES.to_string(),
            member_prefix_modes: DEFAULT_MEMBER_PREFIX_MODES.to_string(),
            status_log: Scrollback::default(),
            channel_logs: HashMap::new(),
            max_scrollback,
        }
    }

    pub fn shared(nick: &str, max_scrollback: usize) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::new(nick, max_scrollback)))
    }

    pub fn channel_index(&self, channel: &str) -> Option<usize> {
        self.channels
            .iter()
            .position(|c| c.eq_ignore_ascii_case(channel))
    }

    pub fn is_channel_name(&self, target: &str) -> bool {
        target
            .chars()
            .next()
            .is_some_and(|c| self.channel_types.contains(&c))
    }

    /// Prefix symbol granted by channel mode `mode`, e.g. `'o'` → `'@'`.
    pub fn prefix_for_mode(&self, mode: char) -> Option<char> {
        let index = self.member_prefix_modes.chars().position(|m| m == mode)?;
        self.member_prefixes.chars().nth(index)
    }

    /// Lower is more privileged; unknown prefixes rank last.
    pub fn prefix_rank(&self, prefix: char) -> usize {
        self.member_prefixes
            .chars()
            .position(|p| p == prefix)
            .unwrap_or(usize::MAX)
    }

    /// Append to a channel page, or to the status page when `channel` is `None`.
    pub fn push_message(&mut self, channel: Option<&str>, msg: ChatMessage) {
        let max = self.max_scrollback;
        match channel {
            Some(ch) => self
                .channel_logs
                .entry(ch.to_lowercase())
                .or_default()
                .push(msg, max),
            None => self.status_log.push(msg, max),
        }
    }
}

/// Payload of a channel-list notification. Listeners re-read the list
/// from [`ServerConnectionInfo::channels`].
#[derive(Debug, Clone)]
pub struct ChannelListChange {
    pub server_id: ServerId,
}

pub struct ServerConnectionInfo {
    id: ServerId,
    name: String,
    data: Arc<RwLock<ConnectionData>>,
    api: Arc<dyn ChatApi>,
    notifications: NotificationManager,
    channel_list_listeners: ListenerList<ChannelListChange>,
}

impl ServerConnectionInfo {
    pub fn new(
        id: ServerId,
        name: &str,
        data: Arc<RwLock<ConnectionData>>,
        api: Arc<dyn ChatApi>,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            data,
            api,
            notifications: NotificationManager::new(id),
            channel_list_listeners: ListenerList::new(),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ConnectionData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, ConnectionData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn id(&self) -> ServerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api(&self) -> Arc<dyn ChatApi> {
        Arc::clone(&self.api)
    }

    pub fn notification_manager(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn user_nick(&self) -> String {
        self.read().nick.clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.read().status
    }

    pub fn channels(&self) -> Vec<String> {
        self.read().channels.clone()
    }

    pub fn channel_types(&self) -> Vec<char> {
        self.read().channel_types.clone()
    }

    /// `None` means the channel is not joined or its member list is unknown.
    pub fn channel_members(&self, channel: &str) -> Option<Vec<NickWithPrefix>> {
        self.read().members.get(&channel.to_lowercase()).cloned()
    }

    pub fn messages(&self, channel: Option<&str>) -> Vec<ChatMessage> {
        let data = self.read();
        match channel {
            Some(ch) => data
                .channel_logs
                .get(&ch.to_lowercase())
                .map(|log| log.messages().to_vec())
                .unwrap_or_default(),
            None => data.status_log.messages().to_vec(),
        }
    }

    pub fn add_on_channel_list_change_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ChannelListChange) + Send + Sync + 'static,
    {
        self.channel_list_listeners.add(listener)
    }

    pub fn remove_on_channel_list_change_listener(&self, id: ListenerId) -> bool {
        self.channel_list_listeners.remove(id)
    }

    #[cfg(test)]
    pub fn channel_list_listener_count(&self) -> usize {
        self.channel_list_listeners.len()
    }

    pub fn set_status(&self, status: ConnectionStatus) {
        self.write().status = status;
    }

    pub fn system_message(&self, text: &str) {
        self.write()
            .push_message(None, ChatMessage::now("***", text, MessageKind::System));
    }

    pub fn error_message(&self, text: &str) {
        self.write()
            .push_message(None, ChatMessage::now("!!!", text, MessageKind::Error));
    }

    /// Replace the channel list and notify listeners.
    #[cfg(test)]
    pub fn set_channels(&self, channels: Vec<String>) {
        {
            let mut data = self.write();
            data.members
                .retain(|key, _| channels.iter().any(|c| c.to_lowercase() == *key));
            data.channels = channels;
        }
        self.fire_channel_list_changed();
    }

    pub(crate) fn fire_channel_list_changed(&self) {
        tracing::debug!(server_id = self.id, "channel list changed");
        self.channel_list_listeners.notify(&ChannelListChange { server_id: self.id });
    }
}
