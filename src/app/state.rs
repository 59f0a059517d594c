use crate::alias::CommandAliasManager;
use crate::app::event::{AppEvent, ServerId};
use crate::chat::ChatFragment;
use crate::config::{AppConfig, Settings};
use crate::irc::session::{ConnectionStatus, ServerConnectionInfo};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct AppState {
    pub config: AppConfig,
    pub settings: Arc<Settings>,
    pub aliases: Arc<CommandAliasManager>,
    pub connections: Vec<Arc<ServerConnectionInfo>>,
    /// Index into `connections` of the connection on screen.
    pub active: usize,
    /// Chat screen of the active connection.
    pub fragment: Option<ChatFragment>,
    ui_tx: mpsc::UnboundedSender<AppEvent>,
    pub width: u16,
    pub height: u16,
    pub should_quit: bool,
    pub dirty: bool,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, ui_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let settings = Arc::new(Settings::new(config.chat.clone()));
        let aliases = Arc::new(CommandAliasManager::new(&config.aliases));
        Self {
            config,
            settings,
            aliases,
            connections: Vec::new(),
            active: 0,
            fragment: None,
            ui_tx,
            width: 0,
            height: 0,
            should_quit: false,
            dirty: true,
            status_message: None,
        }
    }

    pub fn add_connection(&mut self, info: Arc<ServerConnectionInfo>) {
        self.connections.push(info);
        if self.fragment.is_none() {
            self.open_connection(self.connections.len() - 1);
        }
        self.dirty = true;
    }

    pub fn active_connection(&self) -> Option<&Arc<ServerConnectionInfo>> {
        self.connections.get(self.active)
    }

    pub fn active_server_id(&self) -> Option<ServerId> {
        self.active_connection().map(|c| c.id())
    }

    /// Show the chat screen of `index`. The previous screen is torn down
    /// before the new one registers its listeners.
    pub fn open_connection(&mut self, index: usize) {
        let Some(info) = self.connections.get(index).cloned() else {
            return;
        };
        if let Some(mut old) = self.fragment.take() {
            old.destroy_view();
        }
        let mut fragment = ChatFragment::new(
            info,
            Arc::clone(&self.settings),
            Arc::clone(&self.aliases),
            self.ui_tx.clone(),
        );
        if self.height > 0 {
            fragment.on_layout_changed(self.height);
        }
        self.fragment = Some(fragment);
        self.active = index;
        self.status_message = None;
        self.dirty = true;
    }

    pub fn next_connection(&mut self) {
        if self.connections.len() > 1 {
            self.open_connection((self.active + 1) % self.connections.len());
        }
    }

    pub fn prev_connection(&mut self) {
        let len = self.connections.len();
        if len > 1 {
            self.open_connection((self.active + len - 1) % len);
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        if let Some(fragment) = self.fragment.as_mut() {
            fragment.on_layout_changed(height);
        }
        self.dirty = true;
    }

    /// Fragment of `server_id` if it is the one on screen. Events queued
    /// for a connection that is no longer shown are dropped.
    fn fragment_for(&mut self, server_id: ServerId) -> Option<&mut ChatFragment> {
        self.fragment
            .as_mut()
            .filter(|f| f.connection_info().id() == server_id)
    }

    /// Apply a library notification on the UI side.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Terminal(_) => {}
            AppEvent::ConnectionActivity { server_id } => {
                if let Some(fragment) = self.fragment_for(server_id) {
                    fragment.refresh_members();
                    self.dirty = true;
                }
            }
            AppEvent::ChannelListChanged { server_id } => {
                if let Some(fragment) = self.fragment_for(server_id) {
                    fragment.on_channel_list_changed();
                    self.dirty = true;
                }
            }
            AppEvent::UnreadCountChanged { server_id, channel } => {
                if let Some(fragment) = self.fragment_for(server_id) {
                    fragment.on_unread_count_changed(&channel);
                    self.dirty = true;
                }
            }
            AppEvent::PreferenceChanged { key } => {
                if let Some(fragment) = self.fragment.as_mut() {
                    fragment.on_preference_changed(key);
                }
                self.config.chat = self.settings.chat_config();
                self.dirty = true;
            }
        }
    }

    pub fn status_line(&self) -> String {
        if let Some(ref msg) = self.status_message {
            return msg.clone();
        }
        let connected = self
            .connections
            .iter()
            .filter(|c| c.status() == ConnectionStatus::Connected)
            .count();
        let mut s = format!("Servers: {}/{}", connected, self.connections.len());
        s.push_str(&format!(
            " | compact: {}",
            self.settings.chat_appbar_compact_mode().as_str()
        ));
        if self.settings.is_nick_autocomplete_button_visible() {
            s.push_str(" | tab button");
        }
        if self.settings.is_nick_autocomplete_double_tap_enabled() {
            s.push_str(" | double tap");
        }
        s
    }
}
