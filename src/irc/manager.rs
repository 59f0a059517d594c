use crate::app::event::AppEvent;
use crate::config::nickname::{generate_nickname, is_valid_nickname};
use crate::config::ServerConfig;
use crate::irc::api::IrcApi;
use crate::irc::connection::spawn_connection;
use crate::irc::session::{ConnectionData, ConnectionStatus, ServerConnectionInfo, ServerId};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

struct ManagedConnection {
    info: Arc<ServerConnectionInfo>,
    api: Arc<IrcApi>,
    config: ServerConfig,
}

/// Owns every configured connection and the senders attached to them.
pub struct ServerConnectionManager {
    connections: Vec<ManagedConnection>,
    next_id: ServerId,
    max_scrollback: usize,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ServerConnectionManager {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>, max_scrollback: usize) -> Self {
        Self {
            connections: Vec::new(),
            next_id: 0,
            max_scrollback,
            event_tx,
        }
    }

    pub fn add_server(&mut self, config: &ServerConfig) -> Arc<ServerConnectionInfo> {
        let id = self.next_id;
        self.next_id += 1;

        let mut config = config.clone();
        if !is_valid_nickname(&config.nickname) {
            let nick = generate_nickname();
            tracing::warn!(
                server = %config.name,
                invalid = %config.nickname,
                nick = %nick,
                "invalid nickname, using a generated one"
            );
            config.nickname = nick;
        }

        let data = ConnectionData::shared(&config.nickname, self.max_scrollback);
        let api = Arc::new(IrcApi::new(Arc::clone(&data)));
        let info = Arc::new(ServerConnectionInfo::new(id, &config.name, data, api.clone()));
        self.connections.push(ManagedConnection {
            info: Arc::clone(&info),
            api,
            config,
        });
        info
    }

    pub fn connections(&self) -> Vec<Arc<ServerConnectionInfo>> {
        self.connections.iter().map(|c| Arc::clone(&c.info)).collect()
    }

    pub async fn connect(&mut self, id: ServerId) -> Result<()> {
        let conn = self
            .connections
            .iter()
            .find(|c| c.info.id() == id)
            .ok_or_else(|| anyhow!("Unknown connection {}", id))?;
        if conn.info.status() != ConnectionStatus::Disconnected {
            return Ok(());
        }

        conn.info.set_status(ConnectionStatus::Connecting);
        conn.info.system_message(&format!(
            "Connecting to {}:{}...",
            conn.config.host, conn.config.port
        ));
        match spawn_connection(Arc::clone(&conn.info), &conn.config, self.event_tx.clone()).await {
            Ok(sender) => {
                conn.api.attach(sender);
                Ok(())
            }
            Err(e) => {
                conn.info.set_status(ConnectionStatus::Disconnected);
                conn.info.error_message(&format!("Connection failed: {:#}", e));
                Err(e)
            }
        }
    }

    pub fn send_quit_all(&mut self, message: Option<&str>) {
        for conn in &self.connections {
            if let Some(sender) = conn.api.detach() {
                let msg = message
                    .or(conn.config.quit_message.as_deref())
                    .unwrap_or("Leaving");
                let _ = sender.send_quit(msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_nickname_is_replaced() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut manager = ServerConnectionManager::new(tx, 100);
        let good = manager.add_server(&ServerConfig::new("a", "irc.example.org", "ferris"));
        let bad = manager.add_server(&ServerConfig::new("b", "irc.example.org", "9 lives"));

        assert_eq!(good.user_nick(), "ferris");
        assert!(is_valid_nickname(&bad.user_nick()));
        assert_ne!(good.id(), bad.id());
        assert_eq!(manager.connections().len(), 2);
    }
}
