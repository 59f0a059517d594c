//! Outbound side of a connection: the handle the chat screen sends through.

use crate::irc::session::{ChatMessage, ConnectionData, MessageKind};
use irc::client::prelude::Command;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not connected to the server")]
    NotConnected,
    #[error(transparent)]
    Irc(#[from] irc::error::Error),
}

/// Fire-and-forget sending operations a connection exposes to the UI.
pub trait ChatApi: Send + Sync {
    fn send_message(&self, channel: &str, text: &str) -> Result<(), ApiError>;
    fn send_command_raw(&self, command: &str) -> Result<(), ApiError>;
}

/// [`ChatApi`] backed by an `irc` crate sender.
///
/// The sender is attached once the connection has been established; until
/// then every send fails with [`ApiError::NotConnected`].
pub struct IrcApi {
    sender: RwLock<Option<irc::client::Sender>>,
    data: Arc<RwLock<ConnectionData>>,
}

impl IrcApi {
    pub fn new(data: Arc<RwLock<ConnectionData>>) -> Self {
        Self {
            sender: RwLock::new(None),
            data,
        }
    }

    pub fn attach(&self, sender: irc::client::Sender) {
        if let Ok(mut slot) = self.sender.write() {
            *slot = Some(sender);
        }
    }

    pub fn detach(&self) -> Option<irc::client::Sender> {
        self.sender.write().ok().and_then(|mut slot| slot.take())
    }

    fn with_sender<R>(
        &self,
        f: impl FnOnce(&irc::client::Sender) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let slot = self.sender.read().map_err(|_| ApiError::NotConnected)?;
        match slot.as_ref() {
            Some(sender) => f(sender),
            None => Err(ApiError::NotConnected),
        }
    }
}

impl ChatApi for IrcApi {
    fn send_message(&self, channel: &str, text: &str) -> Result<(), ApiError> {
        // No CTCP injection through plain messages
        let clean = text.replace('\x01', "");
        self.with_sender(|sender| Ok(sender.send_privmsg(channel, &clean)?))?;

        // Servers do not echo our own messages back.
        if let Ok(mut data) = self.data.write() {
            let nick = data.nick.clone();
            data.push_message(
                Some(channel),
                ChatMessage::now(&nick, &clean, MessageKind::Normal),
            );
        }
        Ok(())
    }

    fn send_command_raw(&self, command: &str) -> Result<(), ApiError> {
        tracing::debug!(command, "sending raw command");
        self.with_sender(|sender| Ok(sender.send(Command::Raw(command.to_string(), vec![]))?))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_connection_fails() {
        let data = ConnectionData::shared("me", 100);
        let api = IrcApi::new(data);
        assert!(matches!(
            api.send_message("#rust", "hi"),
            Err(ApiError::NotConnected)
        ));
        assert!(matches!(
            api.send_command_raw("PING x"),
            Err(ApiError::NotConnected)
        ));
    }
}
