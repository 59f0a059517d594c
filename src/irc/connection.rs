use crate::app::event::AppEvent;
use crate::config::ServerConfig;
use crate::irc::session::{ConnectionStatus, ServerConnectionInfo};
use anyhow::{Context, Result};
use futures::StreamExt;
use irc::client::prelude::*;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Connect and register, then feed every inbound message into `info` from a
/// background task. The UI is only told that something changed.
pub async fn spawn_connection(
    info: Arc<ServerConnectionInfo>,
    server: &ServerConfig,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> Result<irc::client::Sender> {
    let config = Config {
        server: Some(server.host.clone()),
        port: Some(server.port),
        use_tls: Some(server.tls),
        nickname: Some(server.nickname.clone()),
        alt_nicks: server.alt_nicks.clone(),
        username: server.username.clone(),
        realname: server.realname.clone(),
        password: server.password.clone(),
        nick_password: server.nick_password.clone(),
        channels: server.channels.clone(),
        dangerously_accept_invalid_certs: Some(server.accept_invalid_certs),
        ..Config::default()
    };

    let mut client = Client::from_config(config)
        .await
        .with_context(|| format!("Failed to connect to {}:{}", server.host, server.port))?;
    client.identify().context("Failed to register with the server")?;

    let sender = client.sender();
    let mut stream = client.stream()?;
    let server_id = info.id();
    tracing::info!(server_id, host = %server.host, "connection established");

    tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(message) => {
                    info.handle_message(&message);
                    if event_tx
                        .send(AppEvent::ConnectionActivity { server_id })
                        .is_err()
                    {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(server_id, error = %e, "connection stream failed");
                    info.error_message(&e.to_string());
                    break;
                }
            }
        }
        info.set_status(ConnectionStatus::Disconnected);
        info.system_message("Disconnected.");
        tracing::info!(server_id, "connection closed");
        let _ = event_tx.send(AppEvent::ConnectionActivity { server_id });
    });

    Ok(sender)
}
