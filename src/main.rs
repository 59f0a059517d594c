mod alias;
mod app;
mod chat;
mod config;
mod irc;
mod logging;
mod ui;
mod util;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use crate::irc::manager::ServerConnectionManager;
use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        EventStream,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    let log_path = logging::init(&cfg.logging)?;
    tracing::info!(log = %log_path.display(), "chatdeck starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cfg).await;

    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "chatdeck exited with an error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    tracing::info!("chatdeck stopped");
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut manager = ServerConnectionManager::new(event_tx.clone(), cfg.ui.max_scrollback);
    let mut state = AppState::new(cfg.clone(), event_tx.clone());
    for srv_cfg in &cfg.servers {
        state.add_connection(manager.add_server(srv_cfg));
    }
    let size = terminal.size()?;
    state.resize(size.width, size.height);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if term_tx.send(AppEvent::Terminal(event)).is_err() {
                break;
            }
        }
    });

    // Auto-connect servers from config
    for (info, srv_cfg) in manager.connections().iter().zip(&cfg.servers) {
        if srv_cfg.auto_connect {
            if let Err(e) = manager.connect(info.id()).await {
                tracing::warn!(server = %srv_cfg.name, error = %e, "auto-connect failed");
            }
        }
    }

    ui::sync_layout(&mut state);
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    while let Some(event) = event_rx.recv().await {
        let actions = handler::handle_event(&mut state, event);

        for action in actions {
            match action {
                Action::Connect { server_id } => {
                    if let Err(e) = manager.connect(server_id).await {
                        state.status_message = Some(format!("Connection failed: {:#}", e));
                    }
                }
                Action::SaveSettings => {
                    state.config.chat = state.settings.chat_config();
                    if let Err(e) = config::save_config(&state.config) {
                        tracing::warn!(error = %e, "failed to save settings");
                        state.status_message = Some(format!("Saving settings failed: {:#}", e));
                    }
                }
                Action::Quit { message } => {
                    manager.send_quit_all(message.as_deref());
                    state.should_quit = true;
                }
            }
        }

        if state.should_quit {
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            ui::sync_layout(&mut state);
            terminal
                .draw(|f| ui::render(f, &state))
                .context("Failed to draw frame")?;
            state.dirty = false;
        }
    }

    Ok(())
}
