use crate::config::PreferenceKey;
use crossterm::event::Event as CrosstermEvent;

pub use crate::irc::session::ServerId;

/// Everything the UI loop reacts to. Library callbacks never touch UI
/// state directly; they post one of these instead.
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A connection processed a message; its scrollback may have changed.
    ConnectionActivity {
        server_id: ServerId,
    },

    /// The joined channel list of a connection changed.
    ChannelListChanged {
        server_id: ServerId,
    },

    /// A channel's unread count crossed zero in either direction.
    UnreadCountChanged {
        server_id: ServerId,
        channel: String,
    },

    PreferenceChanged {
        key: PreferenceKey,
    },
}
