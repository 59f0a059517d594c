//! Chat library layer: connection state, inbound message handling,
//! notifications and the sending API the chat screen consumes.

pub mod api;
pub mod connection;
pub mod incoming;
pub mod manager;
pub mod notifications;
pub mod session;
