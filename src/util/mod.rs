//! Small shared helpers.

pub mod listeners;

pub use listeners::{ListenerId, ListenerList};
