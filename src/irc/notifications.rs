//! Unread message bookkeeping per channel.

use crate::irc::session::ServerId;
use crate::util::{ListenerId, ListenerList};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadCountChange {
    pub server_id: ServerId,
    pub channel: String,
    pub count: usize,
    pub old_count: usize,
    /// This message was the first to mention the user since the channel
    /// was last read.
    pub mention_raised: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct ChannelCounter {
    unread: usize,
    mentioned: bool,
}

#[derive(Debug, Default)]
struct State {
    channels: HashMap<String, ChannelCounter>,
    open_channel: Option<String>,
}

pub struct NotificationManager {
    server_id: ServerId,
    state: Mutex<State>,
    callbacks: ListenerList<UnreadCountChange>,
}

impl NotificationManager {
    pub fn new(server_id: ServerId) -> Self {
        Self {
            server_id,
            state: Mutex::new(State::default()),
            callbacks: ListenerList::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn unread_count(&self, channel: &str) -> usize {
        self.lock()
            .channels
            .get(&channel.to_lowercase())
            .map(|c| c.unread)
            .unwrap_or(0)
    }

    pub fn has_unread_messages(&self, channel: &str) -> bool {
        self.unread_count(channel) > 0
    }

    pub fn has_mention(&self, channel: &str) -> bool {
        self.lock()
            .channels
            .get(&channel.to_lowercase())
            .is_some_and(|c| c.mentioned)
    }

    pub fn add_unread_message_count_callback<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&UnreadCountChange) + Send + Sync + 'static,
    {
        self.callbacks.add(callback)
    }

    pub fn remove_unread_message_count_callback(&self, id: ListenerId) -> bool {
        self.callbacks.remove(id)
    }

    #[cfg(test)]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Record an incoming message. Messages to the open channel are not
    /// counted.
    pub fn on_message(&self, channel: &str, mention: bool) {
        let key = channel.to_lowercase();
        let change = {
            let mut state = self.lock();
            if state.open_channel.as_deref() == Some(key.as_str()) {
                return;
            }
            let counter = state.channels.entry(key).or_default();
            let old_count = counter.unread;
            let mention_raised = mention && !counter.mentioned;
            counter.unread += 1;
            counter.mentioned |= mention;
            UnreadCountChange {
                server_id: self.server_id,
                channel: channel.to_string(),
                count: counter.unread,
                old_count,
                mention_raised,
            }
        };
        self.callbacks.notify(&change);
    }

    /// Mark `channel` as the one being looked at and clear its counter.
    pub fn set_open_channel(&self, channel: Option<&str>) {
        {
            let mut state = self.lock();
            state.open_channel = channel.map(str::to_lowercase);
        }
        if let Some(ch) = channel {
            self.clear(ch);
        }
    }

    pub fn clear(&self, channel: &str) {
        let old_count = {
            let mut state = self.lock();
            match state.channels.get_mut(&channel.to_lowercase()) {
                Some(counter) if counter.unread > 0 => {
                    let old = counter.unread;
                    *counter = ChannelCounter::default();
                    old
                }
                _ => return,
            }
        };
        self.callbacks.notify(&UnreadCountChange {
            server_id: self.server_id,
            channel: channel.to_string(),
            count: 0,
            old_count,
            mention_raised: false,
        });
    }

    pub fn forget(&self, channel: &str) {
        self.lock().channels.remove(&channel.to_lowercase());
    }

    /// Move `old`'s counter to `new`, e.g. after a query partner changed
    /// nick. Listeners see the old name drop to zero and the new one rise.
    pub fn rename(&self, old: &str, new: &str) {
        let (old_key, new_key) = (old.to_lowercase(), new.to_lowercase());
        let moved = {
            let mut state = self.lock();
            if state.open_channel.as_deref() == Some(old_key.as_str()) {
                state.open_channel = Some(new_key.clone());
            }
            match state.channels.remove(&old_key) {
                Some(counter) if counter.unread > 0 => {
                    state.channels.insert(new_key, counter);
                    counter
                }
                _ => return,
            }
        };
        self.callbacks.notify(&UnreadCountChange {
            server_id: self.server_id,
            channel: old.to_string(),
            count: 0,
            old_count: moved.unread,
            mention_raised: false,
        });
        self.callbacks.notify(&UnreadCountChange {
            server_id: self.server_id,
            channel: new.to_string(),
            count: moved.unread,
            old_count: 0,
            mention_raised: moved.mentioned,
        });
    }
}
