//! Live chat preferences with per-key change listeners.

use crate::config::model::{ChatConfig, CompactMode};
use crate::util::{ListenerId, ListenerList};
use std::sync::{RwLock, RwLockReadGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    ChatAppbarCompactMode,
    NickAutocompleteShowButton,
    NickAutocompleteDoubleTap,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 3] = [
        PreferenceKey::ChatAppbarCompactMode,
        PreferenceKey::NickAutocompleteShowButton,
        PreferenceKey::NickAutocompleteDoubleTap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::ChatAppbarCompactMode => "appbar_compact_mode",
            PreferenceKey::NickAutocompleteShowButton => "nick_autocomplete_show_button",
            PreferenceKey::NickAutocompleteDoubleTap => "nick_autocomplete_double_tap",
        }
    }

    fn index(self) -> usize {
        match self {
            PreferenceKey::ChatAppbarCompactMode => 0,
            PreferenceKey::NickAutocompleteShowButton => 1,
            PreferenceKey::NickAutocompleteDoubleTap => 2,
        }
    }
}

pub struct Settings {
    chat: RwLock<ChatConfig>,
    listeners: [ListenerList<PreferenceKey>; 3],
}

impl Settings {
    pub fn new(chat: ChatConfig) -> Self {
        Self {
            chat: RwLock::new(chat),
            listeners: Default::default(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ChatConfig> {
        self.chat.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot for persisting.
    pub fn chat_config(&self) -> ChatConfig {
        self.read().clone()
    }

    pub fn chat_appbar_compact_mode(&self) -> CompactMode {
        self.read().appbar_compact_mode
    }

    pub fn is_nick_autocomplete_button_visible(&self) -> bool {
        self.read().nick_autocomplete_show_button
    }

    pub fn is_nick_autocomplete_double_tap_enabled(&self) -> bool {
        self.read().nick_autocomplete_double_tap
    }

    pub fn compact_toolbar_height(&self) -> u16 {
        self.read().compact_toolbar_height
    }

    pub fn collapse_toolbar_height(&self) -> u16 {
        self.read().collapse_toolbar_height
    }

    pub fn add_preference_change_listener<F>(&self, key: PreferenceKey, listener: F) -> ListenerId
    where
        F: Fn(&PreferenceKey) + Send + Sync + 'static,
    {
        self.listeners[key.index()].add(listener)
    }

    pub fn remove_preference_change_listener(&self, key: PreferenceKey, id: ListenerId) -> bool {
        self.listeners[key.index()].remove(id)
    }

    #[cfg(test)]
    pub fn listener_count(&self, key: PreferenceKey) -> usize {
        self.listeners[key.index()].len()
    }

    /// Apply `update` and notify listeners of `key` when the value changed.
    fn update(&self, key: PreferenceKey, update: impl FnOnce(&mut ChatConfig) -> bool) {
        let changed = {
            let mut chat = self.chat.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            update(&mut chat)
        };
        if changed {
            tracing::info!(key = key.as_str(), "preference changed");
            self.listeners[key.index()].notify(&key);
        }
    }

    pub fn set_chat_appbar_compact_mode(&self, mode: CompactMode) {
        self.update(PreferenceKey::ChatAppbarCompactMode, |c| {
            std::mem::replace(&mut c.appbar_compact_mode, mode) != mode
        });
    }

    pub fn set_nick_autocomplete_button_visible(&self, visible: bool) {
        self.update(PreferenceKey::NickAutocompleteShowButton, |c| {
            std::mem::replace(&mut c.nick_autocomplete_show_button, visible) != visible
        });
    }

    pub fn set_nick_autocomplete_double_tap_enabled(&self, enabled: bool) {
        self.update(PreferenceKey::NickAutocompleteDoubleTap, |c| {
            std::mem::replace(&mut c.nick_autocomplete_double_tap, enabled) != enabled
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_listeners_fire_per_key_on_change_only() {
        let settings = Settings::new(ChatConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = settings.add_preference_change_listener(
            PreferenceKey::NickAutocompleteDoubleTap,
            move |key| sink.lock().unwrap().push(*key),
        );

        settings.set_nick_autocomplete_double_tap_enabled(true);
        settings.set_nick_autocomplete_double_tap_enabled(true);
        settings.set_chat_appbar_compact_mode(CompactMode::Always);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![PreferenceKey::NickAutocompleteDoubleTap]
        );
        assert!(settings.is_nick_autocomplete_double_tap_enabled());
        assert_eq!(settings.chat_config().appbar_compact_mode, CompactMode::Always);

        assert!(settings.remove_preference_change_listener(PreferenceKey::NickAutocompleteDoubleTap, id));
        assert_eq!(settings.listener_count(PreferenceKey::NickAutocompleteDoubleTap), 0);
    }
}
