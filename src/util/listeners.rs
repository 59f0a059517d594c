//! Observer registration with explicit removal handles.
//!
//! Every `add` hands back a [`ListenerId`]; the owner of a registration is
//! expected to pass that id back to `remove` when it goes away. Callbacks
//! run on whichever thread calls [`ListenerList::notify`], so UI-facing
//! listeners should only enqueue work for the UI loop.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Slots<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Callback<T>)>,
}

pub struct ListenerList<T> {
    slots: Mutex<Slots<T>>,
}

impl<T> ListenerList<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        // A panicking listener must not take the whole list down with it.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut slots = self.lock();
        let id = ListenerId(slots.next_id);
        slots.next_id += 1;
        slots.entries.push((id, Arc::new(callback)));
        id
    }

    /// Returns `false` if the id was not registered (already removed).
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut slots = self.lock();
        let before = slots.entries.len();
        slots.entries.retain(|(entry_id, _)| *entry_id != id);
        slots.entries.len() != before
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify(&self, event: &T) {
        // Snapshot first so callbacks may add or remove listeners.
        let callbacks: Vec<Callback<T>> = self
            .lock()
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(event);
        }
    }
}

impl<T> Default for ListenerList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_reaches_every_listener() {
        let list: ListenerList<usize> = ListenerList::new();
        let total = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let total = Arc::clone(&total);
            list.add(move |n| {
                total.fetch_add(*n, Ordering::SeqCst);
            });
        }
        list.notify(&2);
        assert_eq!(total.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_remove_is_symmetric() {
        let list: ListenerList<()> = ListenerList::new();
        let a = list.add(|_| {});
        let b = list.add(|_| {});
        assert_eq!(list.len(), 2);
        assert!(list.remove(a));
        assert!(!list.remove(a));
        assert!(list.remove(b));
        assert!(list.is_empty());
    }

    #[test]
    fn test_listener_may_unregister_during_notify() {
        let list: Arc<ListenerList<()>> = Arc::new(ListenerList::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let id_slot = Arc::new(Mutex::new(None));
        let handle = Arc::clone(&list);
        let counter = Arc::clone(&calls);
        let slot = Arc::clone(&id_slot);
        let id = list.add(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *slot.lock().unwrap() {
                handle.remove(id);
            }
        });
        *id_slot.lock().unwrap() = Some(id);
        list.notify(&());
        list.notify(&());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
