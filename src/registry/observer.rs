//! Boolean state with synchronous change listeners.

use std::fmt;

/// Handle returned when a listener is registered; pass it to
/// [`SharedTransitionScope::remove_listener`](super::SharedTransitionScope::remove_listener).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Callback invoked with the new value whenever it changes.
pub type Listener = Box<dyn FnMut(bool)>;

/// A boolean that notifies its listeners, in registration order, only when
/// its value actually changes.
pub(crate) struct Observable {
    value: bool,
    listeners: Vec<(ListenerId, Listener)>,
}

impl Observable {
    pub(crate) fn new(value: bool) -> Self {
        Self {
            value,
            listeners: Vec::new(),
        }
    }

    pub(crate) fn get(&self) -> bool {
        self.value
    }

    /// Store `value`. Returns whether it changed.
    pub(crate) fn set(&mut self, value: bool) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for (_, listener) in &mut self.listeners {
            listener(value);
        }
        true
    }

    pub(crate) fn subscribe(&mut self, id: ListenerId, listener: Listener) {
        self.listeners.push((id, listener));
    }

    /// Remove a listener. Returns whether it was registered here.
    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn clear_listeners(&mut self) {
        self.listeners.clear();
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}
