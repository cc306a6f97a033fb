use std::{cell::Cell, rc::Rc};

use crate::subscription::{Listeners, Subscription};

/// The operating system's "prefers dark" signal.
///
/// Read-only from the stores' point of view. `None` means the environment
/// does not expose the signal at all.
pub trait AppearanceSignal {
    fn prefers_dark(&self) -> Option<bool>;

    /// Register `listener`, called with the new value each time the signal
    /// changes.
    fn subscribe(&self, listener: Box<dyn Fn(Option<bool>)>) -> Subscription;
}

/// In-process appearance signal whose value is set by hand.
///
/// Clones share the same value and listeners.
#[derive(Clone, Default)]
pub struct ManualAppearance {
    prefers_dark: Rc<Cell<Option<bool>>>,
    listeners: Listeners<Option<bool>>,
}

impl ManualAppearance {
    pub fn new(prefers_dark: Option<bool>) -> Self {
        Self {
            prefers_dark: Rc::new(Cell::new(prefers_dark)),
            listeners: Listeners::new(),
        }
    }

    /// Change the signal. Listeners only hear about actual changes.
    pub fn set(&self, prefers_dark: Option<bool>) {
        let previous = self.prefers_dark.replace(prefers_dark);
        if previous == prefers_dark {
            return;
        }
        tracing::debug!(?prefers_dark, "appearance signal changed");
        self.listeners.notify(prefers_dark);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl AppearanceSignal for ManualAppearance {
    fn prefers_dark(&self) -> Option<bool> {
        self.prefers_dark.get()
    }

    fn subscribe(&self, listener: Box<dyn Fn(Option<bool>)>) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

impl core::fmt::Debug for ManualAppearance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ManualAppearance")
            .field("prefers_dark", &self.prefers_dark.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
