use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

type Callback<T> = Rc<dyn Fn(T)>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
    dispatching: usize,
}

/// A single-threaded list of listeners notified with a `Copy` payload.
///
/// Dispatch runs on a snapshot of the registered listeners, so a listener may
/// unsubscribe itself (or others) while being notified. Subscribing from
/// inside a listener is refused.
pub struct Listeners<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: Copy + 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
                dispatching: 0,
            })),
        }
    }

    /// Register `callback`. It stays registered until the returned
    /// [`Subscription`] is unsubscribed or dropped.
    pub fn subscribe(&self, callback: impl Fn(T) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        if registry.dispatching > 0 {
            tracing::warn!("refusing to subscribe from inside a listener");
            return Subscription::inert();
        }

        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, Rc::new(callback)));

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    pub fn notify(&self, value: T) {
        let snapshot: Vec<Callback<T>> = {
            let mut registry = self.registry.borrow_mut();
            registry.dispatching += 1;
            registry
                .entries
                .iter()
                .map(|(_, callback)| Rc::clone(callback))
                .collect()
        };
        let _guard = DispatchGuard(&self.registry);

        for callback in snapshot {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Copy + 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

struct DispatchGuard<'a, T>(&'a Rc<RefCell<Registry<T>>>);

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        self.0.borrow_mut().dispatching -= 1;
    }
}

/// Handle to a registered listener.
///
/// The listener is removed on [`Subscription::unsubscribe`] or when the
/// handle is dropped. Unsubscribing more than once is a no-op.
#[must_use = "dropping a Subscription unregisters the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing behind it, used when the source does not
    /// exist in this environment.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
