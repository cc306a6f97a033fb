//! Theme resolution and persistence.
//!
//! The resolved theme combines three inputs:
//!
//! - the preference persisted in durable storage (`light`, `dark`, `system`
//!   or nothing at all),
//! - the operating system's "prefers dark" signal,
//! - the change notifications of that signal.
//!
//! An explicit `light` or `dark` choice pins the theme: OS changes are then
//! ignored until the user picks `system` again. Storage problems never reach
//! the caller; the theme falls back to light and writes are dropped.
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use crate::{
    appearance::AppearanceSignal,
    document::Document,
    host::Host,
    preference::{Preference, ResolvedPreference},
    storage::Storage,
    subscription::Subscription,
};

/// Durable storage key holding the persisted [`Preference`].
pub const DEFAULT_THEME_KEY: &str = "theme";

enum Stored {
    Absent,
    Set(Preference),
    Unreadable,
}

struct Inner {
    key: String,
    storage: Option<Rc<dyn Storage>>,
    appearance: Option<Rc<dyn AppearanceSignal>>,
    document: Option<Document>,
    applied: Cell<Option<ResolvedPreference>>,
}

impl Inner {
    fn load(&self) -> Stored {
        let Some(storage) = &self.storage else {
            return Stored::Unreadable;
        };

        match storage.get(&self.key) {
            Ok(None) => Stored::Absent,
            Ok(Some(raw)) => match raw.parse() {
                Ok(preference) => Stored::Set(preference),
                Err(err) => {
                    tracing::warn!("ignoring stored theme: {err}");
                    Stored::Absent
                }
            },
            Err(err) if err.is_unavailable() => {
                tracing::debug!("theme storage unavailable");
                Stored::Unreadable
            }
            Err(err) => {
                tracing::warn!("failed to read stored theme: {err}");
                Stored::Unreadable
            }
        }
    }

    fn prefers_dark(&self) -> Option<bool> {
        self.appearance
            .as_ref()
            .and_then(|appearance| appearance.prefers_dark())
    }

    fn resolve(&self) -> ResolvedPreference {
        self.resolve_stored(self.load())
    }

    fn resolve_stored(&self, stored: Stored) -> ResolvedPreference {
        match stored {
            Stored::Set(preference) => preference.resolve(self.prefers_dark()),
            Stored::Absent => ResolvedPreference::from_prefers_dark(self.prefers_dark()),
            Stored::Unreadable => ResolvedPreference::default(),
        }
    }

    fn follows_system(&self) -> bool {
        matches!(self.load(), Stored::Absent | Stored::Set(Preference::System))
    }

    fn persist(&self, preference: Preference) {
        let Some(storage) = &self.storage else {
            tracing::debug!("no durable storage, theme not saved");
            return;
        };

        match storage.set(&self.key, preference.as_str()) {
            Ok(()) => {}
            Err(err) if err.is_unavailable() => {
                tracing::debug!("theme storage unavailable, theme not saved");
            }
            Err(err) => tracing::warn!("failed to save theme: {err}"),
        }
    }

    fn render(&self, theme: ResolvedPreference) {
        self.applied.set(Some(theme));
        match &self.document {
            Some(document) => document.set_theme(theme),
            None => tracing::debug!(%theme, "no document to apply theme to"),
        }
    }
}

/// Resolves, persists and applies the theme preference.
///
/// Built from a [`Host`]; any capability the host lacks degrades to the
/// defaults described in the module docs.
pub struct PreferenceStore {
    inner: Rc<Inner>,
    system_subscription: RefCell<Option<Subscription>>,
}

impl PreferenceStore {
    pub fn new(host: &Host) -> Self {
        Self::with_key(host, DEFAULT_THEME_KEY)
    }

    pub fn with_key(host: &Host, key: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(Inner {
                key: key.into(),
                storage: host.durable(),
                appearance: host.appearance(),
                document: host.document(),
                applied: Cell::new(None),
            }),
            system_subscription: RefCell::new(None),
        }
    }

    /// The persisted preference, `None` when nothing (readable) is stored.
    pub fn stored(&self) -> Option<Preference> {
        match self.inner.load() {
            Stored::Set(preference) => Some(preference),
            Stored::Absent | Stored::Unreadable => None,
        }
    }

    /// The theme to show right now. Never `system`, never fails.
    pub fn resolve_current(&self) -> ResolvedPreference {
        self.inner.resolve()
    }

    /// Persist `preference` verbatim and apply its resolved value to the
    /// document.
    pub fn apply(&self, preference: Preference) {
        self.inner.persist(preference);
        let theme = preference.resolve(self.inner.prefers_dark());
        tracing::info!(%preference, %theme, "theme applied");
        self.inner.render(theme);
    }

    /// Flip between light and dark, pinning the result.
    ///
    /// When the stored preference cannot be read, the flip starts from the
    /// theme this store last applied.
    pub fn toggle(&self) -> ResolvedPreference {
        let current = match self.inner.load() {
            Stored::Unreadable => self.inner.applied.get().unwrap_or_default(),
            stored => self.inner.resolve_stored(stored),
        };
        let next = current.opposite();
        self.apply(next.into());
        next
    }

    /// Call `on_change` with the new theme whenever the OS signal changes
    /// while the user has not pinned a theme.
    ///
    /// Without an appearance signal the returned subscription is inert.
    pub fn subscribe_to_system_changes(
        &self,
        on_change: impl Fn(ResolvedPreference) + 'static,
    ) -> Subscription {
        let Some(appearance) = &self.inner.appearance else {
            tracing::debug!("no appearance signal to subscribe to");
            return Subscription::inert();
        };

        let inner: Weak<Inner> = Rc::downgrade(&self.inner);
        appearance.subscribe(Box::new(move |prefers_dark: Option<bool>| {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            if inner.follows_system() {
                on_change(ResolvedPreference::from_prefers_dark(prefers_dark));
            }
        }))
    }

    /// Apply the resolved theme now and keep the document in sync with the
    /// OS signal until [`PreferenceStore::teardown`] or drop.
    ///
    /// Nothing is persisted. Calling it again replaces the previous OS
    /// subscription.
    pub fn initialize(&self) {
        let theme = self.resolve_current();
        self.inner.render(theme);

        let inner: Weak<Inner> = Rc::downgrade(&self.inner);
        let subscription = self.subscribe_to_system_changes(move |theme| {
            if let Some(inner) = inner.upgrade() {
                inner.render(theme);
            }
        });
        let previous = self.system_subscription.replace(Some(subscription));
        drop(previous);

        tracing::info!(%theme, "theme initialized");
    }

    pub fn teardown(&self) {
        if let Some(mut subscription) = self.system_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl core::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("key", &self.inner.key)
            .field("subscribed", &self.system_subscription.borrow().is_some())
            .finish()
    }
}
