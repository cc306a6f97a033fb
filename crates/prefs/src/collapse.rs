use std::{cell::Cell, rc::Rc};

use crate::{host::Host, storage::Storage};

/// Prefix of every session storage slot written by [`CollapseStore`].
pub const DEFAULT_COLLAPSE_PREFIX: &str = "collapse";

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn encode_flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Session-scoped collapsed/expanded flags, one storage slot per panel key.
///
/// A key that was never written reads as the caller's default, which is not
/// the same as a stored `false`. Storage failures read as the default and
/// drop writes.
#[derive(Clone)]
pub struct CollapseStore {
    prefix: String,
    storage: Option<Rc<dyn Storage>>,
}

impl CollapseStore {
    pub fn new(host: &Host) -> Self {
        Self::with_prefix(host, DEFAULT_COLLAPSE_PREFIX)
    }

    pub fn with_prefix(host: &Host, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            storage: host.session(),
        }
    }

    /// Slot name for `key`: `<prefix>_<key>`.
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }

    pub fn read(&self, key: &str, default: bool) -> bool {
        let Some(storage) = &self.storage else {
            return default;
        };

        let slot = self.storage_key(key);
        match storage.get(&slot) {
            Ok(Some(raw)) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(%slot, %raw, "ignoring malformed collapse state");
                default
            }),
            Ok(None) => default,
            Err(err) => {
                tracing::debug!(%slot, "collapse state unreadable: {err}");
                default
            }
        }
    }

    /// Invert `current`, the value the caller holds for `key`, and persist
    /// the result.
    pub fn toggle(&self, key: &str, current: bool) -> bool {
        let next = !current;
        self.set(key, next);
        next
    }

    pub fn set(&self, key: &str, value: bool) {
        let Some(storage) = &self.storage else {
            return;
        };

        let slot = self.storage_key(key);
        if let Err(err) = storage.set(&slot, encode_flag(value)) {
            tracing::debug!(%slot, "collapse state not saved: {err}");
        }
    }

    /// Handle for one panel. The stored value (or `default`) is read once
    /// here and then held by the handle.
    pub fn entry(&self, key: impl Into<String>, default: bool) -> CollapseEntry {
        let key = key.into();
        let collapsed = self.read(&key, default);
        CollapseEntry {
            store: self.clone(),
            key,
            collapsed: Cell::new(collapsed),
        }
    }
}

impl core::fmt::Debug for CollapseStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CollapseStore")
            .field("prefix", &self.prefix)
            .field("storage", &self.storage.is_some())
            .finish()
    }
}

/// Collapse state of a single panel, as a widget holds it.
#[derive(Debug)]
pub struct CollapseEntry {
    store: CollapseStore,
    key: String,
    collapsed: Cell<bool>,
}

impl CollapseEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed.get()
    }

    pub fn toggle(&self) -> bool {
        let next = self.store.toggle(&self.key, self.collapsed.get());
        self.collapsed.set(next);
        next
    }

    pub fn set(&self, collapsed: bool) {
        self.store.set(&self.key, collapsed);
        self.collapsed.set(collapsed);
    }
}
