//! Client-side UI preferences for the Ahorro dashboard.
//!
//! Two independent stores, both built from a [`Host`] describing what the
//! environment offers:
//!
//! - [`PreferenceStore`] resolves the light/dark theme from a persisted
//!   choice and the OS appearance signal, and applies it to the [`Document`].
//! - [`CollapseStore`] remembers which panels are collapsed for the current
//!   session.
//!
//! Neither store ever fails: theme and panel state are cosmetic, so missing
//! or broken storage degrades to defaults.
pub use appearance::{AppearanceSignal, ManualAppearance};
pub use collapse::{CollapseEntry, CollapseStore, DEFAULT_COLLAPSE_PREFIX};
pub use document::{Document, THEME_ATTRIBUTE};
pub use error::{ParsePreferenceError, StorageError, StorageResult};
pub use host::{Host, HostBuilder};
pub use preference::{Preference, ResolvedPreference};
pub use storage::{FileStorage, MemoryStorage, Storage, Unavailable};
pub use subscription::{Listeners, Subscription};
pub use theme::{DEFAULT_THEME_KEY, PreferenceStore};

mod appearance;
mod collapse;
mod document;
mod error;
mod host;
mod preference;
mod storage;
mod subscription;
mod theme;
