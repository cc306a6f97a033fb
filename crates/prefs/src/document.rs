use std::{cell::Cell, rc::Rc};

use crate::{
    preference::ResolvedPreference,
    subscription::{Listeners, Subscription},
};

/// Name of the root attribute carrying the resolved theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// The document root shared by every view.
///
/// It carries a single theme attribute. Views subscribe to it and re-render
/// when it changes. Clones share the same root.
#[derive(Clone, Default)]
pub struct Document {
    theme: Rc<Cell<Option<ResolvedPreference>>>,
    listeners: Listeners<ResolvedPreference>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The applied theme, `None` until something applies one.
    pub fn theme(&self) -> Option<ResolvedPreference> {
        self.theme.get()
    }

    /// Attribute lookup by name; only [`THEME_ATTRIBUTE`] exists.
    pub fn attribute(&self, name: &str) -> Option<&'static str> {
        if name != THEME_ATTRIBUTE {
            return None;
        }
        self.theme.get().map(ResolvedPreference::as_str)
    }

    pub fn set_theme(&self, theme: ResolvedPreference) {
        let previous = self.theme.replace(Some(theme));
        if previous == Some(theme) {
            return;
        }
        tracing::debug!(%theme, "document theme updated");
        self.listeners.notify(theme);
    }

    pub fn on_theme_change(&self, view: impl Fn(ResolvedPreference) + 'static) -> Subscription {
        self.listeners.subscribe(view)
    }
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Document")
            .field("theme", &self.theme.get())
            .field("views", &self.listeners.len())
            .finish()
    }
}
