use std::rc::Rc;

use crate::{appearance::AppearanceSignal, document::Document, storage::Storage};

/// The capabilities the surrounding environment offers to the stores.
///
/// Every capability is optional: a render pass without a browser has none of
/// them, and the stores fall back to safe defaults for whatever is missing.
#[derive(Clone, Default)]
pub struct Host {
    durable: Option<Rc<dyn Storage>>,
    session: Option<Rc<dyn Storage>>,
    appearance: Option<Rc<dyn AppearanceSignal>>,
    document: Option<Document>,
}

impl Host {
    /// Return a builder for `Host`.
    pub fn builder() -> HostBuilder {
        HostBuilder::default()
    }

    /// A host with no capabilities at all.
    pub fn headless() -> Self {
        Self::default()
    }

    /// Storage surviving restarts.
    pub fn durable(&self) -> Option<Rc<dyn Storage>> {
        self.durable.clone()
    }

    /// Storage cleared when the session ends.
    pub fn session(&self) -> Option<Rc<dyn Storage>> {
        self.session.clone()
    }

    pub fn appearance(&self) -> Option<Rc<dyn AppearanceSignal>> {
        self.appearance.clone()
    }

    pub fn document(&self) -> Option<Document> {
        self.document.clone()
    }
}

impl core::fmt::Debug for Host {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Host")
            .field("durable", &self.durable.is_some())
            .field("session", &self.session.is_some())
            .field("appearance", &self.appearance.is_some())
            .field("document", &self.document)
            .finish()
    }
}

#[derive(Default)]
pub struct HostBuilder {
    host: Host,
}

impl HostBuilder {
    pub fn durable(mut self, storage: Rc<dyn Storage>) -> HostBuilder {
        self.host.durable = Some(storage);
        self
    }

    pub fn session(mut self, storage: Rc<dyn Storage>) -> HostBuilder {
        self.host.session = Some(storage);
        self
    }

    pub fn appearance(mut self, signal: Rc<dyn AppearanceSignal>) -> HostBuilder {
        self.host.appearance = Some(signal);
        self
    }

    pub fn document(mut self, document: Document) -> HostBuilder {
        self.host.document = Some(document);
        self
    }

    /// Construct `Host`
    pub fn build(self) -> Host {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{appearance::ManualAppearance, storage::MemoryStorage};

    #[test]
    fn headless_has_nothing() {
        let host = Host::headless();
        assert!(host.durable().is_none());
        assert!(host.session().is_none());
        assert!(host.appearance().is_none());
        assert!(host.document().is_none());
    }

    #[test]
    fn builder_sets_capabilities() {
        let document = Document::new();
        let host = Host::builder()
            .durable(Rc::new(MemoryStorage::new()))
            .appearance(Rc::new(ManualAppearance::new(Some(true))))
            .document(document)
            .build();

        assert!(host.durable().is_some());
        assert!(host.session().is_none());
        assert_eq!(
            host.appearance().and_then(|signal| signal.prefers_dark()),
            Some(true)
        );
    }
}
