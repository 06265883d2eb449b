//! Transport traits and the per-interface registry.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::http::{HttpRequest, HttpResponse};

/// Sends one request and returns the raw response.
///
/// Implementations return `Ok` for any response the server produced,
/// including non-2xx statuses; `Err` is reserved for failures to get a
/// response at all. Retries, pooling and backoff belong here, not in the
/// synthesized methods.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// The resolution container boundary: one shared transport per interface.
pub trait TransportResolver: Send + Sync {
    fn transport_for(&self, interface: &str) -> Option<Arc<dyn Transport>>;
}

/// A simple [`TransportResolver`] backed by a map keyed by interface identity,
/// with an optional fallback transport.
#[derive(Default)]
pub struct TransportRegistry {
    transports: RwLock<HashMap<String, Arc<dyn Transport>>>,
    fallback: RwLock<Option<Arc<dyn Transport>>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that hands the same transport to every interface.
    pub fn with_fallback(transport: Arc<dyn Transport>) -> Self {
        let registry = Self::default();
        registry.set_fallback(transport);
        registry
    }

    /// Register (or replace) the transport for `interface`.
    pub fn register(&self, interface: impl Into<String>, transport: Arc<dyn Transport>) {
        self.transports.write().insert(interface.into(), transport);
    }

    pub fn set_fallback(&self, transport: Arc<dyn Transport>) {
        *self.fallback.write() = Some(transport);
    }

    pub fn is_registered(&self, interface: &str) -> bool {
        self.transports.read().contains_key(interface)
    }
}

impl TransportResolver for TransportRegistry {
    fn transport_for(&self, interface: &str) -> Option<Arc<dyn Transport>> {
        if let Some(transport) = self.transports.read().get(interface) {
            return Some(transport.clone());
        }
        self.fallback.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    #[test]
    fn test_registry_prefers_specific_then_fallback() {
        let registry = TransportRegistry::new();
        assert!(registry.transport_for("widgets::IWidgetApi").is_none());

        let specific: Arc<dyn Transport> = Arc::new(MockTransport::new());
        let fallback: Arc<dyn Transport> = Arc::new(MockTransport::new());
        registry.register("widgets::IWidgetApi", specific.clone());
        registry.set_fallback(fallback.clone());

        let resolved = registry.transport_for("widgets::IWidgetApi").unwrap();
        assert!(Arc::ptr_eq(&resolved, &specific));

        let other = registry.transport_for("orders::IOrderApi").unwrap();
        assert!(Arc::ptr_eq(&other, &fallback));
        assert!(registry.is_registered("widgets::IWidgetApi"));
        assert!(!registry.is_registered("orders::IOrderApi"));
    }
}
