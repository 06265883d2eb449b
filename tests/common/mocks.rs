//! Canned transports.

use rest_synth::{HttpVerb, MockTransport, Transport, TransportRegistry};
use serde_json::json;
use std::sync::Arc;

use super::fixtures::WIDGETS_INTERFACE;

/// A transport that serves the widget routes used across the tests.
pub fn widget_transport() -> MockTransport {
    MockTransport::new()
        .respond_json(HttpVerb::Get, "/widgets/7", 200, json!({"id": 7, "name": "gear"}))
        .respond_json(HttpVerb::Post, "/widgets", 201, json!({"id": 8, "name": "cog"}))
        .respond(HttpVerb::Delete, "/widgets/7", 204, "")
        .respond_json(
            HttpVerb::Get,
            "/widgets",
            200,
            json!([{"id": 7, "name": "gear"}, {"id": 8, "name": "cog"}]),
        )
        .respond_json(
            HttpVerb::Put,
            "/widgets/7/name/sprocket",
            200,
            json!({"id": 7, "name": "sprocket"}),
        )
        .respond(HttpVerb::Get, "/widgets/500", 500, "database unavailable")
        .respond(HttpVerb::Get, "/widgets/13", 200, r#"{"id": "thirteen"}"#)
        .fail(HttpVerb::Get, "/widgets/99", "connection reset by peer")
}

/// Registry serving `transport` for the widget interface only.
pub fn registry_for(transport: Arc<dyn Transport>) -> Arc<TransportRegistry> {
    let registry = TransportRegistry::new();
    registry.register(WIDGETS_INTERFACE, transport);
    Arc::new(registry)
}
