//! rest-synth Transport Layer
//!
//! The network side of a synthesized client. The synthesis engine never
//! talks to the network itself; its invoke frame hands an [`HttpRequest`]
//! to whatever [`Transport`] the resolution container supplies.
//!
//! This crate provides:
//! - [`http`]: request/response messages
//! - [`transport`]: the [`Transport`] and [`TransportResolver`] traits plus a
//!   [`TransportRegistry`] keyed by interface identity
//! - [`ureq_transport`]: a blocking `ureq` agent driven from async code
//! - [`mock`]: an in-memory transport with canned responses for tests
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rest_synth_transport::{TransportConfig, TransportRegistry, UreqTransport};
//!
//! let registry = TransportRegistry::new();
//! let transport = UreqTransport::new(TransportConfig::from_env().with_base_url("http://localhost:8080"));
//! registry.register("widgets::IWidgetApi", Arc::new(transport));
//! ```

pub mod http;
pub mod mock;
pub mod transport;
pub mod ureq_transport;

// Re-export main types for convenience
pub use http::{HttpRequest, HttpResponse};
pub use mock::MockTransport;
pub use transport::{Transport, TransportRegistry, TransportResolver};
pub use ureq_transport::{TransportConfig, UreqTransport};
