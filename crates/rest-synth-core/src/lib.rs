//! rest-synth synthesis engine.
//!
//! Turns a declarative [`InterfaceContract`](rest_synth_types::InterfaceContract)
//! into a working HTTP client without hand-written method bodies.
//!
//! ```text
//! contract --inspect--> Classification --build_chain--> FrameChain
//!          --synthesize--> SynthesizedType --instantiate--> GeneratedClient
//! ```
//!
//! - [`inspector`]: request-body and response-payload classification
//! - [`frame`] / [`scope`] / [`chain`]: the frame IR, variable resolution, and
//!   chain assembly with producer-before-consumer validation
//! - [`emitter`]: deterministic Rust source for each synthesized type
//! - [`client`]: the interpreter that executes chains against a transport
//! - [`synthesizer`] / [`cache`]: per-interface synthesis and the
//!   single-flight cache
//!
//! # Example
//!
//! ```ignore
//! let cache = SynthesisCache::new();
//! let ty = cache.get_or_synthesize(&contract)?;
//! let client = ty.instantiate(Arc::new(registry));
//! let widget: Widget = client.call("get_widget", CallArgs::new().with(json!(7))).await?;
//! ```

pub mod cache;
pub mod chain;
pub mod client;
pub mod codec;
pub mod emitter;
pub mod errors;
pub mod frame;
pub mod inspector;
pub mod metrics;
pub mod scope;
pub mod synthesizer;

pub use cache::SynthesisCache;
pub use chain::{build_chain, validate_chain, ChainIssue, ChainIssueKind, ChainValidation, FrameChain};
pub use client::{CallArgs, ClientConfig, GeneratedClient};
pub use codec::{Codec, JsonCodec};
pub use errors::{InvocationError, SynthesisError};
pub use frame::{Frame, FrameKind, FrameOp, UrlBinding, VarRef, Variable};
pub use inspector::{inspect, BodyParam, Classification};
pub use metrics::{CacheMetrics, MetricsSnapshot};
pub use scope::VariableScope;
pub use synthesizer::{derive_type_name, SynthesizedMethod, SynthesizedType, Synthesizer};
