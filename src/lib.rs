//! rest-synth
//!
//! Synthesizes executable HTTP clients from declarative interface contracts:
//!
//! - **Contracts**: interface and method descriptions loaded from JSON or YAML
//!   (see [`types`])
//! - **Synthesis**: one frame chain per routed method, cached per interface
//!   (see [`engine`])
//! - **Transports**: the network boundary, with a `ureq` implementation and an
//!   in-memory mock (see [`transport`])
//!
//! The `rest-synth` binary wraps these for the command line.

pub use rest_synth_core as engine;
pub use rest_synth_transport as transport;
pub use rest_synth_types as types;

pub use rest_synth_core::{
    CallArgs, ClientConfig, FrameChain, FrameKind, GeneratedClient, InvocationError,
    SynthesisCache, SynthesisError, SynthesizedType, Synthesizer,
};
pub use rest_synth_transport::{
    HttpRequest, HttpResponse, MockTransport, Transport, TransportConfig, TransportRegistry,
    TransportResolver, UreqTransport,
};
pub use rest_synth_types::{HttpVerb, InterfaceContract, MethodContract};
