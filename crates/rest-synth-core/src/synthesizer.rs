//! Interface-level synthesis.
//!
//! [`Synthesizer::synthesize`] turns one [`InterfaceContract`] into a
//! [`SynthesizedType`]: a frame chain per routed method plus the rendered
//! source. Either every routed method synthesizes or the interface fails as
//! a whole.

use rest_synth_transport::TransportResolver;
use rest_synth_types::{InterfaceContract, MethodContract, Route};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::chain::{build_chain, FrameChain};
use crate::client::GeneratedClient;
use crate::emitter::emit_source;
use crate::errors::SynthesisError;
use crate::inspector::{inspect, Classification};

/// Suffix appended when the interface name carries no `I` marker.
pub const IMPLEMENTATION_SUFFIX: &str = "Implementation";

/// Implementation type name for an interface identity.
///
/// Uses the last `::` segment. A leading `I` followed by an uppercase letter
/// is dropped (`IWidgetApi` -> `WidgetApi`); otherwise the suffix is appended
/// (`Widgets` -> `WidgetsImplementation`).
pub fn derive_type_name(interface: &str) -> String {
    let short = interface.rsplit("::").next().unwrap_or(interface);
    let mut chars = short.chars();
    match (chars.next(), chars.next()) {
        (Some('I'), Some(second)) if second.is_ascii_uppercase() => short[1..].to_string(),
        _ => format!("{}{}", short, IMPLEMENTATION_SUFFIX),
    }
}

/// One routed method and its compiled plan.
#[derive(Debug, Clone)]
pub struct SynthesizedMethod {
    pub contract: MethodContract,
    pub route: Route,
    pub classification: Classification,
    pub chain: FrameChain,
}

impl SynthesizedMethod {
    pub fn name(&self) -> &str {
        &self.contract.name
    }

    pub fn has_body(&self) -> bool {
        self.classification.request_body.is_some()
    }

    pub fn returns_value(&self) -> bool {
        self.classification.response_payload.is_some()
    }
}

/// The implementation type for one interface.
#[derive(Debug)]
pub struct SynthesizedType {
    type_name: String,
    interface: String,
    fingerprint: String,
    methods: Vec<SynthesizedMethod>,
    unrouted: Vec<String>,
    source: String,
}

impl SynthesizedType {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Fingerprint of the contract this type was built from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Compiled plans, in contract order.
    pub fn methods(&self) -> &[SynthesizedMethod] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&SynthesizedMethod> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Names of declared methods that carry no route.
    pub fn unrouted(&self) -> &[String] {
        &self.unrouted
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Bind the type to a transport resolver.
    pub fn instantiate(self: &Arc<Self>, transports: Arc<dyn TransportResolver>) -> GeneratedClient {
        GeneratedClient::new(Arc::clone(self), transports)
    }
}

/// Builds [`SynthesizedType`]s. Stateless; caching lives in
/// [`SynthesisCache`](crate::SynthesisCache).
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer;

impl Synthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(&self, contract: &InterfaceContract) -> Result<SynthesizedType, SynthesisError> {
        let interface = contract.name.as_str();
        info!(interface, methods = contract.methods.len(), "synthesizing interface");

        let mut seen = HashSet::new();
        for method in &contract.methods {
            if !seen.insert(method.name.as_str()) {
                return Err(SynthesisError::DuplicateMethod {
                    interface: interface.to_string(),
                    method: method.name.clone(),
                });
            }
        }

        let mut methods = Vec::new();
        let mut unrouted = Vec::new();
        for method in &contract.methods {
            let Some(route) = &method.route else {
                debug!(interface, method = %method.name, "skipping method without route");
                unrouted.push(method.name.clone());
                continue;
            };
            let classification = inspect(interface, method, route)?;
            let chain = build_chain(interface, method, route, &classification)?;
            debug!(
                interface,
                method = %method.name,
                body = classification.request_body.is_some(),
                payload = classification.response_payload.is_some(),
                frames = chain.len(),
                "synthesized method"
            );
            methods.push(SynthesizedMethod {
                contract: method.clone(),
                route: route.clone(),
                classification,
                chain,
            });
        }

        if methods.is_empty() {
            return Err(SynthesisError::NothingToSynthesize {
                interface: interface.to_string(),
            });
        }

        let type_name = derive_type_name(interface);
        let fingerprint = contract.fingerprint();
        let source = emit_source(contract, &type_name, &fingerprint, &methods);

        info!(
            interface,
            type_name = %type_name,
            methods = methods.len(),
            unrouted = unrouted.len(),
            "synthesized interface"
        );

        Ok(SynthesizedType {
            type_name,
            interface: interface.to_string(),
            fingerprint,
            methods,
            unrouted,
            source,
        })
    }
}
