//! Executing synthesized methods.
//!
//! A [`GeneratedClient`] is a [`SynthesizedType`] bound to a transport
//! resolver. Calling a method walks its frame chain in order, keeping one
//! result slot per frame; a frame's inputs are read from earlier slots or
//! from the call arguments. Only the invoke-transport frame awaits.

use rest_synth_transport::{HttpRequest, HttpResponse, Transport, TransportConfig, TransportResolver};
use rest_synth_types::env_utils::env_var;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::codec::{Codec, JsonCodec};
use crate::errors::InvocationError;
use crate::frame::{Frame, FrameOp, VarRef};
use crate::synthesizer::{SynthesizedMethod, SynthesizedType};

/// Environment variable for the per-call timeout in milliseconds.
pub const CALL_TIMEOUT_ENV: &str = "REST_SYNTH_CALL_TIMEOUT_MS";

/// Client-side settings.
///
/// Configuration via environment variables:
///
/// - `REST_SYNTH_CALL_TIMEOUT_MS` - limit on each transport await (unset or 0: none)
/// - plus everything [`TransportConfig::from_env`] reads
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub transport: TransportConfig,
    pub call_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            transport: TransportConfig::from_env(),
            call_timeout: env_var::<u64>(CALL_TIMEOUT_ENV)
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.transport = self.transport.with_base_url(base_url);
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }
}

/// Positional arguments for one call, as JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs(Vec<Value>);

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-encoded argument.
    pub fn with(mut self, value: Value) -> Self {
        self.0.push(value);
        self
    }

    /// Append any serializable argument.
    pub fn arg<T: Serialize>(self, value: &T) -> Result<Self, serde_json::Error> {
        Ok(self.with(serde_json::to_value(value)?))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// What a frame left behind for later frames.
enum Slot {
    Empty,
    Transport(Arc<dyn Transport>),
    Url(String),
    Body(Vec<u8>),
    Request(HttpRequest),
    Response(HttpResponse),
    Value(Value),
}

/// A synthesized type bound to its transports.
#[derive(Clone)]
pub struct GeneratedClient {
    ty: Arc<SynthesizedType>,
    transports: Arc<dyn TransportResolver>,
    codec: Arc<dyn Codec>,
    config: ClientConfig,
}

impl GeneratedClient {
    pub fn new(ty: Arc<SynthesizedType>, transports: Arc<dyn TransportResolver>) -> Self {
        Self {
            ty,
            transports,
            codec: Arc::new(JsonCodec),
            config: ClientConfig::default(),
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn synthesized_type(&self) -> &Arc<SynthesizedType> {
        &self.ty
    }

    /// Run `method` and return its result as JSON (`null` for no payload).
    pub async fn invoke(&self, method: &str, args: CallArgs) -> Result<Value, InvocationError> {
        let synthesized = self
            .ty
            .method(method)
            .ok_or_else(|| InvocationError::UnknownMethod {
                method: method.to_string(),
            })?;

        let expected = synthesized.chain.arguments().len();
        if args.len() != expected {
            return Err(InvocationError::ArgumentCount {
                method: method.to_string(),
                expected,
                got: args.len(),
            });
        }

        debug!(
            interface = self.ty.interface(),
            method,
            "invoking synthesized method"
        );
        Execution::new(self, synthesized, args).run().await
    }

    /// Run `method` and decode its result as `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        args: CallArgs,
    ) -> Result<T, InvocationError> {
        let value = self.invoke(method, args).await?;
        serde_json::from_value(value).map_err(|e| InvocationError::Deserialization {
            method: method.to_string(),
            expected_type: std::any::type_name::<T>().to_string(),
            message: e.to_string(),
        })
    }
}

/// State of one call: the arguments and one slot per executed frame.
struct Execution<'a> {
    client: &'a GeneratedClient,
    method: &'a SynthesizedMethod,
    args: Vec<Value>,
    results: Vec<Slot>,
}

impl<'a> Execution<'a> {
    fn new(client: &'a GeneratedClient, method: &'a SynthesizedMethod, args: CallArgs) -> Self {
        Self {
            client,
            method,
            args: args.0,
            results: Vec::with_capacity(method.chain.len()),
        }
    }

    async fn run(mut self) -> Result<Value, InvocationError> {
        let frames = self.method.chain.frames();
        for (idx, frame) in frames.iter().enumerate() {
            trace!(method = self.method.name(), frame = idx, kind = %frame.kind(), "executing frame");
            let slot = self.execute_frame(idx, frame).await?;
            if let FrameOp::Return = frame.op {
                return match slot {
                    Slot::Value(value) => Ok(value),
                    _ => Ok(Value::Null),
                };
            }
            self.results.push(slot);
        }
        Ok(Value::Null)
    }

    async fn execute_frame(&self, idx: usize, frame: &Frame) -> Result<Slot, InvocationError> {
        let method = self.method.name();
        match &frame.op {
            FrameOp::AcquireTransport { interface } => self
                .client
                .transports
                .transport_for(interface)
                .map(Slot::Transport)
                .ok_or_else(|| InvocationError::missing_transport(interface)),

            FrameOp::BuildUrl { template, bindings } => {
                let url = template
                    .fill(|name| {
                        bindings
                            .iter()
                            .find(|binding| binding.placeholder == name)
                            .and_then(|binding| binding.argument)
                            .and_then(|arg| self.args.get(arg as usize))
                            .map(path_value)
                    })
                    .map_err(|placeholder| InvocationError::UnmatchedPlaceholder {
                        method: method.to_string(),
                        placeholder,
                        route: template.to_string(),
                    })?;
                Ok(Slot::Url(url))
            }

            FrameOp::SerializeBody { body_type } => {
                let value = self.value_input(idx, frame, 0)?;
                self.client
                    .codec
                    .serialize(value, body_type)
                    .map(Slot::Body)
                    .map_err(|e| InvocationError::Serialization {
                        method: method.to_string(),
                        expected_type: body_type.to_string(),
                        message: format!("{:#}", e),
                    })
            }

            FrameOp::BuildRequest { verb, has_body } => {
                let url = match self.slot_input(idx, frame, 0)? {
                    Slot::Url(url) => url.clone(),
                    _ => return Err(self.frame_input(idx, "a url")),
                };
                let mut request = HttpRequest::new(*verb, url);
                if *has_body {
                    match self.slot_input(idx, frame, 1)? {
                        Slot::Body(body) => request = request.with_json_body(body.clone()),
                        _ => return Err(self.frame_input(idx, "a serialized body")),
                    }
                }
                Ok(Slot::Request(request))
            }

            FrameOp::InvokeTransport => {
                let transport = match self.slot_input(idx, frame, 0)? {
                    Slot::Transport(transport) => Arc::clone(transport),
                    _ => return Err(self.frame_input(idx, "a transport")),
                };
                let request = match self.slot_input(idx, frame, 1)? {
                    Slot::Request(request) => request.clone(),
                    _ => return Err(self.frame_input(idx, "a request")),
                };
                self.send(transport, request).await.map(Slot::Response)
            }

            FrameOp::DeserializeResponse { payload_type } => {
                let response = match self.slot_input(idx, frame, 0)? {
                    Slot::Response(response) => response,
                    _ => return Err(self.frame_input(idx, "a response")),
                };
                self.client
                    .codec
                    .deserialize(&response.body, payload_type)
                    .map(Slot::Value)
                    .map_err(|e| InvocationError::Deserialization {
                        method: method.to_string(),
                        expected_type: payload_type.to_string(),
                        message: format!("{:#}", e),
                    })
            }

            FrameOp::Return => match frame.inputs.first() {
                Some(_) => Ok(Slot::Value(self.value_input(idx, frame, 0)?.clone())),
                None => Ok(Slot::Empty),
            },
        }
    }

    /// The only await point of a call.
    async fn send(
        &self,
        transport: Arc<dyn Transport>,
        request: HttpRequest,
    ) -> Result<HttpResponse, InvocationError> {
        let method = self.method.name();
        let verb = request.method;
        let url = request.url.clone();

        let sent = match self.client.config.call_timeout {
            Some(limit) => tokio::time::timeout(limit, transport.send(request))
                .await
                .map_err(|_| InvocationError::Timeout {
                    method: method.to_string(),
                    timeout_ms: limit.as_millis() as u64,
                })?,
            None => transport.send(request).await,
        };

        let response = sent.map_err(|e| InvocationError::Transport {
            method: method.to_string(),
            message: format!("{:#}", e),
        })?;

        debug!(method, verb = %verb, url = %url, status = response.status, "transport responded");

        if !response.is_success() {
            return Err(InvocationError::Status {
                method: method.to_string(),
                status: response.status,
                body: response.body_text(),
            });
        }
        Ok(response)
    }

    fn slot_input(&self, idx: usize, frame: &Frame, position: usize) -> Result<&Slot, InvocationError> {
        match frame.inputs.get(position) {
            Some(VarRef::Frame(source)) => self
                .results
                .get(*source as usize)
                .ok_or_else(|| self.frame_input(idx, "an earlier frame result")),
            _ => Err(self.frame_input(idx, "an earlier frame result")),
        }
    }

    fn value_input(&self, idx: usize, frame: &Frame, position: usize) -> Result<&Value, InvocationError> {
        match frame.inputs.get(position) {
            Some(VarRef::Argument(arg)) => self
                .args
                .get(*arg as usize)
                .ok_or_else(|| self.frame_input(idx, "a call argument")),
            Some(VarRef::Frame(source)) => match self.results.get(*source as usize) {
                Some(Slot::Value(value)) => Ok(value),
                _ => Err(self.frame_input(idx, "a decoded value")),
            },
            None => Err(self.frame_input(idx, "a value")),
        }
    }

    fn frame_input(&self, idx: usize, expected: &str) -> InvocationError {
        InvocationError::FrameInput {
            method: self.method.name().to_string(),
            frame: idx,
            expected: expected.to_string(),
        }
    }
}

/// Text substituted for a placeholder. Not percent-encoded.
fn path_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
