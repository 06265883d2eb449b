//! Frames: the atomic steps of a synthesized method body.
//!
//! A frame declares at most one output [`Variable`] and refers to its inputs
//! through [`VarRef`]s. References are lookups, never ownership: a
//! [`VarRef::Frame`] names the position of an earlier frame in the same
//! chain, a [`VarRef::Argument`] names a method parameter.

use rest_synth_types::{HttpVerb, RouteTemplate, TypeExpr};
use std::fmt;

/// A named, typed value introduced into a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: TypeExpr,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Reference to a value available to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarRef {
    /// Method parameter, by position.
    Argument(u16),
    /// Output of an earlier frame, by position in the chain.
    Frame(u16),
}

/// Which step a frame performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    AcquireTransport,
    BuildUrl,
    SerializeBody,
    BuildRequest,
    InvokeTransport,
    DeserializeResponse,
    Return,
}

impl FrameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameKind::AcquireTransport => "acquire-transport",
            FrameKind::BuildUrl => "build-url",
            FrameKind::SerializeBody => "serialize-body",
            FrameKind::BuildRequest => "build-request",
            FrameKind::InvokeTransport => "invoke-transport",
            FrameKind::DeserializeResponse => "deserialize-response",
            FrameKind::Return => "return",
        }
    }

    /// Only the transport call may suspend.
    pub fn is_suspending(self) -> bool {
        matches!(self, FrameKind::InvokeTransport)
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A route placeholder and the parameter that fills it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBinding {
    pub placeholder: String,
    pub argument: Option<u16>,
}

/// The operation a frame performs, with its static configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOp {
    /// Fetch the shared transport for `interface` from the resolver.
    AcquireTransport { interface: String },

    /// Fill `template`; unbound placeholders fail when the method runs.
    BuildUrl {
        template: RouteTemplate,
        bindings: Vec<UrlBinding>,
    },

    /// Serialize the body argument as `body_type`.
    SerializeBody { body_type: TypeExpr },

    /// Assemble the request. Inputs: url, then body if `has_body`.
    BuildRequest { verb: HttpVerb, has_body: bool },

    /// Send the request. Inputs: transport, request.
    InvokeTransport,

    /// Decode the response body as `payload_type`.
    DeserializeResponse { payload_type: TypeExpr },

    /// Return the single input, or nothing.
    Return,
}

impl FrameOp {
    pub fn kind(&self) -> FrameKind {
        match self {
            FrameOp::AcquireTransport { .. } => FrameKind::AcquireTransport,
            FrameOp::BuildUrl { .. } => FrameKind::BuildUrl,
            FrameOp::SerializeBody { .. } => FrameKind::SerializeBody,
            FrameOp::BuildRequest { .. } => FrameKind::BuildRequest,
            FrameOp::InvokeTransport => FrameKind::InvokeTransport,
            FrameOp::DeserializeResponse { .. } => FrameKind::DeserializeResponse,
            FrameOp::Return => FrameKind::Return,
        }
    }
}

/// One step of a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub op: FrameOp,
    pub inputs: Vec<VarRef>,
    pub output: Option<Variable>,
}

impl Frame {
    pub fn kind(&self) -> FrameKind {
        self.op.kind()
    }

    /// Render this frame as Rust statements.
    ///
    /// `name_of` maps each input reference to the variable name bound to it.
    pub fn render<'a, F>(&self, name_of: F) -> Vec<String>
    where
        F: Fn(VarRef) -> &'a str,
    {
        let input = |idx: usize| self.inputs.get(idx).map(|r| name_of(*r)).unwrap_or("_");
        let output = self
            .output
            .as_ref()
            .map(|v| v.name.as_str())
            .unwrap_or("_");

        match &self.op {
            FrameOp::AcquireTransport { interface } => vec![format!(
                "let {} = self.transports.transport_for({:?}).ok_or_else(|| InvocationError::missing_transport({:?}))?;",
                output, interface, interface
            )],
            FrameOp::BuildUrl { template, bindings } => {
                let pairs = bindings
                    .iter()
                    .filter_map(|binding| {
                        binding
                            .argument
                            .map(|arg| format!("({:?}, &{} as &dyn Display)", binding.placeholder, name_of(VarRef::Argument(arg))))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![format!(
                    "let {} = fill_route({:?}, &[{}])?;",
                    output,
                    template.as_str(),
                    pairs
                )]
            }
            FrameOp::SerializeBody { body_type } => vec![format!(
                "let {} = self.codec.serialize::<{}>(&{})?;",
                output,
                body_type,
                input(0)
            )],
            FrameOp::BuildRequest { verb, has_body } => {
                let mut line = format!(
                    "let {} = HttpRequest::new(HttpVerb::{}, {})",
                    output,
                    verb.variant_name(),
                    input(0)
                );
                if *has_body {
                    line.push_str(&format!(".with_json_body({})", input(1)));
                }
                line.push(';');
                vec![line]
            }
            FrameOp::InvokeTransport => vec![format!(
                "let {} = {}.send({}).await?.error_for_status()?;",
                output,
                input(0),
                input(1)
            )],
            FrameOp::DeserializeResponse { payload_type } => vec![format!(
                "let {}: {} = self.codec.deserialize(&{}.body)?;",
                output,
                payload_type,
                input(0)
            )],
            FrameOp::Return => match self.inputs.first() {
                Some(value) => vec![format!("Ok({})", name_of(*value))],
                None => vec!["Ok(())".to_string()],
            },
        }
    }
}
