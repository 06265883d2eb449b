//! Frame chains: assembly and validation.
//!
//! Every synthesized method body has the same skeleton:
//!
//! ```text
//! acquire-transport -> build-url -> [serialize-body] -> build-request
//!     -> invoke-transport -> [deserialize-response] -> return
//! ```
//!
//! The bracketed frames are present only when the inspector found a request
//! body or a response payload. The two are independent.

use rest_synth_types::{parse_type_expr, MethodContract, Route, TypeExpr};
use tracing::trace;

use crate::errors::SynthesisError;
use crate::frame::{Frame, FrameKind, FrameOp, UrlBinding, VarRef, Variable};
use crate::inspector::Classification;
use crate::scope::VariableScope;

/// Type of the transport handle produced by the acquire-transport frame.
pub const TRANSPORT_TYPE: &str = "Arc<dyn Transport>";
/// Type of the filled URL.
pub const URL_TYPE: &str = "String";
/// Type of a serialized body.
pub const BODY_TYPE: &str = "Vec<u8>";
pub const REQUEST_TYPE: &str = "HttpRequest";
pub const RESPONSE_TYPE: &str = "HttpResponse";

fn internal_type(name: &str) -> TypeExpr {
    parse_type_expr(name).unwrap_or_else(|| TypeExpr::named(name))
}

/// The ordered frames of one synthesized method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameChain {
    method: String,
    arguments: Vec<Variable>,
    frames: Vec<Frame>,
}

impl FrameChain {
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Method parameters, in declaration order.
    pub fn arguments(&self) -> &[Variable] {
        &self.arguments
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn kinds(&self) -> Vec<FrameKind> {
        self.frames.iter().map(Frame::kind).collect()
    }

    pub fn contains(&self, kind: FrameKind) -> bool {
        self.frames.iter().any(|frame| frame.kind() == kind)
    }

    /// The payload type returned by the method, if it returns anything.
    pub fn return_type(&self) -> Option<&TypeExpr> {
        self.frames.iter().find_map(|frame| match &frame.op {
            FrameOp::DeserializeResponse { payload_type } => Some(payload_type),
            _ => None,
        })
    }

    /// Name bound to a reference in the rendered body.
    pub fn name_of(&self, reference: VarRef) -> Option<&str> {
        let variable = match reference {
            VarRef::Argument(idx) => self.arguments.get(idx as usize),
            VarRef::Frame(idx) => self
                .frames
                .get(idx as usize)
                .and_then(|frame| frame.output.as_ref()),
        };
        variable.map(|v| v.name.as_str())
    }

    /// Rust statements for the method body, in frame order.
    pub fn render_body(&self) -> Vec<String> {
        self.frames
            .iter()
            .flat_map(|frame| frame.render(|reference| self.name_of(reference).unwrap_or("_")))
            .collect()
    }

    pub fn validate(&self) -> ChainValidation {
        validate_chain(&self.frames, self.arguments.len())
    }
}

/// A problem found by [`validate_chain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainIssue {
    pub frame_index: usize,
    pub kind: ChainIssueKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainIssueKind {
    /// Reference to a frame that has not run yet.
    ForwardReference,
    /// Frame consumes its own output.
    SelfReference,
    /// Parameter index past the end of the parameter list.
    ArgumentOutOfBounds,
    /// Reference to an earlier frame that produces nothing.
    MissingOutput,
    /// The chain does not end in exactly one return frame.
    MisplacedReturn,
}

#[derive(Debug, Clone, Default)]
pub struct ChainValidation {
    pub issues: Vec<ChainIssue>,
}

impl ChainValidation {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|issue| issue.message.clone()).collect()
    }
}

/// Check producer-before-consumer ordering over `frames`.
pub fn validate_chain(frames: &[Frame], num_arguments: usize) -> ChainValidation {
    let mut issues = Vec::new();

    for (frame_idx, frame) in frames.iter().enumerate() {
        for input in &frame.inputs {
            match *input {
                VarRef::Argument(idx) => {
                    if (idx as usize) >= num_arguments {
                        issues.push(ChainIssue {
                            frame_index: frame_idx,
                            kind: ChainIssueKind::ArgumentOutOfBounds,
                            message: format!(
                                "frame {} ({}) references Argument({}) but the method has {} parameter(s)",
                                frame_idx,
                                frame.kind(),
                                idx,
                                num_arguments
                            ),
                        });
                    }
                }
                VarRef::Frame(idx) => {
                    let idx = idx as usize;
                    if idx == frame_idx {
                        issues.push(ChainIssue {
                            frame_index: frame_idx,
                            kind: ChainIssueKind::SelfReference,
                            message: format!(
                                "frame {} ({}) references its own output",
                                frame_idx,
                                frame.kind()
                            ),
                        });
                    } else if idx > frame_idx {
                        issues.push(ChainIssue {
                            frame_index: frame_idx,
                            kind: ChainIssueKind::ForwardReference,
                            message: format!(
                                "frame {} ({}) references Frame({}) which has not run yet",
                                frame_idx,
                                frame.kind(),
                                idx
                            ),
                        });
                    } else if frames[idx].output.is_none() {
                        issues.push(ChainIssue {
                            frame_index: frame_idx,
                            kind: ChainIssueKind::MissingOutput,
                            message: format!(
                                "frame {} ({}) consumes Frame({}) ({}) which produces no value",
                                frame_idx,
                                frame.kind(),
                                idx,
                                frames[idx].kind()
                            ),
                        });
                    }
                }
            }
        }

        let is_last = frame_idx + 1 == frames.len();
        if (frame.kind() == FrameKind::Return) != is_last {
            issues.push(ChainIssue {
                frame_index: frame_idx,
                kind: ChainIssueKind::MisplacedReturn,
                message: if is_last {
                    format!("chain ends with {} instead of return", frame.kind())
                } else {
                    format!("return at frame {} is not the last frame", frame_idx)
                },
            });
        }
    }

    if frames.is_empty() {
        issues.push(ChainIssue {
            frame_index: 0,
            kind: ChainIssueKind::MisplacedReturn,
            message: "chain has no frames".to_string(),
        });
    }

    ChainValidation { issues }
}

/// Appends frames while keeping the variable scope in step.
pub struct ChainBuilder {
    interface: String,
    method: String,
    arguments: Vec<Variable>,
    scope: VariableScope,
    frames: Vec<Frame>,
}

impl ChainBuilder {
    pub fn new(interface: &str, method: &str, arguments: Vec<Variable>) -> Self {
        Self {
            interface: interface.to_string(),
            method: method.to_string(),
            scope: VariableScope::with_arguments(&arguments),
            arguments,
            frames: Vec::new(),
        }
    }

    pub fn scope(&self) -> &VariableScope {
        &self.scope
    }

    /// Append a frame. Returns the reference to its output slot.
    pub fn push(
        &mut self,
        op: FrameOp,
        inputs: Vec<VarRef>,
        output: Option<(&str, TypeExpr)>,
    ) -> VarRef {
        let index = self.frames.len() as u16;
        let output = output.map(|(base, ty)| self.scope.declare(base, ty, index));
        self.frames.push(Frame { op, inputs, output });
        VarRef::Frame(index)
    }

    /// The latest frame output of `ty`.
    pub fn require(&self, ty: &TypeExpr) -> Result<VarRef, SynthesisError> {
        self.scope
            .resolve_output(ty)
            .ok_or_else(|| SynthesisError::InvalidChain {
                interface: self.interface.clone(),
                method: self.method.clone(),
                issues: vec![format!("no frame produces a value of type {}", ty)],
            })
    }

    /// Validate and seal the chain.
    pub fn finish(self) -> Result<FrameChain, SynthesisError> {
        let chain = FrameChain {
            method: self.method,
            arguments: self.arguments,
            frames: self.frames,
        };
        let validation = chain.validate();
        if !validation.is_valid() {
            return Err(SynthesisError::InvalidChain {
                interface: self.interface,
                method: chain.method,
                issues: validation.messages(),
            });
        }
        Ok(chain)
    }
}

/// Parse the declared parameter types of `method`.
pub fn method_arguments(
    interface: &str,
    method: &MethodContract,
) -> Result<Vec<Variable>, SynthesisError> {
    method
        .params
        .iter()
        .map(|param| {
            parse_type_expr(&param.ty)
                .map(|ty| Variable::new(param.name.clone(), ty))
                .ok_or_else(|| SynthesisError::InvalidTypeExpression {
                    interface: interface.to_string(),
                    method: method.name.clone(),
                    expression: param.ty.clone(),
                })
        })
        .collect()
}

/// Assemble the frame chain for one routed method.
pub fn build_chain(
    interface: &str,
    method: &MethodContract,
    route: &Route,
    classification: &Classification,
) -> Result<FrameChain, SynthesisError> {
    let arguments = method_arguments(interface, method)?;
    let mut builder = ChainBuilder::new(interface, &method.name, arguments);

    let transport_ty = internal_type(TRANSPORT_TYPE);
    let url_ty = internal_type(URL_TYPE);
    let body_ty = internal_type(BODY_TYPE);
    let request_ty = internal_type(REQUEST_TYPE);
    let response_ty = internal_type(RESPONSE_TYPE);

    builder.push(
        FrameOp::AcquireTransport {
            interface: interface.to_string(),
        },
        Vec::new(),
        Some(("transport", transport_ty.clone())),
    );

    let template = route.template();
    let bindings: Vec<UrlBinding> = template
        .placeholders()
        .into_iter()
        .map(|placeholder| UrlBinding {
            placeholder: placeholder.to_string(),
            argument: builder.scope().resolve_argument(placeholder),
        })
        .collect();
    let url_inputs = bindings
        .iter()
        .filter_map(|binding| binding.argument.map(VarRef::Argument))
        .collect();
    builder.push(
        FrameOp::BuildUrl { template, bindings },
        url_inputs,
        Some(("url", url_ty.clone())),
    );

    if let Some(body) = &classification.request_body {
        builder.push(
            FrameOp::SerializeBody {
                body_type: body.ty.clone(),
            },
            vec![VarRef::Argument(body.index)],
            Some(("body", body_ty.clone())),
        );
    }

    let has_body = classification.request_body.is_some();
    let mut request_inputs = vec![builder.require(&url_ty)?];
    if has_body {
        request_inputs.push(builder.require(&body_ty)?);
    }
    builder.push(
        FrameOp::BuildRequest {
            verb: route.method,
            has_body,
        },
        request_inputs,
        Some(("request", request_ty.clone())),
    );

    let invoke_inputs = vec![builder.require(&transport_ty)?, builder.require(&request_ty)?];
    builder.push(
        FrameOp::InvokeTransport,
        invoke_inputs,
        Some(("response", response_ty.clone())),
    );

    let result = match &classification.response_payload {
        Some(payload) => {
            let inputs = vec![builder.require(&response_ty)?];
            Some(builder.push(
                FrameOp::DeserializeResponse {
                    payload_type: payload.clone(),
                },
                inputs,
                Some(("result", payload.clone())),
            ))
        }
        None => None,
    };

    builder.push(FrameOp::Return, result.into_iter().collect(), None);

    let chain = builder.finish()?;
    trace!(
        interface,
        method = %method.name,
        frames = ?chain.kinds(),
        "assembled frame chain"
    );
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::inspect;
    use rest_synth_types::HttpVerb;

    fn chain_for(method: MethodContract) -> FrameChain {
        let route = method.route.clone().expect("routed");
        let classification = inspect("IWidgetApi", &method, &route).unwrap();
        build_chain("IWidgetApi", &method, &route, &classification).unwrap()
    }

    #[test]
    fn test_get_by_id_chain() {
        let chain = chain_for(
            MethodContract::new("get_widget")
                .param("id", "i64")
                .returns("Future<Widget>")
                .route(HttpVerb::Get, "/widgets/{id}"),
        );
        assert_eq!(
            chain.kinds(),
            vec![
                FrameKind::AcquireTransport,
                FrameKind::BuildUrl,
                FrameKind::BuildRequest,
                FrameKind::InvokeTransport,
                FrameKind::DeserializeResponse,
                FrameKind::Return,
            ]
        );
        assert_eq!(chain.return_type(), Some(&TypeExpr::named("Widget")));
        assert_eq!(
            chain.render_body(),
            vec![
                r#"let transport = self.transports.transport_for("IWidgetApi").ok_or_else(|| InvocationError::missing_transport("IWidgetApi"))?;"#,
                r#"let url = fill_route("/widgets/{id}", &[("id", &id as &dyn Display)])?;"#,
                "let request = HttpRequest::new(HttpVerb::Get, url);",
                "let response = transport.send(request).await?.error_for_status()?;",
                "let result: Widget = self.codec.deserialize(&response.body)?;",
                "Ok(result)",
            ]
        );
    }

    #[test]
    fn test_body_and_no_payload_are_independent() {
        let chain = chain_for(
            MethodContract::new("touch")
                .param("ping", "Ping")
                .returns("Future")
                .route(HttpVerb::Post, "/ping"),
        );
        assert!(chain.contains(FrameKind::SerializeBody));
        assert!(!chain.contains(FrameKind::DeserializeResponse));
        assert!(chain.return_type().is_none());
        assert_eq!(chain.frames().last().unwrap().inputs, Vec::new());
    }

    #[test]
    fn test_generated_names_do_not_shadow_parameters() {
        let chain = chain_for(
            MethodContract::new("odd")
                .param("url", "String")
                .param("request", "String")
                .returns("Future<String>")
                .route(HttpVerb::Get, "/x/{url}/{request}"),
        );
        let outputs: Vec<&str> = chain
            .frames()
            .iter()
            .filter_map(|f| f.output.as_ref().map(|v| v.name.as_str()))
            .collect();
        assert_eq!(outputs, vec!["transport", "url1", "request1", "response", "result"]);
        // build-request consumes the frame url, not the parameter of the same type
        assert_eq!(chain.frames()[2].inputs, vec![VarRef::Frame(1)]);
    }

    #[test]
    fn test_unbound_placeholder_is_kept() {
        let chain = chain_for(MethodContract::new("list").route(HttpVerb::Get, "/widgets/{id}"));
        match &chain.frames()[1].op {
            FrameOp::BuildUrl { bindings, .. } => {
                assert_eq!(bindings.len(), 1);
                assert_eq!(bindings[0].argument, None);
            }
            other => panic!("unexpected frame {:?}", other),
        }
        assert!(chain.frames()[1].inputs.is_empty());
    }

    #[test]
    fn test_hyphenated_placeholder_binds_argument() {
        let chain = chain_for(
            MethodContract::new("get_widget")
                .param("widget-id", "i64")
                .returns("Future<Widget>")
                .route(HttpVerb::Get, "/widgets/{widget-id}"),
        );
        assert!(!chain.contains(FrameKind::SerializeBody));
        match &chain.frames()[1].op {
            FrameOp::BuildUrl { bindings, .. } => {
                assert_eq!(bindings.len(), 1);
                assert_eq!(bindings[0].placeholder, "widget-id");
                assert_eq!(bindings[0].argument, Some(0));
            }
            other => panic!("unexpected frame {:?}", other),
        }
        assert_eq!(chain.frames()[1].inputs, vec![VarRef::Argument(0)]);
    }

    #[test]
    fn test_validate_rejects_bad_references() {
        let frames = vec![
            Frame {
                op: FrameOp::InvokeTransport,
                inputs: vec![VarRef::Frame(1), VarRef::Frame(0)],
                output: Some(Variable::new("response", TypeExpr::named("HttpResponse"))),
            },
            Frame {
                op: FrameOp::Return,
                inputs: vec![VarRef::Argument(3)],
                output: None,
            },
        ];
        let validation = validate_chain(&frames, 1);
        let kinds: Vec<ChainIssueKind> = validation.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChainIssueKind::ForwardReference,
                ChainIssueKind::SelfReference,
                ChainIssueKind::ArgumentOutOfBounds,
            ]
        );
        assert!(!validation.is_valid());
    }

    #[test]
    fn test_validate_rejects_consuming_return() {
        let frames = vec![
            Frame {
                op: FrameOp::Return,
                inputs: Vec::new(),
                output: None,
            },
            Frame {
                op: FrameOp::Return,
                inputs: vec![VarRef::Frame(0)],
                output: None,
            },
        ];
        let kinds: Vec<ChainIssueKind> = validate_chain(&frames, 0)
            .issues
            .iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ChainIssueKind::MisplacedReturn, ChainIssueKind::MissingOutput]
        );
        assert!(!validate_chain(&[], 0).is_valid());
    }

    #[test]
    fn test_invalid_param_type_fails() {
        let method = MethodContract::new("bad")
            .param("id", "Vec<")
            .route(HttpVerb::Get, "/widgets");
        let err = method_arguments("IWidgetApi", &method).unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidTypeExpression { .. }));
    }
}
