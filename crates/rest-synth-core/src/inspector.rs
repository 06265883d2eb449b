//! Route/contract inspection.
//!
//! Decides, for one routed method, which parameter (if any) travels as the
//! request body and which type (if any) is read back from the response.

use rest_synth_types::{parse_type_expr, MethodContract, Route, TypeExpr};

use crate::errors::SynthesisError;

/// Names accepted as the asynchronous return wrapper.
pub const ASYNC_WRAPPERS: &[&str] = &["Future", "Task"];

/// The parameter sent as the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyParam {
    /// Always 0: only the first parameter is eligible.
    pub index: u16,
    pub name: String,
    pub ty: TypeExpr,
}

/// What the inspector learned about one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub request_body: Option<BodyParam>,
    pub response_payload: Option<TypeExpr>,
}

/// Classify a routed method.
pub fn inspect(
    interface: &str,
    method: &MethodContract,
    route: &Route,
) -> Result<Classification, SynthesisError> {
    Ok(Classification {
        request_body: determine_request_body(interface, method, route)?,
        response_payload: determine_response_payload(interface, method)?,
    })
}

/// Unwrap the payload type from the declared return type.
///
/// - absent, `()`, `Future`, `Future<()>` -> no payload
/// - `Future<T>` -> `T`
/// - anything else -> [`SynthesisError::UnsupportedReturnShape`]
pub fn determine_response_payload(
    interface: &str,
    method: &MethodContract,
) -> Result<Option<TypeExpr>, SynthesisError> {
    let Some(raw) = method.returns.as_deref() else {
        return Ok(None);
    };

    let declared = parse_type_expr(raw).ok_or_else(|| SynthesisError::InvalidTypeExpression {
        interface: interface.to_string(),
        method: method.name.clone(),
        expression: raw.to_string(),
    })?;

    if declared.is_unit() {
        return Ok(None);
    }

    if ASYNC_WRAPPERS.contains(&declared.name.as_str()) {
        match declared.args.as_slice() {
            [] => return Ok(None),
            [payload] if payload.is_unit() => return Ok(None),
            [payload] => return Ok(Some(payload.clone())),
            _ => {}
        }
    }

    Err(SynthesisError::UnsupportedReturnShape {
        interface: interface.to_string(),
        method: method.name.clone(),
        returns: raw.trim().to_string(),
    })
}

/// Decide whether the first parameter is the request body.
///
/// Only the first parameter is ever considered. It is a path placeholder
/// (and there is no body) when some route segment is exactly `{name}`.
pub fn determine_request_body(
    interface: &str,
    method: &MethodContract,
    route: &Route,
) -> Result<Option<BodyParam>, SynthesisError> {
    let Some(first) = method.params.first() else {
        return Ok(None);
    };

    if route.template().has_segment_placeholder(&first.name) {
        return Ok(None);
    }

    let ty = parse_type_expr(&first.ty).ok_or_else(|| SynthesisError::InvalidTypeExpression {
        interface: interface.to_string(),
        method: method.name.clone(),
        expression: first.ty.clone(),
    })?;

    Ok(Some(BodyParam {
        index: 0,
        name: first.name.clone(),
        ty,
    }))
}
