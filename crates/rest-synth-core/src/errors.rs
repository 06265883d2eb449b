//! Error types for synthesis and invocation.
//!
//! The two classes never mix: a [`SynthesisError`] is a configuration problem
//! found once, when an interface is first synthesized, and it is fatal to
//! that interface. An [`InvocationError`] belongs to a single call of a
//! synthesized method and leaves the synthesized type usable.

use std::fmt;

/// Configuration-time failure for a whole interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// The declared return type is neither absent, unit, nor an async
    /// wrapper around at most one payload type.
    UnsupportedReturnShape {
        interface: String,
        method: String,
        returns: String,
    },

    /// A parameter or return type string could not be parsed.
    InvalidTypeExpression {
        interface: String,
        method: String,
        expression: String,
    },

    /// Two different interfaces derive the same implementation type name.
    DuplicateTypeName {
        type_name: String,
        existing: String,
        requested: String,
    },

    /// The interface declares the same method name more than once.
    DuplicateMethod { interface: String, method: String },

    /// No method carries a route.
    NothingToSynthesize { interface: String },

    /// The assembled frame chain broke producer-before-consumer ordering.
    InvalidChain {
        interface: String,
        method: String,
        issues: Vec<String>,
    },

    /// A different contract was submitted under an identity already cached.
    ConflictingContract {
        interface: String,
        cached_fingerprint: String,
        requested_fingerprint: String,
    },
}

impl SynthesisError {
    pub fn interface(&self) -> &str {
        match self {
            SynthesisError::UnsupportedReturnShape { interface, .. }
            | SynthesisError::InvalidTypeExpression { interface, .. }
            | SynthesisError::DuplicateMethod { interface, .. }
            | SynthesisError::NothingToSynthesize { interface }
            | SynthesisError::InvalidChain { interface, .. }
            | SynthesisError::ConflictingContract { interface, .. } => interface,
            SynthesisError::DuplicateTypeName { requested, .. } => requested,
        }
    }
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::UnsupportedReturnShape {
                interface,
                method,
                returns,
            } => write!(
                f,
                "UNSUPPORTED_RETURN_SHAPE: {}::{} returns `{}`; expected nothing, `()`, or an async wrapper with at most one payload type",
                interface, method, returns
            ),
            SynthesisError::InvalidTypeExpression {
                interface,
                method,
                expression,
            } => write!(
                f,
                "INVALID_TYPE_EXPRESSION: {}::{} declares unparseable type `{}`",
                interface, method, expression
            ),
            SynthesisError::DuplicateTypeName {
                type_name,
                existing,
                requested,
            } => write!(
                f,
                "DUPLICATE_TYPE_NAME: `{}` derives implementation type `{}`, already used by `{}`",
                requested, type_name, existing
            ),
            SynthesisError::DuplicateMethod { interface, method } => write!(
                f,
                "DUPLICATE_METHOD: {} declares method `{}` more than once",
                interface, method
            ),
            SynthesisError::NothingToSynthesize { interface } => write!(
                f,
                "NOTHING_TO_SYNTHESIZE: {} has no method with a route",
                interface
            ),
            SynthesisError::InvalidChain {
                interface,
                method,
                issues,
            } => write!(
                f,
                "INVALID_CHAIN: {}::{}: {}",
                interface,
                method,
                issues.join("; ")
            ),
            SynthesisError::ConflictingContract {
                interface,
                cached_fingerprint,
                requested_fingerprint,
            } => write!(
                f,
                "CONFLICTING_CONTRACT: {} is cached with fingerprint {} but was requested with {}",
                interface,
                short_fingerprint(cached_fingerprint),
                short_fingerprint(requested_fingerprint)
            ),
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Call-time failure of one synthesized method invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The synthesized type has no method with this name.
    UnknownMethod { method: String },

    /// The call supplied the wrong number of arguments.
    ArgumentCount {
        method: String,
        expected: usize,
        got: usize,
    },

    /// The resolver has no transport for the interface.
    MissingTransport { interface: String },

    /// A route placeholder has no parameter of the same name.
    UnmatchedPlaceholder {
        method: String,
        placeholder: String,
        route: String,
    },

    /// The request body could not be serialized.
    Serialization {
        method: String,
        expected_type: String,
        message: String,
    },

    /// The transport failed to produce a response.
    Transport { method: String, message: String },

    /// The server answered with a non-2xx status.
    Status {
        method: String,
        status: u16,
        body: String,
    },

    /// The response body did not decode as the payload type.
    Deserialization {
        method: String,
        expected_type: String,
        message: String,
    },

    /// The transport call exceeded the configured call timeout.
    Timeout { method: String, timeout_ms: u64 },

    /// A frame found the wrong kind of value in one of its input slots.
    FrameInput {
        method: String,
        frame: usize,
        expected: String,
    },
}

impl InvocationError {
    pub fn missing_transport(interface: &str) -> Self {
        InvocationError::MissingTransport {
            interface: interface.to_string(),
        }
    }

    pub fn method(&self) -> &str {
        match self {
            InvocationError::UnknownMethod { method }
            | InvocationError::ArgumentCount { method, .. }
            | InvocationError::UnmatchedPlaceholder { method, .. }
            | InvocationError::Serialization { method, .. }
            | InvocationError::Transport { method, .. }
            | InvocationError::Status { method, .. }
            | InvocationError::Deserialization { method, .. }
            | InvocationError::Timeout { method, .. }
            | InvocationError::FrameInput { method, .. } => method,
            InvocationError::MissingTransport { .. } => "",
        }
    }
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationError::UnknownMethod { method } => {
                write!(f, "UNKNOWN_METHOD: no synthesized method named `{}`", method)
            }
            InvocationError::ArgumentCount {
                method,
                expected,
                got,
            } => write!(
                f,
                "ARGUMENT_COUNT: `{}` takes {} argument(s) but {} were supplied",
                method, expected, got
            ),
            InvocationError::MissingTransport { interface } => write!(
                f,
                "MISSING_TRANSPORT: no transport registered for {}",
                interface
            ),
            InvocationError::UnmatchedPlaceholder {
                method,
                placeholder,
                route,
            } => write!(
                f,
                "UNMATCHED_PLACEHOLDER: `{{{}}}` in route `{}` has no matching parameter on `{}`",
                placeholder, route, method
            ),
            InvocationError::Serialization {
                method,
                expected_type,
                message,
            } => write!(
                f,
                "SERIALIZATION_FAILED: `{}` body cannot be serialized as {}: {}",
                method, expected_type, message
            ),
            InvocationError::Transport { method, message } => {
                write!(f, "TRANSPORT_FAILED: `{}`: {}", method, message)
            }
            InvocationError::Status {
                method,
                status,
                body,
            } => {
                write!(f, "HTTP_STATUS: `{}` returned {}", method, status)?;
                if !body.is_empty() {
                    write!(f, ": {}", truncate(body, 200))?;
                }
                Ok(())
            }
            InvocationError::Deserialization {
                method,
                expected_type,
                message,
            } => write!(
                f,
                "DESERIALIZATION_FAILED: `{}` response cannot be read as {}: {}",
                method, expected_type, message
            ),
            InvocationError::Timeout { method, timeout_ms } => write!(
                f,
                "TIMEOUT: `{}` did not get a response within {}ms",
                method, timeout_ms
            ),
            InvocationError::FrameInput {
                method,
                frame,
                expected,
            } => write!(
                f,
                "FRAME_INPUT: `{}` frame {} expected {} as input",
                method, frame, expected
            ),
        }
    }
}

impl std::error::Error for InvocationError {}

fn short_fingerprint(fingerprint: &str) -> &str {
    &fingerprint[..fingerprint.len().min(12)]
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_codes() {
        let err = SynthesisError::UnsupportedReturnShape {
            interface: "IWidgetApi".to_string(),
            method: "get_widget".to_string(),
            returns: "Widget".to_string(),
        };
        assert!(err.to_string().starts_with("UNSUPPORTED_RETURN_SHAPE"));
        assert_eq!(err.interface(), "IWidgetApi");

        let err = InvocationError::UnmatchedPlaceholder {
            method: "get_widget".to_string(),
            placeholder: "id".to_string(),
            route: "/widgets/{id}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "UNMATCHED_PLACEHOLDER: `{id}` in route `/widgets/{id}` has no matching parameter on `get_widget`"
        );
    }

    #[test]
    fn test_status_body_is_truncated() {
        let err = InvocationError::Status {
            method: "m".to_string(),
            status: 500,
            body: "x".repeat(500),
        };
        let text = err.to_string();
        assert!(text.ends_with("..."));
        assert!(text.len() < 300);
    }
}
