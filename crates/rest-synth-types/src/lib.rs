//! Shared types for the rest-synth workspace.
//!
//! This crate holds the plain-data description of a remote-call client so
//! that the synthesis engine never has to introspect user code:
//!
//! - [`contract`]: [`InterfaceContract`] / [`MethodContract`] and loading from JSON or YAML
//! - [`route`]: [`RouteTemplate`] parsing and the [`HttpVerb`] set
//! - [`type_expr`]: [`TypeExpr`] parsing for parameter and return types
//! - [`env_utils`]: environment variable helpers used by the configuration layer

pub mod contract;
pub mod env_utils;
pub mod route;
pub mod type_expr;

// Re-export commonly used types at crate root
pub use contract::{InterfaceContract, MethodContract, Param, Route, SUPPORTED_CONTRACT_VERSION};
pub use route::{HttpVerb, RoutePiece, RouteTemplate};
pub use type_expr::{parse_type_expr, split_type_params, TypeExpr};
