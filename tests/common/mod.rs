#![allow(unused_imports)]
#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: fixture contracts, on disk and built in code
//! - `mocks`: canned transports and registries
//! - `assertions`: assertion helpers with descriptive failure messages

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use assertions::{assert_err, assert_error_contains, assert_ok};
pub use fixtures::{
    fixture_path, placeholder_without_param_contract, widget_contract, Widget, WIDGETS_INTERFACE,
};
pub use mocks::{registry_for, widget_transport};
