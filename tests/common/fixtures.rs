//! Fixture contracts.

use rest_synth::{HttpVerb, InterfaceContract, MethodContract};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const WIDGETS_INTERFACE: &str = "widgets::IWidgetApi";

/// Payload type used by the widget fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: i64,
    pub name: String,
}

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// The widget contract, built in code. Matches `tests/fixtures/widgets.json`.
pub fn widget_contract() -> InterfaceContract {
    InterfaceContract::new(WIDGETS_INTERFACE)
        .with_description("Widget catalogue service")
        .with_method(
            MethodContract::new("get_widget")
                .param("id", "i64")
                .returns("Future<Widget>")
                .route(HttpVerb::Get, "/widgets/{id}"),
        )
        .with_method(
            MethodContract::new("create_widget")
                .param("new_widget", "NewWidget")
                .returns("Future<Widget>")
                .route(HttpVerb::Post, "/widgets"),
        )
        .with_method(
            MethodContract::new("delete_widget")
                .param("id", "i64")
                .returns("Future")
                .route(HttpVerb::Delete, "/widgets/{id}"),
        )
        .with_method(
            MethodContract::new("list_widgets")
                .returns("Future<Vec<Widget>>")
                .route(HttpVerb::Get, "/widgets"),
        )
        .with_method(
            MethodContract::new("rename_widget")
                .param("id", "i64")
                .param("name", "String")
                .returns("Future<Widget>")
                .route(HttpVerb::Put, "/widgets/{id}/name/{name}"),
        )
        .with_method(MethodContract::new("ping").returns("Future"))
}

/// A route placeholder with no parameter to fill it.
pub fn placeholder_without_param_contract() -> InterfaceContract {
    InterfaceContract::new("IOrphanApi").with_method(
        MethodContract::new("list")
            .returns("Future<Vec<Widget>>")
            .route(HttpVerb::Get, "/widgets/{id}"),
    )
}
