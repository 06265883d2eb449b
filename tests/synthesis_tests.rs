//! Synthesis behaviour: classification, chain shapes, emitted source.

mod common;

use common::*;
use rest_synth::engine::{FrameOp, VarRef};
use rest_synth::types::TypeExpr;
use rest_synth::{FrameKind, HttpVerb, InterfaceContract, MethodContract, SynthesisError, Synthesizer};

fn synthesize(contract: &InterfaceContract) -> rest_synth::SynthesizedType {
    assert_ok(Synthesizer::new().synthesize(contract), "synthesize")
}

#[test]
fn test_scenario_a_get_by_id() {
    let ty = synthesize(&widget_contract());
    let method = ty.method("get_widget").unwrap();

    assert!(method.classification.request_body.is_none());
    assert_eq!(
        method.classification.response_payload,
        Some(TypeExpr::named("Widget"))
    );
    assert_eq!(
        method.chain.kinds(),
        vec![
            FrameKind::AcquireTransport,
            FrameKind::BuildUrl,
            FrameKind::BuildRequest,
            FrameKind::InvokeTransport,
            FrameKind::DeserializeResponse,
            FrameKind::Return,
        ]
    );
}

#[test]
fn test_scenario_b_post_with_body() {
    let ty = synthesize(&widget_contract());
    let method = ty.method("create_widget").unwrap();

    let body = method.classification.request_body.as_ref().unwrap();
    assert_eq!(body.name, "new_widget");
    assert_eq!(body.ty, TypeExpr::named("NewWidget"));

    let frames = method.chain.frames();
    assert_eq!(frames[2].kind(), FrameKind::SerializeBody);
    assert_eq!(frames[2].inputs, vec![VarRef::Argument(0)]);
    // build-request consumes url then body
    assert_eq!(frames[3].inputs, vec![VarRef::Frame(1), VarRef::Frame(2)]);
    assert!(matches!(
        frames[3].op,
        FrameOp::BuildRequest {
            verb: HttpVerb::Post,
            has_body: true
        }
    ));
}

#[test]
fn test_scenario_c_delete_returns_nothing() {
    let ty = synthesize(&widget_contract());
    let method = ty.method("delete_widget").unwrap();

    assert!(!method.has_body());
    assert!(!method.returns_value());
    assert!(!method.chain.contains(FrameKind::SerializeBody));
    assert!(!method.chain.contains(FrameKind::DeserializeResponse));
    assert!(method.chain.frames().last().unwrap().inputs.is_empty());
}

#[test]
fn test_scenario_d_unbound_placeholder_still_synthesizes() {
    // Fails at call time, not synthesis time.
    let ty = synthesize(&placeholder_without_param_contract());
    let method = ty.method("list").unwrap();
    assert!(method.chain.contains(FrameKind::BuildUrl));
    assert!(method.chain.frames()[1].inputs.is_empty());
}

#[test]
fn test_parameterless_methods_never_serialize() {
    let contract = InterfaceContract::new("IStatus")
        .with_method(
            MethodContract::new("health")
                .returns("Future<String>")
                .route(HttpVerb::Post, "/health"),
        )
        .with_method(
            MethodContract::new("reset")
                .returns("Task")
                .route(HttpVerb::Put, "/reset"),
        );
    let ty = synthesize(&contract);
    for method in ty.methods() {
        assert!(
            !method.chain.contains(FrameKind::SerializeBody),
            "{} should send no body",
            method.name()
        );
    }
}

#[test]
fn test_placeholder_first_param_means_no_body_regardless_of_rest() {
    let ty = synthesize(&widget_contract());
    let rename = ty.method("rename_widget").unwrap();
    assert!(!rename.has_body());
    assert_eq!(
        rename.chain.frames()[1].inputs,
        vec![VarRef::Argument(0), VarRef::Argument(1)]
    );
}

#[test]
fn test_async_unit_return_has_no_deserialize() {
    for returns in ["Future", "Future<()>", "Task", "Task<()>", "()"] {
        let contract = InterfaceContract::new("IFire").with_method(
            MethodContract::new("fire")
                .param("id", "u32")
                .returns(returns)
                .route(HttpVerb::Post, "/fire/{id}"),
        );
        let ty = synthesize(&contract);
        let chain = &ty.method("fire").unwrap().chain;
        assert!(!chain.contains(FrameKind::DeserializeResponse), "{}", returns);
        assert!(chain.return_type().is_none(), "{}", returns);
    }
}

#[test]
fn test_emitted_source_is_deterministic() {
    let first = synthesize(&widget_contract());
    let second = synthesize(&widget_contract());
    assert_eq!(first.source(), second.source());
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn test_emitted_source_shape() {
    let ty = synthesize(&widget_contract());
    let source = ty.source();

    assert!(source.starts_with("// Generated by rest-synth. Do not edit.\n"));
    assert!(source.contains(&format!("// fingerprint: {}", ty.fingerprint())));
    assert!(source.contains("/// Widget catalogue service\npub struct WidgetApi {"));
    assert!(source.contains("impl IWidgetApi for WidgetApi {"));
    assert!(source.contains(
        "    async fn get_widget(&self, id: i64) -> Result<Widget, InvocationError> {"
    ));
    assert!(source.contains(
        "        let body = self.codec.serialize::<NewWidget>(&new_widget)?;"
    ));
    assert!(source.contains(
        "        let request = HttpRequest::new(HttpVerb::Post, url).with_json_body(body);"
    ));
    assert!(source.contains(
        "    async fn delete_widget(&self, id: i64) -> Result<(), InvocationError> {"
    ));
    assert!(source.contains("    // not routed: async fn ping(&self) -> Result<(), InvocationError>"));

    // methods appear in contract order
    let get = source.find("fn get_widget").unwrap();
    let create = source.find("fn create_widget").unwrap();
    let list = source.find("fn list_widgets").unwrap();
    assert!(get < create && create < list);
}

#[test]
fn test_all_or_nothing() {
    let contract = assert_ok(
        InterfaceContract::load_from_path(&fixture_path("broken_returns.json")),
        "load broken_returns.json",
    );
    let err = assert_err(Synthesizer::new().synthesize(&contract), "synthesize");
    match err {
        SynthesisError::UnsupportedReturnShape {
            interface,
            method,
            returns,
        } => {
            assert_eq!(interface, "IBrokenApi");
            assert_eq!(method, "blocking");
            assert_eq!(returns, "Widget");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_invalid_parameter_type_fails_interface() {
    let contract = InterfaceContract::new("IBad").with_method(
        MethodContract::new("get")
            .param("id", "HashMap<String")
            .route(HttpVerb::Get, "/things/{id}"),
    );
    let err = assert_err(Synthesizer::new().synthesize(&contract), "synthesize");
    assert!(matches!(err, SynthesisError::InvalidTypeExpression { .. }));
    assert_error_contains(&err, "INVALID_TYPE_EXPRESSION", "display");
}

#[test]
fn test_json_and_yaml_fixtures_agree() {
    let json = assert_ok(
        InterfaceContract::load_from_path(&fixture_path("widgets.json")),
        "load widgets.json",
    );
    let yaml = assert_ok(
        InterfaceContract::load_from_path(&fixture_path("widgets.yaml")),
        "load widgets.yaml",
    );
    assert_eq!(json, yaml);
    assert_eq!(json, widget_contract());
    assert_eq!(synthesize(&json).source(), synthesize(&yaml).source());
}

#[test]
fn test_invalid_contract_reports_every_issue() {
    let err = assert_err(
        InterfaceContract::load_from_path(&fixture_path("invalid.yaml")),
        "load invalid.yaml",
    );
    let text = format!("{:#}", err);
    assert!(text.contains("version 2 is not supported"), "{}", text);
    assert!(text.contains("name cannot be empty"), "{}", text);
    assert!(text.contains("has an empty type"), "{}", text);
}
