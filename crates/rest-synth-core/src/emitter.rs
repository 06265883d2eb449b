//! Rust source rendering for synthesized types.
//!
//! The text is what a hand-written client for the interface would look like.
//! It is not compiled; [`GeneratedClient`](crate::GeneratedClient) executes
//! the frame chains directly. Output depends only on the contract, so the
//! same contract always renders byte-identical source.

use rest_synth_types::{parse_type_expr, InterfaceContract, MethodContract};
use std::fmt::{self, Write};

use crate::synthesizer::SynthesizedMethod;

const INDENT: &str = "    ";

/// Render the implementation type for `contract`.
pub fn emit_source(
    contract: &InterfaceContract,
    type_name: &str,
    fingerprint: &str,
    methods: &[SynthesizedMethod],
) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails.
    let _ = write_source(&mut out, contract, type_name, fingerprint, methods);
    out
}

fn write_source(
    out: &mut String,
    contract: &InterfaceContract,
    type_name: &str,
    fingerprint: &str,
    methods: &[SynthesizedMethod],
) -> fmt::Result {
    writeln!(out, "// Generated by rest-synth. Do not edit.")?;
    writeln!(out, "// interface: {}", contract.name)?;
    writeln!(out, "// fingerprint: {}", fingerprint)?;
    writeln!(out)?;

    if let Some(description) = &contract.description {
        for line in description.lines() {
            writeln!(out, "/// {}", line)?;
        }
    }
    writeln!(out, "pub struct {} {{", type_name)?;
    writeln!(out, "{}transports: Arc<dyn TransportResolver>,", INDENT)?;
    writeln!(out, "{}codec: Arc<dyn Codec>,", INDENT)?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "#[async_trait]")?;
    writeln!(out, "impl {} for {} {{", contract.short_name(), type_name)?;

    for (idx, method) in contract.methods.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        match methods.iter().find(|m| m.name() == method.name) {
            Some(synthesized) => write_method(out, synthesized)?,
            None => writeln!(out, "{}// not routed: {}", INDENT, signature(method))?,
        }
    }

    writeln!(out, "}}")
}

fn write_method(out: &mut String, method: &SynthesizedMethod) -> fmt::Result {
    let route = &method.route;
    writeln!(out, "{}// {} {}", INDENT, route.method.as_str(), route.path)?;
    writeln!(out, "{}{} {{", INDENT, signature(&method.contract))?;
    for line in method.chain.render_body() {
        writeln!(out, "{}{}{}", INDENT, INDENT, line)?;
    }
    writeln!(out, "{}}}", INDENT)
}

/// `async fn name(&self, a: A, ...) -> Result<T, InvocationError>`
fn signature(method: &MethodContract) -> String {
    let mut params = vec!["&self".to_string()];
    params.extend(method.params.iter().map(|p| {
        let ty = parse_type_expr(&p.ty)
            .map(|ty| ty.to_string())
            .unwrap_or_else(|| p.ty.clone());
        format!("{}: {}", p.name, ty)
    }));

    let payload = method
        .returns
        .as_deref()
        .and_then(parse_type_expr)
        .and_then(|ty| match ty.single_arg() {
            Some(inner) if !inner.is_unit() => Some(inner.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "()".to_string());

    format!(
        "async fn {}({}) -> Result<{}, InvocationError>",
        method.name,
        params.join(", "),
        payload
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_synth_types::HttpVerb;

    #[test]
    fn test_signature_shapes() {
        let get = MethodContract::new("get_widget")
            .param("id", "i64")
            .returns("Future<Widget>");
        assert_eq!(
            signature(&get),
            "async fn get_widget(&self, id: i64) -> Result<Widget, InvocationError>"
        );

        let delete = MethodContract::new("delete_widget")
            .param("id", "i64")
            .returns("Future")
            .route(HttpVerb::Delete, "/widgets/{id}");
        assert_eq!(
            signature(&delete),
            "async fn delete_widget(&self, id: i64) -> Result<(), InvocationError>"
        );

        let spaced = MethodContract::new("list").returns("Future< Vec< Widget > >");
        assert_eq!(
            signature(&spaced),
            "async fn list(&self) -> Result<Vec<Widget>, InvocationError>"
        );
    }
}
