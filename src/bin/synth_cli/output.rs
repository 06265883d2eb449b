//! Output formatting for the rest-synth CLI
//!
//! Human-readable and JSON renderings of synthesized types and errors.

use serde::Serialize;

use rest_synth::SynthesizedType;

/// Serializable view of a synthesized type's chains.
#[derive(Debug, Serialize)]
pub struct ChainReport {
    pub interface: String,
    pub type_name: String,
    pub fingerprint: String,
    pub methods: Vec<MethodReport>,
    pub unrouted: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MethodReport {
    pub name: String,
    pub verb: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub frames: Vec<String>,
    pub source: Vec<String>,
}

impl ChainReport {
    pub fn from_type(synthesized: &SynthesizedType) -> Self {
        let methods = synthesized
            .methods()
            .iter()
            .map(|method| MethodReport {
                name: method.name().to_string(),
                verb: method.route.method.as_str().to_string(),
                path: method.route.path.clone(),
                body: method
                    .classification
                    .request_body
                    .as_ref()
                    .map(|body| format!("{}: {}", body.name, body.ty)),
                payload: method
                    .classification
                    .response_payload
                    .as_ref()
                    .map(|ty| ty.to_string()),
                frames: method
                    .chain
                    .kinds()
                    .iter()
                    .map(|kind| kind.as_str().to_string())
                    .collect(),
                source: method.chain.render_body(),
            })
            .collect();

        Self {
            interface: synthesized.interface().to_string(),
            type_name: synthesized.type_name().to_string(),
            fingerprint: synthesized.fingerprint().to_string(),
            methods,
            unrouted: synthesized.unrouted().to_vec(),
        }
    }
}

/// Format a chain report for the terminal.
pub fn format_chain_report(report: &ChainReport, verbose: bool) -> String {
    let mut out = format!(
        "\x1b[1m{}\x1b[0m -> {} ({})\n\n",
        report.interface,
        report.type_name,
        &report.fingerprint[..report.fingerprint.len().min(12)]
    );

    for method in &report.methods {
        out.push_str(&format!(
            "  \x1b[36m{}\x1b[0m  {} {}\n",
            method.name, method.verb, method.path
        ));
        out.push_str(&format!(
            "    body:    {}\n",
            method.body.as_deref().unwrap_or("-")
        ));
        out.push_str(&format!(
            "    payload: {}\n",
            method.payload.as_deref().unwrap_or("-")
        ));
        out.push_str(&format!("    frames:  {}\n", method.frames.join(" -> ")));
        if verbose {
            for line in &method.source {
                out.push_str(&format!("      {}\n", line));
            }
        }
        out.push('\n');
    }

    if !report.unrouted.is_empty() {
        out.push_str(&format!("  not routed: {}\n", report.unrouted.join(", ")));
    }
    out
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error, json_output: bool) -> String {
    if json_output {
        #[derive(Serialize)]
        struct ErrorJson {
            error: String,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            causes: Vec<String>,
        }

        let err = ErrorJson {
            error: error.to_string(),
            causes: error.chain().skip(1).map(|e| e.to_string()).collect(),
        };
        let mut text = serde_json::to_string_pretty(&err).unwrap_or_else(|_| "{}".to_string());
        text.push('\n');
        text
    } else {
        let mut out = format!("\x1b[31mError:\x1b[0m {}\n", error);
        let mut causes = error.chain().skip(1).peekable();
        if causes.peek().is_some() {
            out.push_str("Caused by:\n");
            for (idx, cause) in causes.enumerate() {
                out.push_str(&format!("  {}: {}\n", idx + 1, cause));
            }
        }
        out
    }
}
