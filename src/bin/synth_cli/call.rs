//! Call command - invoke a synthesized method over HTTP

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use rest_synth::{CallArgs, ClientConfig, TransportRegistry, UreqTransport};

use super::{load_contract, synthesize};

#[derive(Parser, Debug)]
pub struct CallCmd {
    /// Contract file (.json, .yaml or .yml)
    #[arg(long)]
    pub contract: PathBuf,

    /// Method to invoke
    #[arg(long)]
    pub method: String,

    /// Arguments as a JSON array, in parameter order
    #[arg(long, default_value = "[]")]
    pub args: String,

    /// Base URL for relative routes (default: $REST_SYNTH_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,
}

impl CallCmd {
    pub async fn execute(&self, json_output: bool) -> Result<()> {
        let contract = load_contract(&self.contract)?;
        let synthesized = synthesize(&contract, &self.contract)?;

        let args: Vec<Value> =
            serde_json::from_str(&self.args).context("--args must be a JSON array")?;

        let mut config = ClientConfig::from_env();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }

        debug!(
            base_url = ?config.transport.base_url,
            call_timeout = ?config.call_timeout,
            "calling {}::{}",
            synthesized.interface(),
            self.method
        );
        let transport = UreqTransport::new(config.transport.clone());
        let registry = TransportRegistry::with_fallback(Arc::new(transport));
        let client = synthesized
            .instantiate(Arc::new(registry))
            .with_config(config);

        let result = client
            .invoke(&self.method, CallArgs::from(args))
            .await
            .with_context(|| format!("Call to `{}` failed", self.method))?;

        if json_output {
            let report = json!({
                "interface": synthesized.interface(),
                "method": self.method,
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if !result.is_null() {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Ok(())
    }
}
