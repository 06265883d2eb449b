//! Emit command - print the synthesized source for a contract

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use super::{load_contract, synthesize};

#[derive(Parser, Debug)]
pub struct EmitCmd {
    /// Contract file (.json, .yaml or .yml)
    #[arg(long)]
    pub contract: PathBuf,

    /// Write the source to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Serialize)]
struct EmitJson<'a> {
    interface: &'a str,
    type_name: &'a str,
    fingerprint: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

impl EmitCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let contract = load_contract(&self.contract)?;
        let synthesized = synthesize(&contract, &self.contract)?;

        if let Some(out) = &self.out {
            std::fs::write(out, synthesized.source())
                .with_context(|| format!("Failed to write {}", out.display()))?;
        }

        if json_output {
            let report = EmitJson {
                interface: synthesized.interface(),
                type_name: synthesized.type_name(),
                fingerprint: synthesized.fingerprint(),
                out: self.out.as_ref().map(|p| p.display().to_string()),
                source: self.out.is_none().then(|| synthesized.source()),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if let Some(out) = &self.out {
            println!(
                "Wrote {} ({}) to {}",
                synthesized.type_name(),
                synthesized.interface(),
                out.display()
            );
        } else {
            print!("{}", synthesized.source());
        }
        Ok(())
    }
}
