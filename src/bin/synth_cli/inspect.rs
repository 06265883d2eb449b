//! Inspect command - show frame chains

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use super::output::{format_chain_report, ChainReport};
use super::{load_contract, synthesize};

#[derive(Parser, Debug)]
pub struct InspectCmd {
    /// Contract file (.json, .yaml or .yml)
    #[arg(long)]
    pub contract: PathBuf,
}

impl InspectCmd {
    pub fn execute(&self, json_output: bool, verbose: bool) -> Result<()> {
        let contract = load_contract(&self.contract)?;
        let synthesized = synthesize(&contract, &self.contract)?;
        let report = ChainReport::from_type(&synthesized);

        if json_output {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", format_chain_report(&report, verbose));
        }
        Ok(())
    }
}
