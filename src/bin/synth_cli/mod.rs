//! rest-synth CLI modules

pub mod call;
pub mod emit;
pub mod inspect;
pub mod output;

use anyhow::{Context, Result};
use rest_synth::{InterfaceContract, SynthesizedType, Synthesizer};
use std::path::Path;
use std::sync::Arc;

/// Load and validate a JSON or YAML contract.
pub fn load_contract(path: &Path) -> Result<InterfaceContract> {
    InterfaceContract::load_from_path(path)
}

/// Synthesize `contract`, attributing failures to the file it came from.
pub fn synthesize(contract: &InterfaceContract, path: &Path) -> Result<Arc<SynthesizedType>> {
    let synthesized = Synthesizer::new()
        .synthesize(contract)
        .with_context(|| format!("Failed to synthesize {}", path.display()))?;
    Ok(Arc::new(synthesized))
}
