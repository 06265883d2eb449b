//! Process-wide store of synthesized types.
//!
//! One entry per interface identity. The first request for an identity runs
//! synthesis; concurrent requests for the same identity block on the same
//! cell and receive the same `Arc` (or the same error). Nothing is retried:
//! a failed interface stays failed for the life of the cache.

use parking_lot::{Mutex, RwLock};
use rest_synth_types::InterfaceContract;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

use crate::errors::SynthesisError;
use crate::metrics::CacheMetrics;
use crate::synthesizer::{derive_type_name, SynthesizedType, Synthesizer};

type Outcome = Result<Arc<SynthesizedType>, SynthesisError>;

struct CacheEntry {
    fingerprint: String,
    cell: OnceLock<Outcome>,
}

/// Single-flight cache keyed by interface identity.
#[derive(Default)]
pub struct SynthesisCache {
    synthesizer: Synthesizer,
    entries: RwLock<HashMap<String, Arc<CacheEntry>>>,
    /// implementation type name -> interface identity that claimed it
    type_names: Mutex<HashMap<String, String>>,
    metrics: CacheMetrics,
}

impl SynthesisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_synthesizer(synthesizer: Synthesizer) -> Self {
        Self {
            synthesizer,
            ..Self::default()
        }
    }

    /// Return the synthesized type for `contract`, synthesizing it on first use.
    pub fn get_or_synthesize(&self, contract: &InterfaceContract) -> Outcome {
        let fingerprint = contract.fingerprint();
        let entry = self.entry_for(contract, &fingerprint);

        if entry.fingerprint != fingerprint {
            self.metrics.record_conflict();
            warn!(
                interface = %contract.name,
                "contract changed for an interface that is already cached"
            );
            return Err(SynthesisError::ConflictingContract {
                interface: contract.name.clone(),
                cached_fingerprint: entry.fingerprint.clone(),
                requested_fingerprint: fingerprint,
            });
        }

        let mut ran = false;
        let outcome = entry.cell.get_or_init(|| {
            ran = true;
            self.synthesize_and_register(contract)
        });

        if ran {
            self.metrics.record_miss();
            if outcome.is_err() {
                self.metrics.record_failure();
            }
            debug!(interface = %contract.name, ok = outcome.is_ok(), "synthesis cache miss");
        } else {
            self.metrics.record_hit();
            debug!(interface = %contract.name, "synthesis cache hit");
        }

        outcome.clone()
    }

    /// The cached type for `interface`, if synthesis already succeeded.
    pub fn get(&self, interface: &str) -> Option<Arc<SynthesizedType>> {
        let entries = self.entries.read();
        entries
            .get(interface)
            .and_then(|entry| entry.cell.get())
            .and_then(|outcome| outcome.as_ref().ok())
            .cloned()
    }

    /// Emitted source of a cached type.
    pub fn source_for(&self, interface: &str) -> Option<String> {
        self.get(interface).map(|ty| ty.source().to_string())
    }

    /// Interface identities with an entry (successful or failed), sorted.
    pub fn interfaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn entry_for(&self, contract: &InterfaceContract, fingerprint: &str) -> Arc<CacheEntry> {
        if let Some(entry) = self.entries.read().get(&contract.name) {
            return Arc::clone(entry);
        }
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(contract.name.clone()).or_insert_with(|| {
            Arc::new(CacheEntry {
                fingerprint: fingerprint.to_string(),
                cell: OnceLock::new(),
            })
        }))
    }

    fn synthesize_and_register(&self, contract: &InterfaceContract) -> Outcome {
        let type_name = derive_type_name(&contract.name);
        {
            let type_names = self.type_names.lock();
            if let Some(existing) = type_names.get(&type_name) {
                if existing != &contract.name {
                    return Err(SynthesisError::DuplicateTypeName {
                        type_name,
                        existing: existing.clone(),
                        requested: contract.name.clone(),
                    });
                }
            }
        }

        let synthesized = self.synthesizer.synthesize(contract)?;

        let mut type_names = self.type_names.lock();
        // Another interface may have claimed the name while we synthesized.
        match type_names.get(&type_name) {
            Some(existing) if existing != &contract.name => Err(SynthesisError::DuplicateTypeName {
                type_name,
                existing: existing.clone(),
                requested: contract.name.clone(),
            }),
            _ => {
                type_names.insert(type_name, contract.name.clone());
                Ok(Arc::new(synthesized))
            }
        }
    }
}
