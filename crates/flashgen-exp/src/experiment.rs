use flashgen_core::ConfigTree;
use serde::{Deserialize, Serialize};

/// A named configuration variant flowing through the expansion pipeline.
///
/// `name` accumulates one human-readable token per applied mutation, in
/// application order; the final name doubles as the config file stem.
/// Every experiment owns its tree outright — sweeps clone before
/// editing, so branches never share mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Accumulated mutation tokens, seed name first.
    pub name: String,
    /// The configuration tree this experiment will serialize.
    pub cfg: ConfigTree,
}

impl Experiment {
    /// Wraps a parsed template as the pipeline seed.
    pub fn new(name: impl Into<String>, cfg: ConfigTree) -> Self {
        Self {
            name: name.into(),
            cfg,
        }
    }

    /// Fresh derivative carrying an extra name token.
    pub(crate) fn derive(&self, token: &str) -> Self {
        let mut next = self.clone();
        next.name.push_str(token);
        next
    }
}
