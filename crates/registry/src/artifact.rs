//! The emitted registry artifact (`registry.json`).
//!
//! The artifact stores the blocks together with the precomputed state index
//! and palette width. Loading rebuilds the registry from the blocks and
//! refuses the file if the stored index or width disagree with the rebuild,
//! so a truncated or hand-edited artifact never becomes a live registry.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockId, StateId};
use crate::error::ArtifactError;
use crate::registry::Registry;

/// Bumped whenever the on-disk layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// Serialized form of a [`Registry`].
///
/// Blocks are sorted by ID and states by state ID, so one catalogue always
/// serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub format_version: u32,
    pub bits_per_block: u32,
    pub blocks: Vec<Block>,
    pub states: BTreeMap<StateId, BlockId>,
}

impl Registry {
    pub fn to_artifact(&self) -> Artifact {
        Artifact {
            format_version: FORMAT_VERSION,
            bits_per_block: self.bits_per_block(),
            blocks: self.iter().cloned().collect(),
            states: self.states().collect(),
        }
    }

    pub fn from_artifact(artifact: Artifact) -> Result<Self, ArtifactError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ArtifactError::Version {
                found: artifact.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let registry = Registry::build(artifact.blocks)?;

        if registry.bits_per_block() != artifact.bits_per_block {
            return Err(ArtifactError::Inconsistent(format!(
                "stored bits_per_block {} but blocks require {}",
                artifact.bits_per_block,
                registry.bits_per_block(),
            )));
        }
        if registry.state_count() != artifact.states.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "stored state index has {} entries but blocks cover {}",
                artifact.states.len(),
                registry.state_count(),
            )));
        }
        for (&state, &stored) in &artifact.states {
            let rebuilt = registry.block_id_for_state(state);
            if rebuilt != Some(stored) {
                return Err(ArtifactError::Inconsistent(format!(
                    "state {} stored as block {} but blocks resolve it to {:?}",
                    state, stored, rebuilt,
                )));
            }
        }

        Ok(registry)
    }

    /// Parse a registry from the text of a `registry.json` artifact.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: Artifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }
}

/// Serialize a registry as pretty-printed artifact JSON, newline-terminated.
pub fn to_json(registry: &Registry) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(&registry.to_artifact())?;
    json.push('\n');
    Ok(json)
}

/// Read and validate an artifact from disk.
pub fn load(path: &Path) -> Result<Registry, ArtifactError> {
    let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = Registry::from_json(&json)?;
    tracing::debug!(
        "Loaded registry from {}: {} blocks, {} states",
        path.display(),
        registry.len(),
        registry.state_count(),
    );
    Ok(registry)
}
