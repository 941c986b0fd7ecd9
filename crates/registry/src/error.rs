//! Errors raised while building or loading a registry.

use thiserror::Error;

use crate::block::{BlockId, StateId};

/// A catalogue inconsistency found while assembling the registry.
///
/// Any of these aborts the build: a registry is either complete or absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A block's state interval is inverted.
    #[error("block {block} ({name}) has an invalid state range: min {min} > max {max}")]
    Range {
        block: BlockId,
        name: String,
        min: StateId,
        max: StateId,
    },

    /// Two records share one block ID.
    #[error("duplicate block id {id}: {first:?} and {second:?}")]
    DuplicateKey {
        id: BlockId,
        first: String,
        second: String,
    },

    /// Two records share one canonical name.
    #[error("duplicate block name {name:?}: ids {first} and {second}")]
    DuplicateName {
        name: String,
        first: BlockId,
        second: BlockId,
    },

    /// Two blocks' state intervals overlap, so `state` would be ambiguous.
    #[error("state {state} is claimed by both block {first} and block {second}")]
    Overlap {
        state: StateId,
        first: BlockId,
        second: BlockId,
    },

    /// More states than a palette index is allowed to address.
    #[error("catalogue covers {count} states, more than the limit of {limit}")]
    TooManyStates { count: u64, limit: u64 },

    /// No states at all: the palette width is undefined.
    #[error("catalogue contains no block states")]
    EmptyCatalogue,
}

/// Errors reading a previously emitted registry artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported artifact format version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("artifact blocks do not form a valid registry: {0}")]
    Build(#[from] BuildError),

    /// The stored index or bit width disagrees with what the stored blocks produce.
    #[error("artifact is inconsistent: {0}")]
    Inconsistent(String),
}
