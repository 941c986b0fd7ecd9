//! Error taxonomy for one compilation run.
//!
//! Every stage fails fast: the first error aborts the run and nothing is
//! written. Messages name the offending record or field so the catalogue
//! can be fixed at its source.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use blockgen_registry::{BlockId, BuildError};
use thiserror::Error;

/// The catalogue could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetching {location} timed out after {after:?}")]
    Timeout { location: String, after: Duration },
}

/// The catalogue was retrieved but is not a structured record array.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("catalogue is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalogue gzip stream is corrupt: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("catalogue must be a JSON array of block records, found {found}")]
    NotAnArray { found: &'static str },
}

/// Position of a raw record in the catalogue, plus its name when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    pub index: usize,
    pub name: Option<String>,
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "record {} ({:?})", self.index, name),
            None => write!(f, "record {}", self.index),
        }
    }
}

/// A record does not match the expected shape, or names do not map to
/// unique identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{record}: expected an object, found {found}")]
    NotAnObject { record: RecordRef, found: &'static str },

    #[error("{record}: field `{field}` {problem}")]
    Field {
        record: RecordRef,
        field: &'static str,
        problem: String,
    },

    #[error("block {id} ({name:?}) derives {ident:?}, which is not a valid identifier")]
    InvalidIdentifier { id: BlockId, name: String, ident: String },

    #[error("blocks {first} and {second} both derive the identifier {ident}")]
    IdentifierCollision {
        ident: String,
        first: BlockId,
        second: BlockId,
    },
}

/// A command-line flag or environment variable has an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{flag} requires a value")]
    MissingValue { flag: &'static str },

    #[error("{flag} expects {expected}, got {value:?}")]
    InvalidValue {
        flag: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Anything that aborts a compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),

    #[error("registry build failed: {0}")]
    Build(#[from] BuildError),

    #[error("cannot serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
