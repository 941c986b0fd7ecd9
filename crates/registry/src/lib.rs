//! Read-only block registry compiled from a block catalogue.
//!
//! A [`Registry`] answers three questions: which block has a given ID, which
//! block owns a given state ID, and how many bits a global palette needs.
//! It is built once (by the `blockgen` compiler, or by loading its
//! `registry.json` artifact) and never mutated afterwards.

pub mod artifact;
pub mod block;
pub mod error;
pub mod registry;

pub use block::{Block, BlockId, StateId};
pub use error::{ArtifactError, BuildError};
pub use registry::Registry;
