//! Offline compiler from a raw block catalogue to a static block registry.
//!
//! Stages run once, in order: [`fetch`] the catalogue, [`normalize`] each
//! record into a `Block`, derive [`naming`] identifiers, build the
//! `Registry` (state expansion and both indices live in
//! `blockgen_registry`), then [`emit`] the artifacts. [`pipeline`] wires
//! them together.

pub mod config;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod naming;
pub mod normalize;
pub mod pipeline;

pub use config::CompilerConfig;
pub use error::CompileError;
pub use pipeline::{Compilation, compile_records, run};
