//! Fetch -> normalize -> build -> emit, strictly in sequence.

use std::path::PathBuf;
use std::time::Instant;

use blockgen_registry::{BlockId, Registry};
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::{emit, fetch, naming, normalize};

/// The output of one successful compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub registry: Registry,
    /// Generated constant name -> block, in catalogue order.
    pub identifiers: IndexMap<String, BlockId>,
}

/// Compile already-fetched raw records.
pub fn compile_records(records: &[Value]) -> Result<Compilation, CompileError> {
    let blocks = normalize::normalize_all(records)?;
    tracing::info!("Normalized {} block records", blocks.len());

    let identifiers = naming::assign_identifiers(&blocks)?;
    let registry = Registry::build(blocks)?;
    tracing::info!(
        "Registry built: {} blocks, {} states, {} bits per block",
        registry.len(),
        registry.state_count(),
        registry.bits_per_block(),
    );

    Ok(Compilation { registry, identifiers })
}

/// Run a full compilation as configured. Returns the written paths.
///
/// Any failure aborts before the output directory is touched, except for
/// I/O errors during the final write itself.
pub async fn run(config: &CompilerConfig) -> Result<Vec<PathBuf>, CompileError> {
    let start = Instant::now();
    let source = config.source.to_string();

    tracing::info!("Fetching block catalogue from {} (timeout {:?})", source, config.timeout);
    let records = fetch::fetch(&config.source, config.timeout).await?;
    tracing::info!("Fetched {} raw records", records.len());

    let compilation = compile_records(&records)?;
    let written = emit::write_outputs(&compilation, &config.out_dir, &source, config.emit_rust)?;

    tracing::info!("Compilation finished in {:.2?}", start.elapsed());
    Ok(written)
}
