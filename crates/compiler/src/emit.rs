//! Writes the compiled registry to disk.
//!
//! Two fixed emitters: the `registry.json` artifact loaded at runtime, and a
//! Rust module of named block ID constants for code that refers to specific
//! blocks. Both outputs are fully rendered in memory before anything is
//! written. All files are then staged as temporary siblings and only renamed
//! into place once every one of them was written, so a failed run never
//! leaves a truncated artifact or a new artifact beside stale constants.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use blockgen_registry::artifact;

use crate::error::CompileError;
use crate::pipeline::Compilation;

pub const ARTIFACT_FILE: &str = "registry.json";
pub const CONSTANTS_FILE: &str = "block_ids.rs";

/// Render the Rust constants module.
///
/// Constants appear in catalogue order, each annotated with its display name
/// and the states it owns.
pub fn render_constants(compilation: &Compilation, source: &str) -> String {
    let registry = &compilation.registry;
    let mut out = String::new();

    let _ = writeln!(out, "//! Block IDs generated by blockgen from {}.", sanitize(source));
    let _ = writeln!(out, "//! Do not edit; regenerate instead.");
    let _ = writeln!(out);
    let _ = writeln!(out, "use blockgen_registry::BlockId;");
    let _ = writeln!(out);
    let _ = writeln!(out, "/// Bits needed to index every block state in the global palette.");
    let _ = writeln!(out, "pub const BITS_PER_BLOCK: u32 = {};", registry.bits_per_block());
    let _ = writeln!(out);

    for (ident, &id) in &compilation.identifiers {
        let Some(block) = registry.get(id) else {
            continue;
        };
        let states = if block.min_state_id == block.max_state_id {
            format!("state {}", block.min_state_id)
        } else {
            format!("states {}..={}", block.min_state_id, block.max_state_id)
        };
        let _ = writeln!(
            out,
            "pub const {}: BlockId = BlockId({}); // {}, {}",
            ident,
            id,
            sanitize(&block.display_name),
            states,
        );
    }

    out
}

/// Render and write all outputs into `out_dir`. Returns the written paths.
pub fn write_outputs(
    compilation: &Compilation,
    out_dir: &Path,
    source: &str,
    emit_rust: bool,
) -> Result<Vec<PathBuf>, CompileError> {
    let mut files = vec![(ARTIFACT_FILE, artifact::to_json(&compilation.registry)?)];
    if emit_rust {
        files.push((CONSTANTS_FILE, render_constants(compilation, source)));
    }

    fs::create_dir_all(out_dir).map_err(|source| CompileError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    // Stage every file before touching any final path, so a failure
    // leaves the previous outputs as a matched set.
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for (name, contents) in &files {
        let path = out_dir.join(name);
        let tmp = path.with_extension("tmp");
        if let Err(source) = fs::write(&tmp, contents.as_bytes()) {
            discard(&staged);
            return Err(CompileError::Io { path: tmp, source });
        }
        staged.push((tmp, path));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, path) {
            discard(&staged[i..]);
            return Err(CompileError::Io {
                path: path.clone(),
                source,
            });
        }
        written.push(path.clone());
    }

    for ((_, contents), path) in files.iter().zip(&written) {
        tracing::info!("Wrote {} ({} bytes)", path.display(), contents.len());
    }
    Ok(written)
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

/// Strip control characters so text stays inside a `//` comment.
fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}
