//! Program-level identifiers derived from block names.
//!
//! Each block is exposed in the generated Rust module as a constant named
//! after its canonical name in SCREAMING_SNAKE_CASE (`oak_log` -> `OAK_LOG`).

use blockgen_registry::{Block, BlockId};
use heck::ToShoutySnakeCase;
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::SchemaError;

/// Identifiers the emitter defines itself.
pub const RESERVED: &[&str] = &["BITS_PER_BLOCK"];

pub fn derive_identifier(name: &str) -> String {
    name.to_shouty_snake_case()
}

/// ASCII letters, digits and `_`, not starting with a digit, not `_` alone.
pub fn is_valid_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && ident != "_"
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Derive an identifier for every block, in catalogue order.
///
/// Fails if a name folds to something that is not an identifier, or if two
/// names fold to the same one (`oakLog` and `oak_log`).
pub fn assign_identifiers(blocks: &[Block]) -> Result<IndexMap<String, BlockId>, SchemaError> {
    let mut idents: IndexMap<String, BlockId> = IndexMap::with_capacity(blocks.len());
    for block in blocks {
        let ident = derive_identifier(&block.name);
        if !is_valid_identifier(&ident) || RESERVED.contains(&ident.as_str()) {
            return Err(SchemaError::InvalidIdentifier {
                id: block.id,
                name: block.name.clone(),
                ident,
            });
        }
        match idents.entry(ident) {
            Entry::Occupied(prev) => {
                return Err(SchemaError::IdentifierCollision {
                    ident: prev.key().clone(),
                    first: *prev.get(),
                    second: block.id,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(block.id);
            }
        }
    }
    Ok(idents)
}
