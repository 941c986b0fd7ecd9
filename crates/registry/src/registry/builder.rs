use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::Registry;
use super::expand::{self, StateAssociation};
use crate::block::{Block, BlockId, StateId};
use crate::error::BuildError;

/// Minimum number of bits that can enumerate `state_count` distinct states,
/// i.e. `ceil(log2(state_count))`.
///
/// `None` for zero states: there is nothing to encode and the logarithm is
/// undefined. One state needs zero bits.
pub fn bits_for_states(state_count: usize) -> Option<u32> {
    match state_count {
        0 => None,
        1 => Some(0),
        n => Some(usize::BITS - (n - 1).leading_zeros()),
    }
}

/// Build a registry from a full set of normalized blocks.
///
/// Checks every interval and their disjointness on the bounds alone, then
/// expands them and assembles the ID, name and state indices. Fails on the
/// first inconsistency; no partial registry escapes.
pub fn build(blocks: Vec<Block>) -> Result<Registry, BuildError> {
    for block in &blocks {
        expand::check_range(block)?;
    }
    expand::check_disjoint(&blocks)?;
    let associations = expand::expand_all(&blocks)?;
    assemble(blocks, associations)
}

fn assemble(mut blocks: Vec<Block>, associations: Vec<StateAssociation>) -> Result<Registry, BuildError> {
    // Canonical order, so two builds of one catalogue compare and emit equal.
    blocks.sort_by_key(|b| b.id);

    let mut by_id: HashMap<BlockId, usize> = HashMap::with_capacity(blocks.len());
    let mut by_name: HashMap<String, usize> = HashMap::with_capacity(blocks.len());
    for (idx, block) in blocks.iter().enumerate() {
        match by_id.entry(block.id) {
            Entry::Occupied(prev) => {
                return Err(BuildError::DuplicateKey {
                    id: block.id,
                    first: blocks[*prev.get()].name.clone(),
                    second: block.name.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(idx);
            }
        }
        match by_name.entry(block.name.clone()) {
            Entry::Occupied(prev) => {
                return Err(BuildError::DuplicateName {
                    name: block.name.clone(),
                    first: blocks[*prev.get()].id,
                    second: block.id,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(idx);
            }
        }
    }

    let mut state_index: HashMap<StateId, BlockId> = HashMap::with_capacity(associations.len());
    for StateAssociation { state, block } in associations {
        if let Some(first) = state_index.insert(state, block) {
            return Err(BuildError::Overlap {
                state,
                first,
                second: block,
            });
        }
    }

    let mut by_state: Vec<usize> = (0..blocks.len()).collect();
    by_state.sort_by_key(|&idx| blocks[idx].min_state_id);

    let bits_per_block = bits_for_states(state_index.len()).ok_or(BuildError::EmptyCatalogue)?;

    tracing::debug!(
        "Registry assembled: {} blocks, {} states, {} bits per block",
        blocks.len(),
        state_index.len(),
        bits_per_block,
    );

    Ok(Registry {
        blocks,
        by_id,
        by_name,
        state_index,
        by_state,
        bits_per_block,
    })
}
