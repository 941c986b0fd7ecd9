pub mod builder;
pub mod expand;

use std::collections::HashMap;

use crate::block::{Block, BlockId, StateId};
use crate::error::BuildError;

/// The compiled block registry. Immutable once built.
///
/// Owns every `Block` in one array sorted by ID. The ID, name and state
/// indices point into that array (or at block IDs), so no block data is
/// duplicated. Being read-only, it can be shared across threads behind a
/// plain `&Registry` or `Arc<Registry>` without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    blocks: Vec<Block>,
    by_id: HashMap<BlockId, usize>,
    by_name: HashMap<String, usize>,
    state_index: HashMap<StateId, BlockId>,
    /// Indices into `blocks`, ordered by first state.
    by_state: Vec<usize>,
    bits_per_block: u32,
}

impl Registry {
    /// See [`builder::build`].
    pub fn build(blocks: Vec<Block>) -> Result<Self, BuildError> {
        builder::build(blocks)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.by_id.get(&id).map(|&idx| &self.blocks[idx])
    }

    /// Look up a block by its canonical name (`"oak_log"`).
    pub fn by_name(&self, name: &str) -> Option<&Block> {
        self.by_name.get(name).map(|&idx| &self.blocks[idx])
    }

    /// The block owning `state`, or `None` if no interval contains it.
    pub fn block_id_for_state(&self, state: StateId) -> Option<BlockId> {
        self.state_index.get(&state).copied()
    }

    pub fn block_for_state(&self, state: StateId) -> Option<&Block> {
        self.block_id_for_state(state).and_then(|id| self.get(id))
    }

    /// Bits needed per entry in a global-palette encoding of any state.
    pub fn bits_per_block(&self) -> u32 {
        self.bits_per_block
    }

    /// Number of block types.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of distinct state IDs across all blocks.
    pub fn state_count(&self) -> usize {
        self.state_index.len()
    }

    /// All blocks in ascending ID order.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Every `(state, block)` pair of the state index, ascending by state.
    pub fn states(&self) -> impl Iterator<Item = (StateId, BlockId)> + '_ {
        self.by_state.iter().flat_map(move |&idx| {
            let block = &self.blocks[idx];
            block.states().map(move |s| (StateId(s), block.id))
        })
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
