use crate::block::{Block, BlockId, StateId};
use crate::error::BuildError;

/// Upper bound on the total number of states a registry may hold (24-bit
/// palette). Real catalogues are several orders of magnitude below this.
pub const MAX_STATES: u64 = 1 << 24;

/// One entry of the state index: `state` belongs to `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateAssociation {
    pub state: StateId,
    pub block: BlockId,
}

/// Fail if `block`'s interval is inverted.
pub fn check_range(block: &Block) -> Result<(), BuildError> {
    if block.min_state_id > block.max_state_id {
        return Err(BuildError::Range {
            block: block.id,
            name: block.name.clone(),
            min: block.min_state_id,
            max: block.max_state_id,
        });
    }
    Ok(())
}

/// Fail if any two intervals share a state. Works on the interval bounds
/// alone, so wide intervals are rejected without being expanded.
///
/// Assumes every interval already passed [`check_range`].
pub fn check_disjoint(blocks: &[Block]) -> Result<(), BuildError> {
    let mut intervals: Vec<(StateId, StateId, BlockId)> = blocks
        .iter()
        .map(|b| (b.min_state_id, b.max_state_id, b.id))
        .collect();
    intervals.sort_unstable();

    // Interval reaching furthest among those seen so far.
    let mut reach: Option<(StateId, BlockId)> = None;
    for (min, max, id) in intervals {
        if let Some((end, owner)) = reach {
            if min <= end {
                return Err(BuildError::Overlap {
                    state: min,
                    first: owner,
                    second: id,
                });
            }
        }
        if reach.is_none_or(|(end, _)| max > end) {
            reach = Some((max, id));
        }
    }
    Ok(())
}

/// Expand one block's `[min, max]` state interval into one association per
/// state, inclusive on both ends.
pub fn expand(block: &Block) -> Result<Vec<StateAssociation>, BuildError> {
    check_range(block)?;
    let (min, max) = (block.min_state_id, block.max_state_id);

    // Most blocks have a single state.
    if min == max {
        return Ok(vec![StateAssociation { state: min, block: block.id }]);
    }

    Ok((min.0..=max.0)
        .map(|s| StateAssociation { state: StateId(s), block: block.id })
        .collect())
}

/// Expand every block. The first inverted interval aborts the whole
/// expansion; nothing is returned for the blocks that were fine.
///
/// Catalogues covering more than [`MAX_STATES`] states are refused before
/// anything is allocated.
pub fn expand_all(blocks: &[Block]) -> Result<Vec<StateAssociation>, BuildError> {
    for block in blocks {
        check_range(block)?;
    }
    let total: u64 = blocks.iter().map(Block::state_count).sum();
    if total > MAX_STATES {
        return Err(BuildError::TooManyStates {
            count: total,
            limit: MAX_STATES,
        });
    }

    let mut out = Vec::with_capacity(total as usize);
    for block in blocks {
        out.extend(expand(block)?);
    }
    Ok(out)
}
