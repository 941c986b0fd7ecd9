use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Numeric block identifier, stable within one catalogue version.
///
/// This is the block *type* (e.g. "stone"), not one of its states. State
/// variants are addressed by [`StateId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl BlockId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique identifier of one state variant of one block.
/// These are the values that go into the global palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl StateId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the catalogue says about one block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub display_name: String,
    /// Canonical token, e.g. `oak_log`. Unique within a catalogue.
    pub name: String,

    pub hardness: f64,
    pub diggable: bool,
    /// Item IDs dropped when the block is broken, in catalogue order.
    pub drop_ids: Vec<u32>,
    /// Tool ID -> whether that tool harvests this block.
    pub needs_tools: BTreeMap<u32, bool>,

    /// First state owned by this block (inclusive).
    pub min_state_id: StateId,
    /// Last state owned by this block (inclusive).
    pub max_state_id: StateId,

    pub transparent: bool,
    pub filter_light_level: u8,
    pub emit_light_level: u8,
}

impl Block {
    /// The closed interval of state IDs this block owns.
    pub fn states(&self) -> RangeInclusive<u32> {
        self.min_state_id.0..=self.max_state_id.0
    }

    /// Number of state variants. Zero for a malformed interval.
    pub fn state_count(&self) -> u64 {
        if self.min_state_id > self.max_state_id {
            0
        } else {
            u64::from(self.max_state_id.0 - self.min_state_id.0) + 1
        }
    }

    pub fn contains_state(&self, state: StateId) -> bool {
        self.min_state_id <= state && state <= self.max_state_id
    }

    /// Whether breaking this block with `tool` yields its drops.
    ///
    /// Blocks with no tool requirements are harvestable by hand or anything.
    pub fn can_harvest_with(&self, tool: u32) -> bool {
        self.needs_tools.is_empty() || self.needs_tools.get(&tool).copied().unwrap_or(false)
    }
}
