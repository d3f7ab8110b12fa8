//! Per-cell state.

use std::collections::BTreeSet;

use tandem_core::{AgentId, Team};

/// One grid cell.
///
/// Occupants are kept in a `BTreeSet` so iteration is always in ascending
/// id order, which keeps every consumer of the set deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Gold units lying on the tile.
    pub gold: u32,

    /// The team whose base this tile is, if any.
    pub deposit: Option<Team>,

    /// Robots currently standing on the tile.
    pub occupants: BTreeSet<AgentId>,
}

impl Tile {
    #[inline]
    pub fn is_deposit(&self) -> bool {
        self.deposit.is_some()
    }
}
