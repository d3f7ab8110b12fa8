//! The sensing footprint and the private tile memory it feeds.
//!
//! A robot sees the three cells in front of it and the five cells beyond
//! those, plus the cell it stands on.  What it saw is kept forever: entries
//! are overwritten when re-observed, never cleared, so a robot can walk
//! towards gold that someone else has long since taken.

use std::collections::BTreeMap;

use tandem_core::{AgentId, Direction, GridBounds, Position, Team, Tick};

use crate::TickContext;

/// Footprint offsets for a north-facing robot, rotated into the actual
/// facing before use.
pub const FOOTPRINT: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-2, -2), (-1, -2), (0, -2), (1, -2), (2, -2),
];

/// In-bounds cells visible from `pos` facing `facing`, own cell first.
/// Duplicates (possible on tiny wrapped grids) are dropped.
pub fn footprint(pos: Position, facing: Direction, bounds: GridBounds) -> Vec<Position> {
    let mut cells = Vec::with_capacity(FOOTPRINT.len() + 1);
    let own = bounds.resolve(pos).into_iter();
    let ahead = FOOTPRINT.iter().filter_map(|&offset| {
        let (dx, dy) = facing.rotate_offset(offset);
        bounds.resolve(pos.offset(dx, dy))
    });
    for cell in own.chain(ahead) {
        if !cells.contains(&cell) {
            cells.push(cell);
        }
    }
    cells
}

// ── Sightings ─────────────────────────────────────────────────────────────────

/// One robot as seen on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupantSighting {
    pub id:     AgentId,
    pub team:   Team,
    pub paired: bool,
}

/// A tile as last observed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSighting {
    pub gold:      u32,
    pub deposit:   Option<Team>,
    /// Ordered by id.
    pub occupants: Vec<OccupantSighting>,
    pub seen_at:   Tick,
}

impl TileSighting {
    pub fn contains(&self, agent: AgentId) -> bool {
        self.occupants.iter().any(|o| o.id == agent)
    }

    /// Unpaired members of `team`, ordered by id.
    pub fn unpaired(&self, team: Team) -> impl Iterator<Item = AgentId> + '_ {
        self.occupants
            .iter()
            .filter(move |o| o.team == team && !o.paired)
            .map(|o| o.id)
    }

    /// Collectable gold: present and not lying on a base.
    pub fn has_loose_gold(&self) -> bool {
        self.gold > 0 && self.deposit.is_none()
    }
}

// ── TileMemory ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TileMemory {
    tiles: BTreeMap<Position, TileSighting>,
}

impl TileMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Option<&TileSighting> {
        self.tiles.get(&pos)
    }

    pub fn record(&mut self, pos: Position, sighting: TileSighting) {
        self.tiles.insert(pos, sighting);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &TileSighting)> + '_ {
        self.tiles.iter().map(|(&p, s)| (p, s))
    }

    /// Nearest remembered tile with loose gold, by Manhattan distance from
    /// `from`; ties go to the smallest position.  Tiles for which `skip`
    /// returns `true` are ignored.
    pub fn nearest_gold(&self, from: Position, skip: impl Fn(Position) -> bool) -> Option<Position> {
        self.tiles
            .iter()
            .filter(|(p, s)| s.has_loose_gold() && !skip(**p))
            .min_by_key(|(p, _)| (from.manhattan(**p), **p))
            .map(|(p, _)| *p)
    }

    /// Overwrite every cell in the footprint of `pos`/`facing` with what is
    /// there now.
    pub fn observe(&mut self, ctx: &TickContext<'_>, pos: Position, facing: Direction) {
        for cell in footprint(pos, facing, ctx.world.bounds()) {
            let Ok(tile) = ctx.world.tile(cell) else { continue };
            let occupants = tile
                .occupants
                .iter()
                .filter_map(|&id| ctx.view(id))
                .map(|v| OccupantSighting { id: v.id, team: v.team, paired: v.paired })
                .collect();
            self.record(cell, TileSighting {
                gold: tile.gold,
                deposit: tile.deposit,
                occupants,
                seen_at: ctx.now,
            });
        }
    }
}
