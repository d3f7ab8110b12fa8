//! The `World` tile store.

use tandem_core::{AgentId, GridBounds, Position, Team};

use crate::{Tile, WorldError, WorldResult};

/// Row-major tile array plus per-team bases and scores.
///
/// Scores are kept in *credits*: every robot that completes a deposit adds
/// one credit, so a delivered gold unit (carried by two robots) is worth two
/// credits, i.e. one point.
#[derive(Debug, Clone)]
pub struct World {
    bounds:  GridBounds,
    tiles:   Vec<Tile>,
    bases:   [Position; 2],
    credits: [u32; 2],
}

impl World {
    /// Build an empty world and mark each team's base tile as its deposit.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if a base lies outside `bounds`.
    pub fn new(bounds: GridBounds, bases: [Position; 2]) -> WorldResult<Self> {
        let mut world = Self {
            bounds,
            tiles:   vec![Tile::default(); bounds.cell_count()],
            bases,
            credits: [0; 2],
        };
        for team in Team::ALL {
            let base = bases[team.index()];
            world.tile_mut(base)?.deposit = Some(team);
        }
        Ok(world)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Map `pos` onto the grid (wrapping if configured).
    #[inline]
    pub fn resolve(&self, pos: Position) -> Option<Position> {
        self.bounds.resolve(pos)
    }

    pub fn tile(&self, pos: Position) -> WorldResult<&Tile> {
        let idx = self.bounds.index(pos).ok_or(WorldError::OutOfBounds(pos))?;
        Ok(&self.tiles[idx])
    }

    pub fn tile_mut(&mut self, pos: Position) -> WorldResult<&mut Tile> {
        let idx = self.bounds.index(pos).ok_or(WorldError::OutOfBounds(pos))?;
        Ok(&mut self.tiles[idx])
    }

    /// Iterate `(position, tile)` in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, t)| (self.bounds.position_of(i), t))
    }

    // ── Gold ──────────────────────────────────────────────────────────────

    pub fn gold_at(&self, pos: Position) -> u32 {
        self.tile(pos).map(|t| t.gold).unwrap_or(0)
    }

    pub fn add_gold(&mut self, pos: Position, units: u32) -> WorldResult<()> {
        self.tile_mut(pos)?.gold += units;
        Ok(())
    }

    /// Take one unit off `pos`.
    ///
    /// # Errors
    ///
    /// `NoGold` if the tile is empty; the count never goes negative.
    pub fn remove_gold(&mut self, pos: Position) -> WorldResult<()> {
        let tile = self.tile_mut(pos)?;
        if tile.gold == 0 {
            return Err(WorldError::NoGold(pos));
        }
        tile.gold -= 1;
        Ok(())
    }

    /// Gold lying on all tiles.
    pub fn total_gold(&self) -> u64 {
        self.tiles.iter().map(|t| t.gold as u64).sum()
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    pub fn add_occupant(&mut self, pos: Position, agent: AgentId) -> WorldResult<()> {
        let at = self.resolve(pos).ok_or(WorldError::OutOfBounds(pos))?;
        if !self.tile_mut(at)?.occupants.insert(agent) {
            return Err(WorldError::AlreadyOccupying { agent, pos: at });
        }
        Ok(())
    }

    pub fn remove_occupant(&mut self, pos: Position, agent: AgentId) -> WorldResult<()> {
        let at = self.resolve(pos).ok_or(WorldError::OutOfBounds(pos))?;
        if !self.tile_mut(at)?.occupants.remove(&agent) {
            return Err(WorldError::NotOccupying { agent, pos: at });
        }
        Ok(())
    }

    /// Move `agent` from `from` to `to`, returning the resolved destination.
    ///
    /// The destination is validated before anything changes, so a failed
    /// move leaves occupancy untouched.
    pub fn move_occupant(&mut self, agent: AgentId, from: Position, to: Position) -> WorldResult<Position> {
        let dest = self.resolve(to).ok_or(WorldError::OutOfBounds(to))?;
        self.remove_occupant(from, agent)?;
        self.add_occupant(dest, agent)?;
        Ok(dest)
    }

    pub fn occupants(&self, pos: Position) -> impl Iterator<Item = AgentId> + '_ {
        self.tile(pos)
            .ok()
            .into_iter()
            .flat_map(|t| t.occupants.iter().copied())
    }

    // ── Deposits ──────────────────────────────────────────────────────────

    pub fn is_deposit(&self, pos: Position) -> bool {
        self.deposit_owner(pos).is_some()
    }

    pub fn deposit_owner(&self, pos: Position) -> Option<Team> {
        self.tile(pos).ok().and_then(|t| t.deposit)
    }

    pub fn deposit_of(&self, team: Team) -> Position {
        self.bases[team.index()]
    }

    // ── Scores ────────────────────────────────────────────────────────────

    /// Add one per-robot contribution to `team`'s score.
    pub fn credit(&mut self, team: Team) {
        self.credits[team.index()] += 1;
    }

    /// Raw per-robot contributions credited to `team`.
    pub fn credits(&self, team: Team) -> u32 {
        self.credits[team.index()]
    }

    /// Score in points (two credits per point).
    pub fn score(&self, team: Team) -> f64 {
        self.credits(team) as f64 / 2.0
    }

    /// Whole gold units delivered by `team`.
    pub fn delivered(&self, team: Team) -> u32 {
        self.credits(team) / 2
    }

    /// Credits summed over both teams.
    pub fn total_credits(&self) -> u64 {
        self.credits.iter().map(|&c| c as u64).sum()
    }
}
