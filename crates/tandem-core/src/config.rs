//! Arena configuration.
//!
//! Supplied as a plain struct at construction; the demo binary can also load
//! it from JSON when the `serde` feature is on, with missing fields falling
//! back to their defaults.  Defaults mirror a 20×20 arena with ten robots
//! per team and fifty gold units.

use crate::{CoreError, CoreResult, GridBounds, Position, Team};

// ── GridConfig ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub width:  u32,
    pub height: u32,
    /// Wrap coordinates around the edges instead of treating them as walls.
    pub wrap:   bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { width: 20, height: 20, wrap: false }
    }
}

// ── CommsConfig ───────────────────────────────────────────────────────────────

/// Simulated network latency and mailbox retention.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CommsConfig {
    /// Smallest delivery countdown drawn on send.  Must be at least 1 so a
    /// message is never actionable in the tick it was sent.
    pub min_delay_ticks: u32,
    /// Largest delivery countdown drawn on send (inclusive).
    pub max_delay_ticks: u32,
    /// Actionable messages older than this many ticks are purged.
    pub retention_ticks: u64,
}

impl Default for CommsConfig {
    fn default() -> Self {
        Self { min_delay_ticks: 1, max_delay_ticks: 3, retention_ticks: 32 }
    }
}

// ── ArenaConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    pub grid: GridConfig,

    /// Robots created per team by the default placement.  Robots added
    /// explicitly through the builder come on top of these.
    pub robots_per_team: usize,

    /// Gold units scattered at random by the default world generation.
    pub gold_units: u32,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Ticks simulated by `Sim::run_to_end`.
    pub total_ticks: u64,

    /// Emit an observer snapshot every N ticks (0 disables snapshots).
    pub output_interval_ticks: u64,

    pub comms: CommsConfig,

    /// Distance from a pickup or transit proposal to its target tick.
    /// Values above `2 * max_delay_ticks` let a full request/ack round trip
    /// land before the target; smaller values only ever time out.
    pub sync_delay_ticks: u64,

    /// A pairing negotiation older than this resets and may start over.
    pub pairing_timeout_ticks: u64,

    /// Chance per tick that a wandering robot turns instead of advancing.
    pub wander_turn_probability: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            grid:                    GridConfig::default(),
            robots_per_team:         10,
            gold_units:              50,
            seed:                    42,
            total_ticks:             500,
            output_interval_ticks:   1,
            comms:                   CommsConfig::default(),
            sync_delay_ticks:        7,
            pairing_timeout_ticks:   12,
            wander_turn_probability: 0.2,
        }
    }
}

impl ArenaConfig {
    /// Grid extent as used by the world and the sensing code.
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.grid.width, self.grid.height, self.grid.wrap)
    }

    /// Deposit tile of `team`: red at the top-left corner, blue at the
    /// bottom-right corner.
    pub fn base_of(&self, team: Team) -> Position {
        match team {
            Team::Red  => Position::new(0, 0),
            Team::Blue => Position::new(self.grid.width as i32 - 1, self.grid.height as i32 - 1),
        }
    }

    /// Smallest `sync_delay_ticks` that always fits a request/ack round trip.
    pub fn reliable_sync_delay(&self) -> u64 {
        2 * self.comms.max_delay_ticks as u64 + 1
    }

    /// Reject configurations the simulation cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.grid.width < 2 || self.grid.height < 2 {
            return Err(CoreError::Config(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }
        if self.comms.min_delay_ticks == 0 {
            return Err(CoreError::Config("min_delay_ticks must be at least 1".into()));
        }
        if self.comms.min_delay_ticks > self.comms.max_delay_ticks {
            return Err(CoreError::Config(format!(
                "min_delay_ticks ({}) exceeds max_delay_ticks ({})",
                self.comms.min_delay_ticks, self.comms.max_delay_ticks
            )));
        }
        if self.sync_delay_ticks == 0 {
            return Err(CoreError::Config("sync_delay_ticks must be at least 1".into()));
        }
        // Default placement lines each team up along its base row.
        if self.robots_per_team >= self.grid.width as usize {
            return Err(CoreError::Config(format!(
                "{} robots per team do not fit a row of width {}",
                self.robots_per_team, self.grid.width
            )));
        }
        if !(0.0..=1.0).contains(&self.wander_turn_probability) {
            return Err(CoreError::Config(format!(
                "wander_turn_probability {} is not a probability",
                self.wander_turn_probability
            )));
        }
        Ok(())
    }
}
