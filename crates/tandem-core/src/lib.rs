//! `tandem-core` — foundational types for the `tandem` paired-carry simulation.
//!
//! This crate is a dependency of every other `tandem-*` crate.  It has no
//! `tandem-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `AgentId`, `MessageId`, `IdAllocator`                      |
//! | [`grid`]     | `Position`, `Direction`, `Rotation`, `GridBounds`          |
//! | [`time`]     | `Tick`, `SimClock`                                         |
//! | [`team`]     | `Team` enum                                                |
//! | [`rng`]      | `AgentRng` (per-robot), `SimRng` (world generation)        |
//! | [`config`]   | `ArenaConfig`, `GridConfig`, `CommsConfig`                 |
//! | [`error`]    | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod grid;
pub mod ids;
pub mod rng;
pub mod team;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ArenaConfig, CommsConfig, GridConfig};
pub use error::{CoreError, CoreResult};
pub use grid::{Direction, GridBounds, Position, Rotation};
pub use ids::{AgentId, IdAllocator, MessageId};
pub use rng::{AgentRng, SimRng};
pub use team::Team;
pub use time::{SimClock, Tick};
