//! `tandem-robot` — the autonomous agent and its protocols.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`robot`]      | `Robot` — state, `sense` / `plan` / `read`, driver hooks     |
//! | [`sensing`]    | `FOOTPRINT`, `TileMemory`, `TileSighting`                    |
//! | [`navigation`] | heading, wandering, `transit_plan`                           |
//! | [`pairing`]    | `PairingState` and the request/ack handshake                 |
//! | [`pickup`]     | `PickupState` and the two-phase pickup agreement             |
//! | [`transit`]    | `TransitState` and the lockstep carry to base                |
//! | [`decision`]   | `Decision` — the one action committed per tick               |
//! | [`context`]    | `TickContext`, `RobotView`, `Effects`                        |
//! | [`fault`]      | `Fault` — non-fatal protocol faults                          |
//! | [`store`]      | `AgentRngs` — per-robot RNGs                                 |
//!
//! # Decision flow
//!
//! ```text
//! carrying            → transit   (turn, align, propose/accept plan, step)
//! partner, empty hand → pickup    (propose/accept t_sync, PickUp at t_sync)
//! alone on gold       → pairing   (seek / offer, lock on success)
//! otherwise           → explore   (nearest remembered unlocked gold, or wander)
//! ```
//!
//! Robots never touch the world or each other directly.  Everything they
//! want done leaves as a `Decision` (for the driver's execute phase) or as
//! `Outgoing` messages (for the post office).

pub mod context;
pub mod decision;
pub mod fault;
pub mod navigation;
pub mod pairing;
pub mod pickup;
pub mod robot;
pub mod sensing;
pub mod store;
pub mod transit;


pub use context::{Effects, RobotView, TickContext};
pub use decision::Decision;
pub use fault::Fault;
pub use navigation::transit_plan;
pub use pairing::PairingState;
pub use pickup::PickupState;
pub use robot::Robot;
pub use sensing::{FOOTPRINT, OccupantSighting, TileMemory, TileSighting};
pub use store::AgentRngs;
pub use transit::TransitState;
