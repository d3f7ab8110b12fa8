//! `tandem-sim` — tick loop orchestrator for the tandem arena.
//!
//! # Five-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Deliver  — count every pending envelope down; promote the ones that
//!                reach zero; annihilate Lock/Unlock pairs; purge stale mail.
//!   ② Sense    — each robot records its footprint into tile memory.
//!   ③ Plan     — each robot advances its protocol and commits a Decision
//!                (messages produced here are posted after the phase).
//!   ④ Read     — each robot consumes the messages relevant to its state.
//!   ⑤ Execute  — for each robot in ascending AgentId order:
//!                  Forward / Turn         → move or rotate
//!                  PairUp(o)              → link seeker and offerer
//!                  PickUp                 → lift one unit if both partners agree
//!                  Deposit                → credit half a unit to the team
//!                  Unpair / Drop          → dissolve (and return the unit)
//!   then the end-of-tick invariant checks run and the clock advances.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tandem_core::ArenaConfig;
//! use tandem_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(ArenaConfig::default()).build()?;
//! sim.run_to_end(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod execute;
pub mod invariants;
pub mod observer;
pub mod report;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use report::TickReport;
pub use sim::Sim;
