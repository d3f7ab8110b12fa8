//! `tandem-world` — the passive grid the robots move on.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`tile`]  | `Tile` — gold count, deposit owner, occupant set           |
//! | [`world`] | `World` — row-major tile array, team bases, team scores    |
//! | [`error`] | `WorldError`, `WorldResult<T>`                             |
//!
//! The world has no behaviour of its own.  The driver mutates it only during
//! the execute phase, one robot at a time, so none of the operations here
//! need transactional semantics.

pub mod error;
pub mod tile;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::{WorldError, WorldResult};
pub use tile::Tile;
pub use world::World;
