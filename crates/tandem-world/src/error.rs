//! World error type.

use thiserror::Error;

use tandem_core::{AgentId, Position};

/// Errors produced by `tandem-world`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("no gold left at {0}")]
    NoGold(Position),

    #[error("{agent} is already on tile {pos}")]
    AlreadyOccupying { agent: AgentId, pos: Position },

    #[error("{agent} is not on tile {pos}")]
    NotOccupying { agent: AgentId, pos: Position },
}

pub type WorldResult<T> = Result<T, WorldError>;
