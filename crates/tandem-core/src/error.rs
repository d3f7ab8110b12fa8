//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a
//! configuration problem surfaces through them.

use thiserror::Error;

use crate::{AgentId, Position};

/// The top-level error type for `tandem-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tandem-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
