use tandem_core::CoreError;
use tandem_world::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("world error: {0}")]
    World(#[from] WorldError),
}

pub type SimResult<T> = Result<T, SimError>;
