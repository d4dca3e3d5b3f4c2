use thiserror::Error;

use dd_agent::ArenaError;
use dd_behavior::BehaviorError;
use dd_core::ClockState;
use dd_resource::PoolError;
use dd_space::SpaceError;
use dd_strategy::StrategyError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("simulation is {0}, expected running")]
    NotRunning(ClockState),

    #[error("simulation was already set up")]
    AlreadySetUp,

    #[error("space error: {0}")]
    Space(#[from] SpaceError),

    #[error("arena error: {0}")]
    Arena(#[from] ArenaError),

    #[error("resource error: {0}")]
    Pool(#[from] PoolError),

    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),
}

pub type SimResult<T> = Result<T, SimError>;
