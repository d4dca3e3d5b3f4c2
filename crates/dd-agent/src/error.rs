//! Arena error type.

use thiserror::Error;

use dd_core::AgentId;
use dd_space::SpaceError;
use dd_strategy::StrategyError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArenaError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("agent {agent}: {reason}")]
    InvalidState { agent: AgentId, reason: &'static str },

    #[error("no agents, active or terminated")]
    EmptyPopulation,

    #[error(transparent)]
    Space(#[from] SpaceError),

    #[error("arena strategy: {0}")]
    Strategy(#[from] StrategyError),
}

pub type ArenaResult<T> = Result<T, ArenaError>;
