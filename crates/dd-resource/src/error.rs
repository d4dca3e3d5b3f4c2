//! Resource-pool error type.

use thiserror::Error;

use dd_core::ResourceId;
use dd_space::SpaceError;
use dd_strategy::StrategyError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoolError {
    #[error("resource {0} not found")]
    ResourceNotFound(ResourceId),

    #[error(transparent)]
    Space(#[from] SpaceError),

    #[error("resource strategy: {0}")]
    Strategy(#[from] StrategyError),
}

pub type PoolResult<T> = Result<T, PoolError>;
