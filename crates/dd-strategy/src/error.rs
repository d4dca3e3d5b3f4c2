//! Strategy-subsystem error type.

use thiserror::Error;

use dd_core::StrategyKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrategyError {
    #[error("no {kind} strategy named `{name}` is registered")]
    UnknownStrategy { kind: StrategyKind, name: String },

    #[error("cyclic strategy dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("`{attribute}` depends on `{dependency}`, which is not declared")]
    UnknownDependency { attribute: String, dependency: String },

    #[error("strategy `{function}` is missing argument `{argument}`")]
    MissingArgument { function: String, argument: String },

    #[error("strategy `{function}`: invalid argument: {reason}")]
    InvalidArgument { function: String, reason: String },

    #[error("model has no attribute `{0}`")]
    UnknownAttribute(String),

    #[error("attribute `{attribute}` expects a {expected} value, got {actual}")]
    KindMismatch { attribute: String, expected: StrategyKind, actual: StrategyKind },
}

pub type StrategyResult<T> = Result<T, StrategyError>;
