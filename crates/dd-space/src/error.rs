//! Spatial-subsystem error type.

use thiserror::Error;

use dd_core::Coordinate;

use crate::Occupant;

/// Errors produced by `dd-space`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpaceError {
    #[error("invalid world dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("coordinate {coordinate} is outside the {width}x{height} grid")]
    OutOfBounds { coordinate: Coordinate, width: i32, height: i32 },

    #[error("{0} is not in the world")]
    NotFound(Occupant),

    #[error("{occupant} is already placed at {at}")]
    AlreadyPlaced { occupant: Occupant, at: Coordinate },

    #[error("no path from {from} to {to}")]
    NoPath { from: Coordinate, to: Coordinate },
}

pub type SpaceResult<T> = Result<T, SpaceError>;
