//! Values produced by strategy functions.

use serde::Serialize;

use dd_core::{Coordinate, StrategyKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StrategyValue {
    /// Output of a Generation strategy.
    Quantity(i64),
    /// Output of a Placement strategy.  May repeat coordinates.
    Placement(Vec<Coordinate>),
    /// Output of a Genetics strategy: a seed the genome is derived from.
    Genome(u64),
}

impl StrategyValue {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyValue::Quantity(_) => StrategyKind::Generation,
            StrategyValue::Placement(_) => StrategyKind::Placement,
            StrategyValue::Genome(_) => StrategyKind::Genetics,
        }
    }

    pub fn as_quantity(&self) -> Option<i64> {
        match self {
            StrategyValue::Quantity(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_placement(&self) -> Option<&[Coordinate]> {
        match self {
            StrategyValue::Placement(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_genome(&self) -> Option<u64> {
        match self {
            StrategyValue::Genome(g) => Some(*g),
            _ => None,
        }
    }
}
