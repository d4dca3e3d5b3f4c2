//! Agent intents: the changes an agent can ask for during its turn.

use dd_agent::TerminationReason;
use dd_core::{AgentId, Coordinate, ResourceId};

/// Something an agent wants to happen this turn.
///
/// Intents are produced by [`BehaviorModel`](crate::BehaviorModel) callbacks
/// and applied by dd-sim in the order returned.  An intent that no longer
/// makes sense when its turn to be applied comes (the resource was eaten,
/// the partner died, the target cell is not adjacent) is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Step to an adjacent cell (Moore adjacency, wrap-aware).
    Move(Coordinate),

    /// Eat a resource on the agent's own cell.
    Consume(ResourceId),

    /// Produce offspring with another active agent on the same cell.
    Reproduce { partner: AgentId },

    /// Leave the simulation.
    Die(TerminationReason),
}

impl Intent {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Intent::Die(_))
    }
}
