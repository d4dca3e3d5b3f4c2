//! The dooder.

use std::fmt;

use serde::{Deserialize, Serialize};

use dd_core::{AgentId, Coordinate, Cycle};
use dd_space::{Locatable, Occupant};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AgentStatus {
    Alive,
    Terminated,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TerminationReason {
    Starvation,
    OldAge,
    /// Removed by the caller rather than by its own behavior.
    Culled,
    Other(String),
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Starvation => f.write_str("starvation"),
            TerminationReason::OldAge => f.write_str("old age"),
            TerminationReason::Culled => f.write_str("culling"),
            TerminationReason::Other(s) => f.write_str(s),
        }
    }
}

/// One dooder.  Owned by the [`Arena`](crate::Arena); behaviors see it by
/// shared reference and ask for changes through intents.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub position: Coordinate,
    pub status: AgentStatus,
    /// Cycles lived.  Incremented at the start of each of the agent's turns.
    pub age: u32,
    /// Cycles since the agent last ate.
    pub hunger: u32,
    /// 0 for seeded agents; one more than the older parent otherwise.
    pub generation: u32,
    pub created: Cycle,
    pub terminated: Option<Cycle>,
    pub termination_reason: Option<TerminationReason>,
    pub reproduction_count: u32,
    pub move_count: u32,
    pub energy_consumed: u32,
    pub genome: u64,
}

impl Agent {
    pub fn new(id: AgentId, created: Cycle, generation: u32, genome: u64) -> Self {
        Self {
            id,
            position: Coordinate::ORIGIN,
            status: AgentStatus::Alive,
            age: 0,
            hunger: 0,
            generation,
            created,
            terminated: None,
            termination_reason: None,
            reproduction_count: 0,
            move_count: 0,
            energy_consumed: 0,
            genome,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == AgentStatus::Alive
    }

    pub fn state(&self) -> AgentState {
        AgentState {
            id: self.id,
            x: self.position.x,
            y: self.position.y,
            status: self.status,
            age: self.age,
            hunger: self.hunger,
            generation: self.generation,
            created: self.created,
            terminated: self.terminated,
            termination_reason: self.termination_reason.as_ref().map(ToString::to_string),
            reproduction_count: self.reproduction_count,
            move_count: self.move_count,
            energy_consumed: self.energy_consumed,
            genome: self.genome,
        }
    }
}

impl Locatable for Agent {
    fn occupant(&self) -> Occupant {
        Occupant::Agent(self.id)
    }

    fn position(&self) -> Coordinate {
        self.position
    }

    fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }
}

/// Flat, serializable view of an [`Agent`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentState {
    pub id: AgentId,
    pub x: i32,
    pub y: i32,
    pub status: AgentStatus,
    pub age: u32,
    pub hunger: u32,
    pub generation: u32,
    pub created: Cycle,
    pub terminated: Option<Cycle>,
    pub termination_reason: Option<String>,
    pub reproduction_count: u32,
    pub move_count: u32,
    pub energy_consumed: u32,
    pub genome: u64,
}
