//! A unit of energy.

use serde::{Deserialize, Serialize};

use dd_core::{Coordinate, Cycle, ResourceId};
use dd_space::{Locatable, Occupant};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ResourceStatus {
    Active,
    Consumed,
    Dissipated,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Resource {
    pub id: ResourceId,
    pub position: Coordinate,
    pub status: ResourceStatus,
    /// Cycles left before the resource dissipates.  `None` never expires.
    pub remaining_life: Option<u32>,
    pub created: Cycle,
}

impl Resource {
    pub fn new(id: ResourceId, created: Cycle, lifespan: Option<u32>) -> Self {
        Self {
            id,
            position: Coordinate::ORIGIN,
            status: ResourceStatus::Active,
            remaining_life: lifespan,
            created,
        }
    }

    /// Age the resource by one cycle.  Returns `true` once it has run out.
    pub fn decay(&mut self) -> bool {
        match &mut self.remaining_life {
            None => false,
            Some(life) => {
                *life = life.saturating_sub(1);
                *life == 0
            }
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ResourceStatus::Active
    }
}

impl Locatable for Resource {
    fn occupant(&self) -> Occupant {
        Occupant::Resource(self.id)
    }

    fn position(&self) -> Coordinate {
        self.position
    }

    fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }
}
