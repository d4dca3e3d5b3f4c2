//! Grid cells and the things that can occupy them.

use std::fmt;

use serde::{Deserialize, Serialize};

use dd_core::{AgentId, Coordinate, ResourceId};

/// A reference to an entity held in the world.  The world never owns the
/// entity itself; the arena owns agents and the resource pool owns
/// resources.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Occupant {
    Agent(AgentId),
    Resource(ResourceId),
}

impl Occupant {
    #[inline]
    pub fn kind(self) -> OccupantKind {
        match self {
            Occupant::Agent(_) => OccupantKind::Agent,
            Occupant::Resource(_) => OccupantKind::Resource,
        }
    }

    #[inline]
    pub fn as_agent(self) -> Option<AgentId> {
        match self {
            Occupant::Agent(id) => Some(id),
            Occupant::Resource(_) => None,
        }
    }

    #[inline]
    pub fn as_resource(self) -> Option<ResourceId> {
        match self {
            Occupant::Resource(id) => Some(id),
            Occupant::Agent(_) => None,
        }
    }
}

impl From<AgentId> for Occupant {
    fn from(id: AgentId) -> Self {
        Occupant::Agent(id)
    }
}

impl From<ResourceId> for Occupant {
    fn from(id: ResourceId) -> Self {
        Occupant::Resource(id)
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Agent(id) => id.fmt(f),
            Occupant::Resource(id) => id.fmt(f),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum OccupantKind {
    Agent,
    Resource,
}

/// An entity that records its own grid position.
///
/// `SpatialWorld::place_entity` and `remove_by_reference` go through this
/// trait so the entity's recorded position and the world's index are
/// updated together.
pub trait Locatable {
    fn occupant(&self) -> Occupant;
    fn position(&self) -> Coordinate;
    fn set_position(&mut self, position: Coordinate);
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One grid position and its occupants, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    coordinate: Coordinate,
    occupants: Vec<Occupant>,
}

impl Cell {
    pub(crate) fn new(coordinate: Coordinate) -> Self {
        Self { coordinate, occupants: Vec::new() }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[inline]
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn contains(&self, occupant: Occupant) -> bool {
        self.occupants.contains(&occupant)
    }

    pub fn has_kind(&self, kind: OccupantKind) -> bool {
        self.occupants.iter().any(|o| o.kind() == kind)
    }

    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.occupants.iter().filter_map(|o| o.as_agent())
    }

    pub fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.occupants.iter().filter_map(|o| o.as_resource())
    }

    pub(crate) fn insert(&mut self, occupant: Occupant) {
        self.occupants.push(occupant);
    }

    /// Remove keeping the arrival order of the rest.
    pub(crate) fn remove(&mut self, occupant: Occupant) -> bool {
        match self.occupants.iter().position(|o| *o == occupant) {
            Some(i) => {
                self.occupants.remove(i);
                true
            }
            None => false,
        }
    }
}
