//! Read-only simulation state handed to every behavior callback.

use dd_agent::Arena;
use dd_core::{AgentId, Coordinate, Cycle};
use dd_resource::ResourcePool;
use dd_space::SpatialWorld;

/// What an agent can see while deciding its turn.
///
/// Built by dd-sim for each agent's turn.  Because turns are sequential the
/// borrows reflect everything earlier agents did this cycle.
pub struct CycleContext<'a> {
    /// The cycle being played.
    pub cycle: Cycle,

    pub world: &'a SpatialWorld,

    /// Every agent, active and terminated.
    pub agents: &'a Arena,

    pub resources: &'a ResourcePool,
}

impl<'a> CycleContext<'a> {
    #[inline]
    pub fn new(
        cycle: Cycle,
        world: &'a SpatialWorld,
        agents: &'a Arena,
        resources: &'a ResourcePool,
    ) -> Self {
        Self { cycle, world, agents, resources }
    }

    /// Active agents other than `agent` standing on `at`, in arrival order.
    pub fn agents_at(&self, at: Coordinate, agent: AgentId) -> Vec<AgentId> {
        match self.world.cell_at(at) {
            Ok(cell) => cell
                .agents()
                .filter(|&other| other != agent && self.agents.is_active(other))
                .collect(),
            Err(_) => vec![],
        }
    }
}
