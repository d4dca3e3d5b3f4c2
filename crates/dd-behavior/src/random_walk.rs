//! Random walkers.

use dd_agent::Agent;
use dd_core::SimRng;
use dd_space::Neighborhood;

use crate::{BehaviorModel, CycleContext, Intent};

/// Moves every agent to a uniformly chosen neighboring cell each cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomWalk {
    pub neighborhood: Neighborhood,
}

impl RandomWalk {
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self { neighborhood }
    }
}

impl BehaviorModel for RandomWalk {
    fn act(&self, agent: &Agent, ctx: &CycleContext<'_>, rng: &mut SimRng) -> Vec<Intent> {
        random_step(agent, ctx, self.neighborhood, rng).into_iter().collect()
    }
}

/// A move to a random neighbor of the agent's cell, if it has one.
pub(crate) fn random_step(
    agent: &Agent,
    ctx: &CycleContext<'_>,
    hood: Neighborhood,
    rng: &mut SimRng,
) -> Option<Intent> {
    let options = ctx.world.neighbors(agent.position, hood).ok()?;
    rng.choose(&options).map(|&to| Intent::Move(to))
}
