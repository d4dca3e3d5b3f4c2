//! A rule-based forager.
//!
//! Each turn, in order:
//!
//! 1. hunger above `max_hunger` ⇒ die of starvation; age above `max_age` ⇒
//!    die of old age,
//! 2. energy on the agent's own cell ⇒ eat it,
//! 3. energy within `perception` (wrap-aware Manhattan distance) ⇒ take the
//!    first step of a shortest path toward the nearest one,
//! 4. otherwise step to a random neighbor.
//!
//! On meeting other dooders an agent that is not hungry reproduces with the
//! first of them with probability `reproduction_probability`.

use serde::{Deserialize, Serialize};

use dd_agent::{Agent, TerminationReason};
use dd_core::{AgentId, SimRng};
use dd_space::Neighborhood;

use crate::random_walk::random_step;
use crate::{BehaviorError, BehaviorModel, BehaviorResult, CycleContext, Intent};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForagerSettings {
    /// Cycles without eating an agent survives.
    pub max_hunger: u32,
    pub max_age: u32,
    /// Agents reproduce only while their hunger is at or below this.
    pub reproduction_hunger_limit: u32,
    pub reproduction_probability: f64,
    /// How far away energy can be noticed.  0 means the own cell only.
    pub perception: u32,
    pub neighborhood: Neighborhood,
}

impl Default for ForagerSettings {
    fn default() -> Self {
        Self {
            max_hunger: 10,
            max_age: 50,
            reproduction_hunger_limit: 3,
            reproduction_probability: 0.5,
            perception: 2,
            neighborhood: Neighborhood::VonNeumann,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Forager {
    settings: ForagerSettings,
}

impl Forager {
    pub fn new(settings: ForagerSettings) -> BehaviorResult<Self> {
        let p = settings.reproduction_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(BehaviorError::Config(format!(
                "reproduction_probability must be within [0, 1], got {p}"
            )));
        }
        if settings.max_age == 0 {
            return Err(BehaviorError::Config("max_age must be positive".into()));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &ForagerSettings {
        &self.settings
    }

    fn death(&self, agent: &Agent) -> Option<TerminationReason> {
        if agent.hunger > self.settings.max_hunger {
            Some(TerminationReason::Starvation)
        } else if agent.age > self.settings.max_age {
            Some(TerminationReason::OldAge)
        } else {
            None
        }
    }

    /// First step toward the nearest perceivable resource.  Ties go to the
    /// older resource.
    fn seek(&self, agent: &Agent, ctx: &CycleContext<'_>) -> Option<Intent> {
        let from = agent.position;
        let target = ctx
            .resources
            .resources()
            .map(|r| (ctx.world.distance(from, r.position), r.position))
            .filter(|&(d, _)| d > 0 && d <= self.settings.perception)
            .min_by_key(|&(d, _)| d)?
            .1;
        let step = ctx.world.find_path(from, target).ok()?.next_step()?;
        Some(Intent::Move(step))
    }
}

impl Default for Forager {
    fn default() -> Self {
        Self { settings: ForagerSettings::default() }
    }
}

impl BehaviorModel for Forager {
    fn act(&self, agent: &Agent, ctx: &CycleContext<'_>, rng: &mut SimRng) -> Vec<Intent> {
        if let Some(reason) = self.death(agent) {
            return vec![Intent::Die(reason)];
        }

        let here = ctx
            .world
            .cell_at(agent.position)
            .ok()
            .and_then(|cell| cell.resources().next());
        if let Some(resource) = here {
            return vec![Intent::Consume(resource)];
        }

        self.seek(agent, ctx)
            .or_else(|| random_step(agent, ctx, self.settings.neighborhood, rng))
            .into_iter()
            .collect()
    }

    fn on_encounter(
        &self,
        agent: &Agent,
        others: &[AgentId],
        _ctx: &CycleContext<'_>,
        rng: &mut SimRng,
    ) -> Vec<Intent> {
        if self.death(agent).is_some() || agent.hunger > self.settings.reproduction_hunger_limit {
            return vec![];
        }
        match others.first() {
            Some(&partner) if rng.gen_bool(self.settings.reproduction_probability) => {
                vec![Intent::Reproduce { partner }]
            }
            _ => vec![],
        }
    }
}
