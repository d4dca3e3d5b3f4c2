//! The lifecycle arena.
//!
//! # Bookkeeping
//!
//! - `active` and `graveyard` are `BTreeMap`s keyed by id.  Ids are issued
//!   sequentially, so map order is creation order and "every active agent
//!   in insertion order" is a plain iteration.
//! - An agent is in exactly one of the two maps.  Termination moves it from
//!   `active` to `graveyard` and removes it from the world; it never comes
//!   back.
//! - `counters` count creations and terminations since the last
//!   [`Arena::step`].
//!
//! The world is passed into every operation that places or removes an
//! agent instead of being owned here, so the simulation can hand the world
//! and the arena out as separate borrows.

use std::collections::BTreeMap;

use serde::Serialize;

use dd_core::config::attr;
use dd_core::{AgentId, Coordinate, Cycle, SimRng, log, mix_seed, sim_log};
use dd_space::{Occupant, SpatialWorld};
use dd_strategy::{
    CompiledStrategySet, StrategyContext, StrategyError, StrategyKind, StrategyRegistry,
    StrategyResult, StrategySpecMap, StrategyTarget, StrategyValue,
};

use crate::agent::{Agent, AgentState, AgentStatus, TerminationReason};
use crate::error::{ArenaError, ArenaResult};
use crate::relations::RelationGraph;

// ── Settings bound by strategies ──────────────────────────────────────────────

/// Arena attributes filled in by strategy evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArenaSettings {
    pub seed_count: Option<i64>,
    pub seed_placement: Vec<Coordinate>,
    /// Base seed for genomes.  Each agent's genome mixes this with its id.
    pub genome_seed: u64,
}

fn mismatch(attribute: &str, expected: StrategyKind, value: &StrategyValue) -> StrategyError {
    StrategyError::KindMismatch { attribute: attribute.to_owned(), expected, actual: value.kind() }
}

impl StrategyTarget for ArenaSettings {
    fn bind(&mut self, attribute: &str, value: StrategyValue) -> StrategyResult<()> {
        match (attribute, value) {
            (attr::SEED_COUNT, StrategyValue::Quantity(n)) => self.seed_count = Some(n),
            (attr::SEED_PLACEMENT, StrategyValue::Placement(coords)) => self.seed_placement = coords,
            (attr::GENETICS, StrategyValue::Genome(g)) => self.genome_seed = g,
            (attr::SEED_COUNT, v) => return Err(mismatch(attribute, StrategyKind::Generation, &v)),
            (attr::SEED_PLACEMENT, v) => return Err(mismatch(attribute, StrategyKind::Placement, &v)),
            (attr::GENETICS, v) => return Err(mismatch(attribute, StrategyKind::Genetics, &v)),
            (other, _) => return Err(StrategyError::UnknownAttribute(other.to_owned())),
        }
        Ok(())
    }
}

// ── Counters & state ──────────────────────────────────────────────────────────

/// Per-cycle lifecycle counters, reset by [`Arena::step`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArenaCounters {
    pub created: u32,
    pub terminated: u32,
}

/// Serializable view of the arena.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArenaState {
    pub active: Vec<AgentState>,
    pub terminated: usize,
    pub total_created: u64,
    pub counters: ArenaCounters,
    pub relations: usize,
}

// ── Arena ─────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Arena {
    active: BTreeMap<AgentId, Agent>,
    graveyard: BTreeMap<AgentId, Agent>,
    relations: RelationGraph,
    counters: ArenaCounters,
    next_id: AgentId,
    strategies: CompiledStrategySet,
    settings: ArenaSettings,
}

impl Arena {
    pub fn new(strategies: CompiledStrategySet) -> Self {
        Self {
            active: BTreeMap::new(),
            graveyard: BTreeMap::new(),
            relations: RelationGraph::new(),
            counters: ArenaCounters::default(),
            next_id: AgentId(0),
            strategies,
            settings: ArenaSettings::default(),
        }
    }

    /// Validate `spec` against `registry` and build an empty arena from it.
    pub fn from_spec(registry: &StrategyRegistry, spec: &StrategySpecMap) -> ArenaResult<Self> {
        Ok(Self::new(registry.prepare(spec)?))
    }

    // ── Population changes ────────────────────────────────────────────────

    /// Evaluate the arena strategies and create one agent per coordinate of
    /// the seed placement.
    pub fn seed_population(
        &mut self,
        world: &mut SpatialWorld,
        rng: &mut SimRng,
        cycle: Cycle,
    ) -> ArenaResult<Vec<AgentId>> {
        {
            let mut ctx = StrategyContext::new(world, rng);
            self.strategies.apply(&mut self.settings, &mut ctx)?;
        }

        let placement = std::mem::take(&mut self.settings.seed_placement);
        let mut ids = Vec::with_capacity(placement.len());
        for at in placement {
            ids.push(self.create(world, at, cycle)?);
        }

        sim_log!(1, log::ARENA, cycle, "Seeded {} dooders", ids.len());
        Ok(ids)
    }

    /// Create a generation-0 agent at `position`.
    pub fn create(&mut self, world: &mut SpatialWorld, position: Coordinate, cycle: Cycle) -> ArenaResult<AgentId> {
        self.spawn(world, position, cycle, 0)
    }

    fn spawn(
        &mut self,
        world: &mut SpatialWorld,
        position: Coordinate,
        cycle: Cycle,
        generation: u32,
    ) -> ArenaResult<AgentId> {
        let id = self.next_id;
        let mut agent = Agent::new(id, cycle, generation, mix_seed(self.settings.genome_seed, id.0));
        world.place_entity(&mut agent, position)?;

        self.next_id = id.next();
        self.relations.add_node(id);
        self.active.insert(id, agent);
        self.counters.created += 1;

        sim_log!(3, log::DOODER, cycle, agent = id.0, "Created at {position}, generation {generation}");
        Ok(id)
    }

    /// Create the child of two co-operating parents at the first parent's
    /// cell.  Both parents must be active and distinct.
    pub fn create_offspring(
        &mut self,
        world: &mut SpatialWorld,
        parents: (AgentId, AgentId),
        cycle: Cycle,
    ) -> ArenaResult<AgentId> {
        let (a, b) = parents;
        if a == b {
            return Err(ArenaError::InvalidState { agent: a, reason: "cannot reproduce with itself" });
        }
        let pa = self.get_active(a)?;
        let pb = self.get_active(b)?;
        let position = pa.position;
        let generation = pa.generation.max(pb.generation) + 1;

        let child = self.spawn(world, position, cycle, generation)?;

        self.relations.link_offspring(a, child);
        self.relations.link_offspring(b, child);
        self.relations.link_partners(a, b);
        for parent in [a, b] {
            if let Some(p) = self.active.get_mut(&parent) {
                p.reproduction_count += 1;
            }
        }

        sim_log!(2, log::DOODER, cycle, agent = child.0, "Born to {a} and {b}");
        Ok(child)
    }

    /// Move an active agent from the live set to the graveyard and take it
    /// out of the world.
    pub fn terminate(
        &mut self,
        world: &mut SpatialWorld,
        id: AgentId,
        reason: TerminationReason,
        cycle: Cycle,
    ) -> ArenaResult<()> {
        if self.graveyard.contains_key(&id) {
            return Err(ArenaError::InvalidState { agent: id, reason: "already terminated" });
        }
        let Some(agent) = self.active.get(&id) else {
            return Err(ArenaError::AgentNotFound(id));
        };
        world.remove_by_reference(agent)?;

        let Some(mut agent) = self.active.remove(&id) else {
            return Err(ArenaError::AgentNotFound(id));
        };
        agent.status = AgentStatus::Terminated;
        agent.terminated = Some(cycle);
        sim_log!(2, log::DOODER, cycle, agent = id.0, "Died from {reason}");
        agent.termination_reason = Some(reason);

        self.graveyard.insert(id, agent);
        self.counters.terminated += 1;
        Ok(())
    }

    // ── Per-turn mutation ─────────────────────────────────────────────────

    /// Age an agent by one cycle at the start of its turn.
    pub fn begin_turn(&mut self, id: AgentId) -> ArenaResult<()> {
        let agent = self.active_mut(id)?;
        agent.age += 1;
        agent.hunger += 1;
        Ok(())
    }

    /// Move an active agent, keeping its recorded position and the world in
    /// step.  Returns the previous position.
    pub fn move_agent(&mut self, world: &mut SpatialWorld, id: AgentId, to: Coordinate) -> ArenaResult<Coordinate> {
        let agent = self.active.get_mut(&id).ok_or(ArenaError::AgentNotFound(id))?;
        let from = world.relocate(Occupant::Agent(id), to)?;
        agent.position = to;
        agent.move_count += 1;
        Ok(from)
    }

    /// The agent ate one unit of energy.
    pub fn record_consumption(&mut self, id: AgentId) -> ArenaResult<()> {
        let agent = self.active_mut(id)?;
        agent.hunger = 0;
        agent.energy_consumed += 1;
        Ok(())
    }

    fn active_mut(&mut self, id: AgentId) -> ArenaResult<&mut Agent> {
        self.active.get_mut(&id).ok_or(ArenaError::AgentNotFound(id))
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Any agent ever created, active or terminated.
    pub fn get(&self, id: AgentId) -> ArenaResult<&Agent> {
        self.active
            .get(&id)
            .or_else(|| self.graveyard.get(&id))
            .ok_or(ArenaError::AgentNotFound(id))
    }

    pub fn get_active(&self, id: AgentId) -> ArenaResult<&Agent> {
        self.active.get(&id).ok_or(ArenaError::AgentNotFound(id))
    }

    #[inline]
    pub fn is_active(&self, id: AgentId) -> bool {
        self.active.contains_key(&id)
    }

    /// A uniformly chosen active agent, or a terminated one if none are
    /// active.
    pub fn random(&self, rng: &mut SimRng) -> ArenaResult<&Agent> {
        let pool = if self.active.is_empty() { &self.graveyard } else { &self.active };
        if pool.is_empty() {
            return Err(ArenaError::EmptyPopulation);
        }
        let i = rng.gen_range(0..pool.len());
        pool.values().nth(i).ok_or(ArenaError::EmptyPopulation)
    }

    /// Active ids in creation order.
    pub fn active_ids(&self) -> Vec<AgentId> {
        self.active.keys().copied().collect()
    }

    pub fn active(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.active.values()
    }

    pub fn graveyard(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.graveyard.values()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn terminated_count(&self) -> usize {
        self.graveyard.len()
    }

    #[inline]
    pub fn is_extinct(&self) -> bool {
        self.active.is_empty()
    }

    /// Agents created over the whole run.
    #[inline]
    pub fn total_created(&self) -> u64 {
        self.next_id.0
    }

    #[inline]
    pub fn counters(&self) -> ArenaCounters {
        self.counters
    }

    pub fn relations(&self) -> &RelationGraph {
        &self.relations
    }

    pub fn settings(&self) -> &ArenaSettings {
        &self.settings
    }

    // ── Cycle bookkeeping ─────────────────────────────────────────────────

    /// Close the cycle: reset the per-cycle counters.
    pub fn step(&mut self) {
        self.counters = ArenaCounters::default();
    }

    pub fn state(&self) -> ArenaState {
        ArenaState {
            active: self.active.values().map(Agent::state).collect(),
            terminated: self.graveyard.len(),
            total_created: self.total_created(),
            counters: self.counters,
            relations: self.relations.edge_count(),
        }
    }
}
