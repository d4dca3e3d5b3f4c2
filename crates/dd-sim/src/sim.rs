//! The `Sim` struct and its cycle loop.

use serde::Serialize;

use dd_agent::{Arena, ArenaState};
use dd_behavior::{BehaviorModel, CycleContext, Intent};
use dd_core::{AgentId, ClockState, Cycle, SimClock, SimConfig, SimRng, log, sim_log};
use dd_resource::{PoolState, ResourcePool};
use dd_space::{Neighborhood, Occupant, SpatialWorld, WorldState};

use crate::{SimError, SimObserver, SimResult, SimView, StopCondition, StopReason};

// ── Reports ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RunOutcome {
    Stopped(StopReason),
    /// A cycle raised an error.  `error` is its full display text.
    Failed { cycle: Cycle, error: String },
}

/// Whole-run figures.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimSummary {
    /// Cycles completed.
    pub cycles: u64,
    pub total_allocated: u32,
    pub total_consumed: u32,
    pub total_dissipated: u32,
    pub starting_agents: usize,
    pub ending_agents: usize,
    pub total_created: u64,
    /// Mean age of every terminated agent; 0 when none died.
    pub average_age_at_death: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub summary: SimSummary,
}

impl RunReport {
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, RunOutcome::Failed { .. })
    }
}

/// Serializable view of every component.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimState {
    pub cycle: Cycle,
    pub clock: ClockState,
    pub stop_reason: Option<StopReason>,
    pub world: WorldState,
    pub arena: ArenaState,
    pub resources: PoolState,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// `Sim<B>` owns the world, the arena, the resource pool and the single
/// [`SimRng`] every random draw comes from.  See the crate docs for the
/// order of one cycle.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: BehaviorModel> {
    pub config: SimConfig,

    /// Cycle counter and `Created → Running → Stopped` state.
    pub clock: SimClock,

    pub world: SpatialWorld,

    pub arena: Arena,

    pub pool: ResourcePool,

    /// Called once per active agent per cycle.
    pub behavior: B,

    pub rng: SimRng,

    conditions: Vec<Box<dyn StopCondition>>,
    starting_agents: usize,
    stop_reason: Option<StopReason>,
}

impl<B: BehaviorModel> Sim<B> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        clock: SimClock,
        rng: SimRng,
        config: SimConfig,
        world: SpatialWorld,
        arena: Arena,
        pool: ResourcePool,
        behavior: B,
        conditions: Vec<Box<dyn StopCondition>>,
    ) -> Self {
        Self {
            config,
            clock,
            world,
            arena,
            pool,
            behavior,
            rng,
            conditions,
            starting_agents: 0,
            stop_reason: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Allocate the first resources, seed the population and start the
    /// clock.  Observers get one collection for cycle 0.
    pub fn setup<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.clock.state != ClockState::Created {
            return Err(SimError::AlreadySetUp);
        }
        let cycle = self.clock.current;
        let placed = self.pool.allocate(&mut self.world, &mut self.rng, cycle)?;
        let seeded = self.arena.seed_population(&mut self.world, &mut self.rng, cycle)?;
        self.starting_agents = seeded.len();
        self.clock.start();

        sim_log!(1, log::SIMULATION, cycle, "Setup complete: {} dooders, {placed} energy", seeded.len());
        self.observe(cycle, observer);

        // Setup's creations and allocations belong to the cycle 0 record.
        self.arena.step();
        self.pool.reset_counters();
        Ok(())
    }

    /// Play one cycle.  The clock must be running.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if !self.clock.is_running() {
            return Err(SimError::NotRunning(self.clock.state));
        }
        let cycle = self.clock.current.offset(1);

        // ── ① Turns ───────────────────────────────────────────────────────
        //
        // Offspring born this cycle are not in the list and act from the
        // next one.  Agents killed earlier in the cycle are skipped.
        for id in self.arena.active_ids() {
            if self.arena.is_active(id) {
                self.turn(id, cycle)?;
            }
        }

        // ── ② Metrics ─────────────────────────────────────────────────────
        self.observe(cycle, observer);

        // ── ③ ④ Bookkeeping ───────────────────────────────────────────────
        self.pool.step(&mut self.world, &mut self.rng, cycle)?;
        self.arena.step();

        // ── ⑤ Clock ───────────────────────────────────────────────────────
        self.clock.advance();
        sim_log!(
            2,
            log::SIMULATION,
            cycle,
            "Cycle complete: {} dooders, {} energy",
            self.arena.active_count(),
            self.pool.len()
        );
        Ok(())
    }

    /// Set up if needed, then step until a stop condition fires.
    ///
    /// Never returns an error: the first failure is logged, the clock is
    /// stopped and the failure is reported as [`RunOutcome::Failed`].
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> RunReport {
        let outcome = match self.run_until_stopped(observer) {
            Ok(reason) => RunOutcome::Stopped(reason),
            Err(error) => self.fail(error),
        };
        let report = RunReport { outcome, summary: self.summary() };
        observer.on_stop(&report);
        report
    }

    /// Play exactly `n` cycles, setting up first if needed.  Stop conditions
    /// are not consulted.
    pub fn run_cycles<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        if self.clock.state == ClockState::Created {
            self.setup(observer)?;
        }
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Evaluate the stop conditions in registration order.  The first one
    /// that fires stops the clock and its reason is returned.
    pub fn stop_conditions(&mut self) -> Option<StopReason> {
        let view = self.view(self.clock.current);
        let reason = self.conditions.iter().find_map(|c| c.check(&view))?;
        self.halt(reason.clone());
        Some(reason)
    }

    /// Stop the run from outside.
    pub fn stop(&mut self) {
        self.halt(StopReason::Requested);
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    #[inline]
    pub fn cycle(&self) -> Cycle {
        self.clock.current
    }

    pub fn view(&self, cycle: Cycle) -> SimView<'_> {
        SimView {
            cycle,
            state: self.clock.state,
            world: &self.world,
            arena: &self.arena,
            pool: &self.pool,
        }
    }

    pub fn state(&self) -> SimState {
        SimState {
            cycle: self.clock.current,
            clock: self.clock.state,
            stop_reason: self.stop_reason.clone(),
            world: self.world.state(),
            arena: self.arena.state(),
            resources: self.pool.state(),
        }
    }

    pub fn summary(&self) -> SimSummary {
        let (dead, age_sum) = self
            .arena
            .graveyard()
            .fold((0u64, 0u64), |(n, sum), a| (n + 1, sum + u64::from(a.age)));
        let totals = self.pool.totals();
        SimSummary {
            cycles: self.clock.current.0,
            total_allocated: totals.allocated,
            total_consumed: totals.consumed,
            total_dissipated: totals.dissipated,
            starting_agents: self.starting_agents,
            ending_agents: self.arena.active_count(),
            total_created: self.arena.total_created(),
            average_age_at_death: if dead == 0 { 0.0 } else { age_sum as f64 / dead as f64 },
        }
    }

    // ── Cycle internals ───────────────────────────────────────────────────

    fn run_until_stopped<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StopReason> {
        if self.clock.state == ClockState::Created {
            self.setup(observer)?;
        }
        loop {
            if !self.clock.is_running() {
                return Ok(self.stop_reason.clone().unwrap_or(StopReason::Requested));
            }
            if let Some(reason) = self.stop_conditions() {
                return Ok(reason);
            }
            self.step(observer)?;
        }
    }

    fn observe<O: SimObserver>(&self, cycle: Cycle, observer: &mut O) {
        let view = self.view(cycle);
        observer.collect(&view);
        if self.config.is_snapshot_cycle(cycle) {
            observer.on_snapshot(&view);
        }
    }

    fn halt(&mut self, reason: StopReason) {
        if self.clock.state == ClockState::Stopped {
            return;
        }
        self.clock.stop();
        sim_log!(1, log::SIMULATION, self.clock.current, "Simulation stopped: {reason}");
        self.stop_reason = Some(reason);
    }

    fn fail(&mut self, error: SimError) -> RunOutcome {
        let cycle = if self.clock.is_running() { self.clock.current.offset(1) } else { self.clock.current };
        tracing::error!(
            scope = log::SIMULATION,
            cycle = cycle.0,
            granularity = 1u8,
            "Simulation failed: {error} ({error:?})"
        );
        self.clock.stop();
        RunOutcome::Failed { cycle, error: error.to_string() }
    }

    /// One agent's turn: age it, apply what the behavior asks for, then let
    /// it react to the agents sharing the cell it ended up on.
    fn turn(&mut self, id: AgentId, cycle: Cycle) -> SimResult<()> {
        self.arena.begin_turn(id)?;

        let intents = {
            let agent = self.arena.get_active(id)?;
            let ctx = CycleContext::new(cycle, &self.world, &self.arena, &self.pool);
            self.behavior.act(agent, &ctx, &mut self.rng)
        };
        self.apply_all(id, intents, cycle)?;

        if !self.arena.is_active(id) {
            return Ok(());
        }
        let intents = {
            let agent = self.arena.get_active(id)?;
            let ctx = CycleContext::new(cycle, &self.world, &self.arena, &self.pool);
            let others = ctx.agents_at(agent.position, id);
            if others.is_empty() {
                return Ok(());
            }
            self.behavior.on_encounter(agent, &others, &ctx, &mut self.rng)
        };
        self.apply_all(id, intents, cycle)
    }

    /// Apply intents in order, stopping once the agent is gone.
    fn apply_all(&mut self, id: AgentId, intents: Vec<Intent>, cycle: Cycle) -> SimResult<()> {
        for intent in intents {
            if !self.arena.is_active(id) {
                break;
            }
            self.apply(id, intent, cycle)?;
        }
        Ok(())
    }

    /// Apply one intent.  Requests that no longer make sense are skipped;
    /// errors from the world, arena or pool propagate.
    fn apply(&mut self, id: AgentId, intent: Intent, cycle: Cycle) -> SimResult<()> {
        let here = self.arena.get_active(id)?.position;
        match intent {
            Intent::Move(to) => {
                if self.world.in_bounds(to) && !self.world.is_neighbor(here, to, Neighborhood::Moore) {
                    ignored(cycle, id, &intent, "target is not adjacent");
                    return Ok(());
                }
                self.arena.move_agent(&mut self.world, id, to)?;
                sim_log!(3, log::DOODER, cycle, agent = id.0, "Moved {here} -> {to}");
            }
            Intent::Consume(resource) => {
                if self.world.position_of(Occupant::Resource(resource)) != Some(here) {
                    ignored(cycle, id, &intent, "energy is not on the agent's cell");
                    return Ok(());
                }
                self.pool.consume(&mut self.world, resource)?;
                self.arena.record_consumption(id)?;
                sim_log!(3, log::DOODER, cycle, agent = id.0, "Consumed energy {resource}");
            }
            Intent::Reproduce { partner } => {
                let present = partner != id
                    && self.arena.get_active(partner).is_ok_and(|p| p.position == here);
                if !present {
                    ignored(cycle, id, &intent, "partner is not an active agent on the same cell");
                    return Ok(());
                }
                self.arena.create_offspring(&mut self.world, (id, partner), cycle)?;
            }
            Intent::Die(reason) => self.arena.terminate(&mut self.world, id, reason, cycle)?,
        }
        Ok(())
    }
}

fn ignored(cycle: Cycle, id: AgentId, intent: &Intent, why: &str) {
    sim_log!(2, log::DOODER, cycle, agent = id.0, "Ignored {intent:?}: {why}");
}
