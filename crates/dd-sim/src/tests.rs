//! Integration tests for dd-sim.

#[cfg(test)]
mod helpers {
    use dd_agent::Agent;
    use dd_behavior::{BehaviorModel, CycleContext, Intent};
    use dd_core::config::attr;
    use dd_core::{AgentId, Coordinate, SimConfig, SimRng, StopSettings, StrategySpec, StrategySpecMap, WorldSettings};

    use crate::{RunReport, SimObserver, SimView};

    /// `agents` dooders spread over a `side`×`side` grid; `per_cycle` energy
    /// per allocation capped at `cap`.
    pub fn config(side: i32, agents: f64, per_cycle: f64, cap: f64, max_cycles: u64) -> SimConfig {
        SimConfig {
            seed: 7,
            world: WorldSettings { width: side, height: side, torus: false },
            stop: StopSettings { max_cycles: Some(max_cycles), stop_on_extinction: true },
            arena: StrategySpecMap::new()
                .with(attr::SEED_COUNT, StrategySpec::generation("fixed_value").arg("value", agents))
                .with(attr::SEED_PLACEMENT, StrategySpec::placement("grid_spread").depends_on(attr::SEED_COUNT)),
            resources: StrategySpecMap::new()
                .with(attr::ENERGY_PER_CYCLE, StrategySpec::generation("fixed_value").arg("value", per_cycle))
                .with(attr::MAX_TOTAL_ENERGY, StrategySpec::generation("fixed_value").arg("value", cap))
                .with(
                    attr::ENERGY_PLACEMENT,
                    StrategySpec::placement("random_location").depends_on(attr::ENERGY_PER_CYCLE),
                ),
            output_interval_cycles: 2,
        }
    }

    /// A behavior defined by a plain function.
    pub struct Scripted(pub fn(&Agent, &CycleContext<'_>) -> Vec<Intent>);

    impl BehaviorModel for Scripted {
        fn act(&self, agent: &Agent, ctx: &CycleContext<'_>, _rng: &mut SimRng) -> Vec<Intent> {
            (self.0)(agent, ctx)
        }
    }

    /// Reproduces with whoever it meets.
    pub struct Breeder;

    impl BehaviorModel for Breeder {
        fn act(&self, _agent: &Agent, _ctx: &CycleContext<'_>, _rng: &mut SimRng) -> Vec<Intent> {
            vec![]
        }

        fn on_encounter(
            &self,
            _agent: &Agent,
            others: &[AgentId],
            _ctx: &CycleContext<'_>,
            _rng: &mut SimRng,
        ) -> Vec<Intent> {
            vec![Intent::Reproduce { partner: others[0] }]
        }
    }

    /// Records every callback.
    #[derive(Default)]
    pub struct Tape {
        pub positions: Vec<Vec<(AgentId, Coordinate)>>,
        pub snapshots: Vec<u64>,
        pub reports: Vec<RunReport>,
    }

    impl SimObserver for Tape {
        fn collect(&mut self, view: &SimView<'_>) {
            self.positions.push(view.arena.active().map(|a| (a.id, a.position)).collect());
        }

        fn on_snapshot(&mut self, view: &SimView<'_>) {
            self.snapshots.push(view.cycle.0);
        }

        fn on_stop(&mut self, report: &RunReport) {
            self.reports.push(report.clone());
        }
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use dd_agent::ArenaError;
    use dd_behavior::NoopBehavior;
    use dd_core::{SimConfig, StopSettings, StrategySpec};
    use dd_space::SpaceError;
    use dd_strategy::StrategyError;

    use super::helpers::config;
    use crate::{SimBuilder, SimError};

    #[test]
    fn builds_from_defaults() {
        let sim = SimBuilder::new(SimConfig::default(), NoopBehavior).build().unwrap();
        assert_eq!(sim.world.width(), 10);
        assert_eq!(sim.arena.active_count(), 0);
        assert!(sim.pool.is_empty());
    }

    #[test]
    fn rejects_bad_dimensions() {
        let mut cfg = config(5, 3.0, 5.0, 2.0, 10);
        cfg.world.width = 0;
        assert!(matches!(
            SimBuilder::new(cfg, NoopBehavior).build(),
            Err(SimError::Space(SpaceError::InvalidDimensions { width: 0, height: 5 }))
        ));
    }

    #[test]
    fn needs_some_stop_condition() {
        let mut cfg = config(5, 3.0, 5.0, 2.0, 10);
        cfg.stop = StopSettings { max_cycles: None, stop_on_extinction: false };
        assert!(matches!(SimBuilder::new(cfg.clone(), NoopBehavior).build(), Err(SimError::Config(_))));

        let sim = SimBuilder::new(cfg, NoopBehavior)
            .stop_condition(Box::new(crate::MaxCycles(1)))
            .build();
        assert!(sim.is_ok());
    }

    #[test]
    fn unknown_strategy_surfaces_at_build() {
        let mut cfg = config(5, 3.0, 5.0, 2.0, 10);
        cfg.arena.insert("SeedCount", StrategySpec::generation("no_such_function"));
        assert!(matches!(
            SimBuilder::new(cfg, NoopBehavior).build(),
            Err(SimError::Arena(ArenaError::Strategy(StrategyError::UnknownStrategy { .. })))
        ));
    }
}

// ── Cycle bookkeeping ─────────────────────────────────────────────────────────

#[cfg(test)]
mod cycle {
    use dd_agent::ArenaCounters;
    use dd_behavior::NoopBehavior;
    use dd_core::{ClockState, Cycle};
    use dd_resource::PoolCounters;

    use super::helpers::config;
    use crate::{CycleMetrics, MetricsRecorder, NoopObserver, SimBuilder, SimError};

    #[test]
    fn setup_then_one_quiet_step() {
        let mut sim = SimBuilder::new(config(5, 3.0, 5.0, 2.0, 10), NoopBehavior).build().unwrap();
        let mut metrics = MetricsRecorder::default();

        sim.setup(&mut metrics).unwrap();
        assert_eq!(sim.clock.state, ClockState::Running);
        assert_eq!(sim.cycle(), Cycle(0));
        assert_eq!(sim.arena.active_count(), 3);
        assert_eq!(sim.pool.len(), 2);
        assert_eq!(sim.world.occupant_count(), 5);

        sim.step(&mut metrics).unwrap();
        assert_eq!(sim.cycle(), Cycle(1));
        assert_eq!(sim.arena.counters(), ArenaCounters::default());
        // Still at the cap, so the boundary allocation placed nothing.
        assert_eq!(sim.pool.counters(), PoolCounters::default());
        assert_eq!(sim.pool.len(), 2);

        assert_eq!(
            metrics.rows(),
            [
                CycleMetrics {
                    cycle: Cycle(0),
                    active: 3,
                    created: 3,
                    terminated: 0,
                    resources: 2,
                    allocated: 2,
                    consumed: 0,
                    dissipated: 0,
                },
                CycleMetrics {
                    cycle: Cycle(1),
                    active: 3,
                    created: 0,
                    terminated: 0,
                    resources: 2,
                    allocated: 0,
                    consumed: 0,
                    dissipated: 0,
                },
            ]
        );
    }

    #[test]
    fn agents_age_once_per_cycle() {
        let mut sim = SimBuilder::new(config(5, 3.0, 0.0, 0.0, 10), NoopBehavior).build().unwrap();
        sim.run_cycles(4, &mut NoopObserver).unwrap();
        assert!(sim.arena.active().all(|a| a.age == 4 && a.hunger == 4));
    }

    #[test]
    fn clock_state_is_enforced() {
        let mut sim = SimBuilder::new(config(5, 3.0, 5.0, 2.0, 10), NoopBehavior).build().unwrap();
        assert!(matches!(sim.step(&mut NoopObserver), Err(SimError::NotRunning(ClockState::Created))));
        sim.setup(&mut NoopObserver).unwrap();
        assert!(matches!(sim.setup(&mut NoopObserver), Err(SimError::AlreadySetUp)));
        sim.stop();
        assert!(matches!(sim.step(&mut NoopObserver), Err(SimError::NotRunning(ClockState::Stopped))));
    }

    #[test]
    fn state_serializes() {
        let mut sim = SimBuilder::new(config(5, 3.0, 5.0, 2.0, 10), NoopBehavior).build().unwrap();
        sim.run_cycles(1, &mut NoopObserver).unwrap();
        let json = serde_json::to_value(sim.state()).unwrap();
        assert_eq!(json["cycle"], 1);
        assert_eq!(json["clock"], "Running");
        assert_eq!(json["arena"]["active"].as_array().unwrap().len(), 3);
        assert_eq!(json["resources"]["available"], 2);
    }
}

// ── Intents ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod intents {
    use dd_agent::TerminationReason;
    use dd_behavior::{Forager, ForagerSettings, Intent};
    use dd_core::{AgentId, Coordinate, ResourceId};

    use super::helpers::{Breeder, Scripted, config};
    use crate::{MetricsRecorder, NoopObserver, SimBuilder};

    #[test]
    fn invalid_requests_are_skipped() {
        let behavior = Scripted(|agent, _| {
            vec![
                Intent::Move(agent.position.offset(2, 0)),
                Intent::Move(agent.position),
                Intent::Consume(ResourceId(99)),
                Intent::Reproduce { partner: agent.id },
                Intent::Reproduce { partner: AgentId(77) },
            ]
        });
        // One agent in the corner of a 5x5 grid, no energy.
        let mut sim = SimBuilder::new(config(5, 1.0, 0.0, 0.0, 10), behavior).build().unwrap();
        sim.run_cycles(2, &mut NoopObserver).unwrap();
        let agent = sim.arena.get(AgentId(0)).unwrap();
        assert_eq!(agent.position, Coordinate::new(0, 0));
        assert_eq!(agent.move_count, 0);
        assert_eq!(sim.arena.total_created(), 1);
        assert!(sim.world.is_consistent());
    }

    #[test]
    fn moves_keep_world_and_agent_in_step() {
        let behavior = Scripted(|agent, ctx| {
            let to = agent.position.offset(1, 1);
            if ctx.world.in_bounds(to) { vec![Intent::Move(to)] } else { vec![] }
        });
        let mut sim = SimBuilder::new(config(5, 1.0, 0.0, 0.0, 10), behavior).build().unwrap();
        sim.run_cycles(6, &mut NoopObserver).unwrap();
        let agent = sim.arena.get(AgentId(0)).unwrap();
        assert_eq!(agent.position, Coordinate::new(4, 4));
        assert_eq!(agent.move_count, 4);
        assert_eq!(sim.world.position_of(dd_space::Occupant::Agent(AgentId(0))), Some(agent.position));
    }

    #[test]
    fn die_then_nothing_else() {
        let behavior = Scripted(|agent, _| {
            vec![Intent::Die(TerminationReason::Starvation), Intent::Move(agent.position.offset(1, 0))]
        });
        let mut sim = SimBuilder::new(config(5, 2.0, 0.0, 0.0, 10), behavior).build().unwrap();
        let mut metrics = MetricsRecorder::default();
        sim.run_cycles(1, &mut metrics).unwrap();
        assert!(sim.arena.is_extinct());
        assert_eq!(sim.arena.terminated_count(), 2);
        assert_eq!(metrics.last().unwrap().terminated, 2);
        assert!(sim.arena.graveyard().all(|a| a.move_count == 0));
        assert_eq!(sim.world.occupant_count(), 0);
    }

    #[test]
    fn offspring_wait_for_the_next_cycle() {
        // A single cell, so both seeded agents share it.
        let mut sim = SimBuilder::new(config(1, 2.0, 0.0, 0.0, 10), Breeder).build().unwrap();
        let mut metrics = MetricsRecorder::default();
        sim.run_cycles(1, &mut metrics).unwrap();

        // Each parent bred once; the children did not act yet.
        assert_eq!(sim.arena.active_count(), 4);
        assert_eq!(metrics.last().unwrap().created, 2);
        let child = sim.arena.get(AgentId(2)).unwrap();
        assert_eq!(child.generation, 1);
        assert_eq!(child.age, 0);
        let children: Vec<_> = sim.arena.relations().children_of(AgentId(0)).collect();
        assert_eq!(children, [AgentId(2), AgentId(3)]);
    }

    #[test]
    fn foragers_breed_with_whoever_is_on_the_cell_they_moved_to() {
        // A 2x1 strip with no energy: dooder 0 has one neighbor, the cell
        // dooder 1 stands on, so its random step walks into it.
        let mut cfg = config(2, 2.0, 0.0, 0.0, 10);
        cfg.world.height = 1;
        let forager = Forager::new(ForagerSettings { reproduction_probability: 1.0, ..ForagerSettings::default() })
            .unwrap();
        let mut sim = SimBuilder::new(cfg, forager).build().unwrap();
        let mut metrics = MetricsRecorder::default();
        sim.run_cycles(1, &mut metrics).unwrap();

        assert_eq!(sim.arena.active_count(), 3);
        assert_eq!(metrics.last().unwrap().created, 1);
        let child = sim.arena.get(AgentId(2)).unwrap();
        assert_eq!(child.position, Coordinate::new(1, 0));
        assert_eq!(child.generation, 1);
        let children: Vec<_> = sim.arena.relations().children_of(AgentId(0)).collect();
        assert_eq!(children, [AgentId(2)]);
        // Dooder 1 stepped onto the empty cell and met nobody.
        assert_eq!(sim.arena.get(AgentId(1)).unwrap().position, Coordinate::new(0, 0));
        assert!(sim.world.is_consistent());
    }

    #[test]
    fn foragers_eat() {
        let mut cfg = config(3, 1.0, 9.0, 9.0, 10);
        cfg.seed = 1;
        let mut sim = SimBuilder::new(cfg, Forager::default()).build().unwrap();
        sim.run_cycles(3, &mut NoopObserver).unwrap();
        let agent = sim.arena.get(AgentId(0)).unwrap();
        assert!(agent.energy_consumed >= 1);
        assert!(agent.hunger < 3);
        assert_eq!(sim.pool.totals().consumed, agent.energy_consumed);
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use dd_agent::TerminationReason;
    use dd_behavior::{Forager, Intent, NoopBehavior};
    use dd_core::{ClockState, Cycle, SimConfig};

    use super::helpers::{Scripted, Tape, config};
    use crate::{MetricsRecorder, RunOutcome, SimBuilder, SimView, StopCondition, StopReason};

    #[test]
    fn stops_at_max_cycles() {
        let mut sim = SimBuilder::new(config(5, 3.0, 5.0, 2.0, 5), NoopBehavior).build().unwrap();
        let mut tape = Tape::default();
        let report = sim.run(&mut tape);

        assert_eq!(report.outcome, RunOutcome::Stopped(StopReason::MaxCycles(5)));
        assert_eq!(report.summary.cycles, 5);
        assert_eq!(sim.clock.state, ClockState::Stopped);
        assert_eq!(sim.stop_reason(), Some(&StopReason::MaxCycles(5)));
        assert_eq!(tape.positions.len(), 6);
        assert_eq!(tape.snapshots, [0, 2, 4]);
        assert_eq!(tape.reports, [report]);
    }

    #[test]
    fn stops_on_extinction() {
        let behavior = Scripted(|_, _| vec![Intent::Die(TerminationReason::OldAge)]);
        let mut sim = SimBuilder::new(config(5, 4.0, 0.0, 0.0, 50), behavior).build().unwrap();
        let report = sim.run(&mut MetricsRecorder::default());

        assert_eq!(report.outcome, RunOutcome::Stopped(StopReason::Extinction));
        assert_eq!(report.summary.cycles, 1);
        assert_eq!(report.summary.starting_agents, 4);
        assert_eq!(report.summary.ending_agents, 0);
        assert_eq!(report.summary.average_age_at_death, 1.0);
    }

    struct Crowded(usize);

    impl StopCondition for Crowded {
        fn check(&self, view: &SimView<'_>) -> Option<StopReason> {
            (view.arena.active_count() >= self.0).then(|| StopReason::Custom("crowded".into()))
        }
    }

    #[test]
    fn custom_condition_runs_after_configured_ones() {
        let mut sim = SimBuilder::new(config(5, 3.0, 0.0, 0.0, 0), NoopBehavior)
            .stop_condition(Box::new(Crowded(1)))
            .build()
            .unwrap();
        // MaxCycles(0) is registered first and wins.
        let report = sim.run(&mut MetricsRecorder::default());
        assert_eq!(report.outcome, RunOutcome::Stopped(StopReason::MaxCycles(0)));

        let mut cfg = config(5, 3.0, 0.0, 0.0, 10);
        cfg.stop.max_cycles = None;
        let mut sim = SimBuilder::new(cfg, NoopBehavior).stop_condition(Box::new(Crowded(3))).build().unwrap();
        let report = sim.run(&mut MetricsRecorder::default());
        assert_eq!(report.outcome, RunOutcome::Stopped(StopReason::Custom("crowded".into())));
        assert_eq!(report.summary.cycles, 0);
    }

    #[test]
    fn failure_becomes_a_halted_run() {
        // Stepping off the grid is a core error, not an ignorable intent.
        let behavior = Scripted(|agent, _| vec![Intent::Move(agent.position.offset(-1, 0))]);
        let mut sim = SimBuilder::new(config(5, 1.0, 0.0, 0.0, 10), behavior).build().unwrap();
        let mut tape = Tape::default();
        let report = sim.run(&mut tape);

        match &report.outcome {
            RunOutcome::Failed { cycle, error } => {
                assert_eq!(*cycle, Cycle(1));
                assert!(error.contains("outside the 5x5 grid"), "{error}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(report.is_failure());
        assert_eq!(sim.clock.state, ClockState::Stopped);
        assert_eq!(tape.reports.len(), 1);
    }

    #[test]
    fn same_seed_same_run() {
        let cfg = SimConfig { seed: 1234, ..SimConfig::default() };
        let mut a = SimBuilder::new(cfg.clone(), Forager::default()).build().unwrap();
        let mut b = SimBuilder::new(cfg, Forager::default()).build().unwrap();
        let (mut ta, mut tb) = (Tape::default(), Tape::default());

        let ra = a.run(&mut ta);
        let rb = b.run(&mut tb);
        assert_eq!(ra, rb);
        assert_eq!(ta.positions, tb.positions);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn metrics_account_for_every_event() {
        let cfg = SimConfig { seed: 99, ..SimConfig::default() };
        let mut sim = SimBuilder::new(cfg, Forager::default()).build().unwrap();
        let mut metrics = MetricsRecorder::default();
        let report = sim.run(&mut metrics);
        assert!(!report.is_failure());

        let rows = metrics.rows();
        let sum = |f: fn(&crate::CycleMetrics) -> u64| rows.iter().map(f).sum::<u64>();
        assert_eq!(sum(|m| m.created as u64), sim.arena.total_created());
        assert_eq!(sum(|m| m.consumed as u64), u64::from(report.summary.total_consumed));
        // The last boundary allocation happens after the last collection.
        assert_eq!(
            sum(|m| m.allocated as u64) + u64::from(sim.pool.counters().allocated),
            u64::from(report.summary.total_allocated)
        );
        assert_eq!(
            sim.world.occupant_count(),
            sim.arena.active_count() + sim.pool.len()
        );
        assert!(sim.world.is_consistent());
    }
}
