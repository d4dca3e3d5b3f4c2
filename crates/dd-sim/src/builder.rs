//! Fluent builder for constructing a [`Sim`].

use dd_agent::Arena;
use dd_behavior::BehaviorModel;
use dd_core::{SimClock, SimConfig, SimRng};
use dd_resource::ResourcePool;
use dd_space::SpatialWorld;
use dd_strategy::StrategyRegistry;

use crate::{Extinction, MaxCycles, Sim, SimError, SimResult, StopCondition};

/// Fluent builder for [`Sim<B>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, world size, stop settings, strategy specs
/// - `B: BehaviorModel`: what the dooders do
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                   |
/// |-------------------------|-------------------------------------------|
/// | `.registry(r)`          | `StrategyRegistry::with_builtins()`       |
/// | `.stop_condition(c)`    | only the conditions from `config.stop`    |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, Forager::default())
///     .stop_condition(Box::new(MaxCycles(10)))
///     .build()?;
/// ```
pub struct SimBuilder<B: BehaviorModel> {
    config: SimConfig,
    behavior: B,
    registry: Option<StrategyRegistry>,
    extra_conditions: Vec<Box<dyn StopCondition>>,
}

impl<B: BehaviorModel> SimBuilder<B> {
    pub fn new(config: SimConfig, behavior: B) -> Self {
        Self { config, behavior, registry: None, extra_conditions: Vec::new() }
    }

    /// Use `registry` instead of the built-in strategies, e.g. to add custom
    /// generation or placement functions.
    pub fn registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Add a stop condition on top of the ones `config.stop` describes.
    pub fn stop_condition(mut self, condition: Box<dyn StopCondition>) -> Self {
        self.extra_conditions.push(condition);
        self
    }

    /// Build the world, resolve every strategy spec and return a [`Sim`]
    /// ready for setup.  Fails on non-positive dimensions, bad strategy specs,
    /// or when no stop condition is configured at all.
    pub fn build(self) -> SimResult<Sim<B>> {
        let config = self.config;
        let registry = self.registry.unwrap_or_else(StrategyRegistry::with_builtins);
        let world = SpatialWorld::build(config.world.width, config.world.height, config.world.torus)?;
        let arena = Arena::from_spec(&registry, &config.arena)?;
        let pool = ResourcePool::from_spec(&registry, &config.resources)?;

        let mut conditions: Vec<Box<dyn StopCondition>> = Vec::new();
        if let Some(n) = config.stop.max_cycles {
            conditions.push(Box::new(MaxCycles(n)));
        }
        if config.stop.stop_on_extinction {
            conditions.push(Box::new(Extinction));
        }
        conditions.extend(self.extra_conditions);
        if conditions.is_empty() {
            return Err(SimError::Config("no stop condition configured".into()));
        }

        Ok(Sim::from_parts(
            SimClock::new(),
            SimRng::new(config.seed),
            config,
            world,
            arena,
            pool,
            self.behavior,
            conditions,
        ))
    }
}
