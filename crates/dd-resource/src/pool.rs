//! The resource pool.
//!
//! # Cycle boundary
//!
//! [`ResourcePool::step`] runs once per cycle, after the agents have acted
//! and metrics have been collected:
//!
//! 1. every held resource decays; the ones that run out are removed from the
//!    pool and the world,
//! 2. the per-cycle counters are reset,
//! 3. [`ResourcePool::allocate`] places the next batch.
//!
//! The counters therefore always describe the window since the last
//! boundary: what was allocated and what dissipated at that boundary, plus
//! what agents consumed since.  The dissipation count from step 1 is carried
//! over the reset for that reason.
//!
//! # Capacity
//!
//! The `MaxTotalEnergy` strategy is re-evaluated on every allocation along
//! with the rest of the pool's strategies.  Placements that would exceed it
//! are skipped without error.

use std::collections::BTreeMap;

use serde::Serialize;

use dd_core::config::attr;
use dd_core::{Coordinate, Cycle, ResourceId, SimRng, log, sim_log};
use dd_space::{Occupant, SpatialWorld};
use dd_strategy::{
    CompiledStrategySet, StrategyContext, StrategyError, StrategyKind, StrategyRegistry,
    StrategyResult, StrategySpecMap, StrategyTarget, StrategyValue,
};

use crate::error::{PoolError, PoolResult};
use crate::resource::{Resource, ResourceStatus};

// ── Settings bound by strategies ──────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoolSettings {
    pub energy_per_cycle: Option<i64>,
    /// `None` means uncapped.
    pub max_total_energy: Option<i64>,
    pub placement: Vec<Coordinate>,
    /// `None` means resources never dissipate.
    pub lifespan: Option<u32>,
}

impl StrategyTarget for PoolSettings {
    fn bind(&mut self, attribute: &str, value: StrategyValue) -> StrategyResult<()> {
        match (attribute, value) {
            (attr::ENERGY_PER_CYCLE, StrategyValue::Quantity(n)) => self.energy_per_cycle = Some(n),
            (attr::MAX_TOTAL_ENERGY, StrategyValue::Quantity(n)) => self.max_total_energy = Some(n.max(0)),
            (attr::ENERGY_PLACEMENT, StrategyValue::Placement(coords)) => self.placement = coords,
            (attr::ENERGY_LIFESPAN, StrategyValue::Quantity(n)) => {
                self.lifespan = u32::try_from(n).ok().filter(|&n| n > 0)
            }
            (attr::ENERGY_PER_CYCLE | attr::MAX_TOTAL_ENERGY | attr::ENERGY_LIFESPAN, v) => {
                return Err(StrategyError::KindMismatch {
                    attribute: attribute.to_owned(),
                    expected: StrategyKind::Generation,
                    actual: v.kind(),
                });
            }
            (attr::ENERGY_PLACEMENT, v) => {
                return Err(StrategyError::KindMismatch {
                    attribute: attribute.to_owned(),
                    expected: StrategyKind::Placement,
                    actual: v.kind(),
                });
            }
            (other, _) => return Err(StrategyError::UnknownAttribute(other.to_owned())),
        }
        Ok(())
    }
}

// ── Counters & state ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PoolCounters {
    pub allocated: u32,
    pub dissipated: u32,
    pub consumed: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoolState {
    pub available: usize,
    pub max_total_energy: Option<i64>,
    pub counters: PoolCounters,
    pub totals: PoolCounters,
    pub resources: Vec<Resource>,
}

// ── ResourcePool ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ResourcePool {
    available: BTreeMap<ResourceId, Resource>,
    counters: PoolCounters,
    /// Whole-run totals; never reset.
    totals: PoolCounters,
    next_id: ResourceId,
    strategies: CompiledStrategySet,
    settings: PoolSettings,
}

impl ResourcePool {
    pub fn new(strategies: CompiledStrategySet) -> Self {
        Self {
            available: BTreeMap::new(),
            counters: PoolCounters::default(),
            totals: PoolCounters::default(),
            next_id: ResourceId(0),
            strategies,
            settings: PoolSettings::default(),
        }
    }

    pub fn from_spec(registry: &StrategyRegistry, spec: &StrategySpecMap) -> PoolResult<Self> {
        Ok(Self::new(registry.prepare(spec)?))
    }

    /// Evaluate the pool strategies and place one resource per coordinate of
    /// the placement, stopping at the cap.  Returns how many were placed.
    pub fn allocate(&mut self, world: &mut SpatialWorld, rng: &mut SimRng, cycle: Cycle) -> PoolResult<usize> {
        {
            let mut ctx = StrategyContext::new(world, rng);
            self.strategies.apply(&mut self.settings, &mut ctx)?;
        }

        let placement = std::mem::take(&mut self.settings.placement);
        let requested = placement.len();
        let mut placed = 0;
        for at in placement {
            if self.is_full() {
                break;
            }
            let id = self.next_id;
            let mut resource = Resource::new(id, cycle, self.settings.lifespan);
            world.place_entity(&mut resource, at)?;

            self.next_id = id.next();
            self.available.insert(id, resource);
            self.counters.allocated += 1;
            self.totals.allocated += 1;
            placed += 1;
        }

        sim_log!(2, log::RESOURCES, cycle, "Allocated {placed} of {requested} energy, {} available", self.available.len());
        Ok(placed)
    }

    /// Close the cycle: decay, reset counters, allocate.
    pub fn step(&mut self, world: &mut SpatialWorld, rng: &mut SimRng, cycle: Cycle) -> PoolResult<()> {
        let expired: Vec<ResourceId> = self
            .available
            .iter_mut()
            .filter_map(|(id, r)| r.decay().then_some(*id))
            .collect();

        for &id in &expired {
            world.remove_by_id(Occupant::Resource(id))?;
            self.available.remove(&id);
        }
        if !expired.is_empty() {
            sim_log!(3, log::RESOURCES, cycle, "{} energy dissipated", expired.len());
        }

        let dissipated = expired.len() as u32;
        self.totals.dissipated += dissipated;
        self.counters = PoolCounters { dissipated, ..PoolCounters::default() };

        self.allocate(world, rng, cycle)?;
        Ok(())
    }

    /// Zero the per-cycle counters.  The cumulative totals are kept.
    pub fn reset_counters(&mut self) {
        self.counters = PoolCounters::default();
    }

    /// Drop `id` from the pool index.  The world is not touched.
    pub fn remove(&mut self, id: ResourceId) -> PoolResult<Resource> {
        self.available.remove(&id).ok_or(PoolError::ResourceNotFound(id))
    }

    /// An agent ate `id`: remove it from the world and the pool and count it.
    pub fn consume(&mut self, world: &mut SpatialWorld, id: ResourceId) -> PoolResult<Resource> {
        if !self.available.contains_key(&id) {
            return Err(PoolError::ResourceNotFound(id));
        }
        world.remove_by_id(Occupant::Resource(id))?;
        let mut resource = self.remove(id)?;
        resource.status = ResourceStatus::Consumed;
        self.counters.consumed += 1;
        self.totals.consumed += 1;
        Ok(resource)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get(&self, id: ResourceId) -> PoolResult<&Resource> {
        self.available.get(&id).ok_or(PoolError::ResourceNotFound(id))
    }

    #[inline]
    pub fn contains(&self, id: ResourceId) -> bool {
        self.available.contains_key(&id)
    }

    /// Held resources in creation order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> + '_ {
        self.available.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.available.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// `true` if the last evaluated cap has been reached.
    pub fn is_full(&self) -> bool {
        self.settings
            .max_total_energy
            .is_some_and(|cap| self.available.len() as i64 >= cap)
    }

    #[inline]
    pub fn counters(&self) -> PoolCounters {
        self.counters
    }

    #[inline]
    pub fn totals(&self) -> PoolCounters {
        self.totals
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    pub fn state(&self) -> PoolState {
        PoolState {
            available: self.available.len(),
            max_total_energy: self.settings.max_total_energy,
            counters: self.counters,
            totals: self.totals,
            resources: self.available.values().cloned().collect(),
        }
    }
}
