//! Run configuration.
//!
//! A [`SimConfig`] is plain data: world dimensions, the stop settings, and
//! one [`StrategySpecMap`] per model (arena, resources) describing how each
//! model attribute is generated.  It is usually loaded from JSON by the
//! application and handed to the simulation builder, which compiles the
//! strategy maps against a registry.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DdError, DdResult};

/// Attribute names the built-in models bind strategy values to.
pub mod attr {
    pub const SEED_COUNT: &str = "SeedCount";
    pub const SEED_PLACEMENT: &str = "SeedPlacement";
    pub const GENETICS: &str = "Genetics";

    pub const ENERGY_PER_CYCLE: &str = "EnergyPerCycle";
    pub const MAX_TOTAL_ENERGY: &str = "MaxTotalEnergy";
    pub const ENERGY_PLACEMENT: &str = "EnergyPlacement";
    pub const ENERGY_LIFESPAN: &str = "EnergyLifespan";
}

// ── Strategy specs ────────────────────────────────────────────────────────────

/// The three strategy scopes.  A strategy's kind fixes the shape of the value
/// it produces.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Produces a single integer quantity.
    Generation,
    /// Produces a list of coordinates.
    Placement,
    /// Produces an opaque genome seed.
    Genetics,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategyKind::Generation => "Generation",
            StrategyKind::Placement => "Placement",
            StrategyKind::Genetics => "Genetics",
        };
        f.write_str(s)
    }
}

/// Named numeric arguments passed to a strategy function.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyArgs(pub BTreeMap<String, f64>);

impl StrategyArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One attribute's generation recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategySpec {
    #[serde(rename = "type")]
    pub kind: StrategyKind,
    pub function: String,
    #[serde(default, skip_serializing_if = "StrategyArgs::is_empty")]
    pub args: StrategyArgs,
    /// Attribute whose value is passed to `function` as an extra input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
}

impl StrategySpec {
    pub fn new(kind: StrategyKind, function: impl Into<String>) -> Self {
        Self {
            kind,
            function: function.into(),
            args: StrategyArgs::new(),
            dependency: None,
        }
    }

    pub fn generation(function: impl Into<String>) -> Self {
        Self::new(StrategyKind::Generation, function)
    }

    pub fn placement(function: impl Into<String>) -> Self {
        Self::new(StrategyKind::Placement, function)
    }

    pub fn genetics(function: impl Into<String>) -> Self {
        Self::new(StrategyKind::Genetics, function)
    }

    pub fn arg(mut self, name: impl Into<String>, value: f64) -> Self {
        self.args.set(name, value);
        self
    }

    pub fn depends_on(mut self, attribute: impl Into<String>) -> Self {
        self.dependency = Some(attribute.into());
        self
    }
}

/// Attribute name → [`StrategySpec`], kept in declaration order.
///
/// Declaration order matters: dependency-free entries are evaluated in this
/// order, and every evaluation may draw from the simulation RNG.  JSON
/// objects are read in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategySpecMap(Vec<(String, StrategySpec)>);

impl StrategySpecMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace.  A replaced entry keeps its original position.
    pub fn insert(&mut self, attribute: impl Into<String>, spec: StrategySpec) {
        let attribute = attribute.into();
        match self.0.iter_mut().find(|(name, _)| *name == attribute) {
            Some(slot) => slot.1 = spec,
            None => self.0.push((attribute, spec)),
        }
    }

    pub fn with(mut self, attribute: impl Into<String>, spec: StrategySpec) -> Self {
        self.insert(attribute, spec);
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&StrategySpec> {
        self.0.iter().find(|(name, _)| name == attribute).map(|(_, s)| s)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StrategySpec)> {
        self.0.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Seed population: 10–19 dooders at random cells, each with a random
    /// genome.
    pub fn default_arena() -> Self {
        Self::new()
            .with(
                attr::SEED_COUNT,
                StrategySpec::generation("uniform_distribution").arg("low", 10.0).arg("high", 20.0),
            )
            .with(
                attr::SEED_PLACEMENT,
                StrategySpec::placement("random_location").depends_on(attr::SEED_COUNT),
            )
            .with(attr::GENETICS, StrategySpec::genetics("random_genetics"))
    }

    /// 5–9 energy units per cycle at random cells, capped at 20–29 units in
    /// total, each lasting 10 cycles.
    pub fn default_resources() -> Self {
        Self::new()
            .with(
                attr::ENERGY_PER_CYCLE,
                StrategySpec::generation("uniform_distribution").arg("low", 5.0).arg("high", 10.0),
            )
            .with(
                attr::MAX_TOTAL_ENERGY,
                StrategySpec::generation("uniform_distribution").arg("low", 20.0).arg("high", 30.0),
            )
            .with(
                attr::ENERGY_PLACEMENT,
                StrategySpec::placement("random_location").depends_on(attr::ENERGY_PER_CYCLE),
            )
            .with(
                attr::ENERGY_LIFESPAN,
                StrategySpec::generation("fixed_value").arg("value", 10.0),
            )
    }
}

impl Serialize for StrategySpecMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, spec) in &self.0 {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StrategySpecMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecMapVisitor;

        impl<'de> Visitor<'de> for SpecMapVisitor {
            type Value = StrategySpecMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute name to strategy spec")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = StrategySpecMap::new();
                while let Some((name, spec)) = access.next_entry::<String, StrategySpec>()? {
                    if out.contains(&name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate strategy attribute `{name}`"
                        )));
                    }
                    out.0.push((name, spec));
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(SpecMapVisitor)
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSettings {
    pub width: i32,
    pub height: i32,
    /// Wrap the grid edges.
    #[serde(default)]
    pub torus: bool,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self { width: 10, height: 10, torus: false }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopSettings {
    /// Stop once this many cycles have completed.  `None` means no limit.
    #[serde(default)]
    pub max_cycles: Option<u64>,
    /// Stop when no active agents remain.
    #[serde(default = "default_true")]
    pub stop_on_extinction: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StopSettings {
    fn default() -> Self {
        Self { max_cycles: Some(100), stop_on_extinction: true }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master RNG seed.  The same seed and settings always reproduce the
    /// same run.
    pub seed: u64,

    #[serde(default)]
    pub world: WorldSettings,

    #[serde(default)]
    pub stop: StopSettings,

    /// Strategies bound onto the arena (seed population).
    #[serde(default = "StrategySpecMap::default_arena")]
    pub arena: StrategySpecMap,

    /// Strategies bound onto the resource pool.
    #[serde(default = "StrategySpecMap::default_resources")]
    pub resources: StrategySpecMap,

    /// Observers get a full snapshot every N cycles.  0 disables snapshots.
    #[serde(default = "default_output_interval")]
    pub output_interval_cycles: u64,
}

fn default_output_interval() -> u64 {
    1
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world: WorldSettings::default(),
            stop: StopSettings::default(),
            arena: StrategySpecMap::default_arena(),
            resources: StrategySpecMap::default_resources(),
            output_interval_cycles: default_output_interval(),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> DdResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DdResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> DdResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings no run could start from.
    pub fn validate(&self) -> DdResult<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(DdError::Config(format!(
                "world dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.stop.max_cycles.is_none() && !self.stop.stop_on_extinction {
            return Err(DdError::Config(
                "no stop condition configured: set stop.max_cycles or stop.stop_on_extinction".into(),
            ));
        }
        Ok(())
    }

    /// Whether observers should receive a snapshot after `cycle`.
    #[inline]
    pub fn is_snapshot_cycle(&self, cycle: crate::Cycle) -> bool {
        self.output_interval_cycles > 0 && cycle.0 % self.output_interval_cycles == 0
    }
}
