//! The strategy registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dd_core::{SimRng, StrategyArgs, StrategyKind};
use dd_space::SpatialWorld;

use crate::builtin;
use crate::error::{StrategyError, StrategyResult};
use crate::value::StrategyValue;

/// What a strategy function may look at while it runs.
pub struct StrategyContext<'a> {
    pub world: &'a SpatialWorld,
    pub rng: &'a mut SimRng,
}

impl<'a> StrategyContext<'a> {
    pub fn new(world: &'a SpatialWorld, rng: &'a mut SimRng) -> Self {
        Self { world, rng }
    }
}

/// A strategy function: its arguments, the value of its dependency (if the
/// spec declares one), and the context.
pub type StrategyFn = dyn Fn(&StrategyArgs, Option<&StrategyValue>, &mut StrategyContext<'_>) -> StrategyResult<StrategyValue>
    + Send
    + Sync;

/// `(kind, name)` → strategy function.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    functions: BTreeMap<(StrategyKind, String), Arc<StrategyFn>>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every function in [`builtin`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry);
        registry
    }

    /// Register `f` under `(kind, name)`.  A later registration under the
    /// same key replaces the earlier one.
    pub fn register<F>(&mut self, kind: StrategyKind, name: impl Into<String>, f: F)
    where
        F: Fn(&StrategyArgs, Option<&StrategyValue>, &mut StrategyContext<'_>) -> StrategyResult<StrategyValue>
            + Send
            + Sync
            + 'static,
    {
        self.functions.insert((kind, name.into()), Arc::new(f));
    }

    pub fn get(&self, kind: StrategyKind, name: &str) -> StrategyResult<Arc<StrategyFn>> {
        self.functions
            .get(&(kind, name.to_owned()))
            .cloned()
            .ok_or_else(|| StrategyError::UnknownStrategy { kind, name: name.to_owned() })
    }

    pub fn contains(&self, kind: StrategyKind, name: &str) -> bool {
        self.functions.contains_key(&(kind, name.to_owned()))
    }

    /// Registered names of `kind`, sorted.
    pub fn names(&self, kind: StrategyKind) -> impl Iterator<Item = &str> + '_ {
        self.functions
            .keys()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, name)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Call a registered function directly.
    pub fn call(
        &self,
        kind: StrategyKind,
        name: &str,
        args: &StrategyArgs,
        dependency: Option<&StrategyValue>,
        ctx: &mut StrategyContext<'_>,
    ) -> StrategyResult<StrategyValue> {
        let f = self.get(kind, name)?;
        f(args, dependency, ctx)
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.functions.keys().map(|(kind, name)| format!("{kind}:{name}")))
            .finish()
    }
}
