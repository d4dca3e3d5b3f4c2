//! Compiling a [`StrategySpecMap`] against a registry.
//!
//! Compilation is split in two so configuration problems surface when the
//! simulation is built, not mid-run:
//!
//! 1. [`StrategyRegistry::prepare`] resolves every function, checks that
//!    every dependency names a declared attribute, and orders the entries
//!    so each dependency is evaluated before its dependents.  No RNG draws.
//! 2. [`CompiledStrategySet::apply`] evaluates the ordered entries and binds
//!    each value onto a [`StrategyTarget`].  Models call this whenever they
//!    need fresh values (the resource pool does so every allocation).
//!
//! [`StrategyRegistry::compile`] does both in one call.

use std::sync::Arc;

use dd_core::{StrategyArgs, StrategyKind, StrategySpecMap};

use crate::error::{StrategyError, StrategyResult};
use crate::registry::{StrategyContext, StrategyFn, StrategyRegistry};
use crate::value::StrategyValue;

/// A model that strategy values can be bound onto by attribute name.
pub trait StrategyTarget {
    /// `UnknownAttribute` if the model has no such attribute,
    /// `KindMismatch` if the value has the wrong shape for it.
    fn bind(&mut self, attribute: &str, value: StrategyValue) -> StrategyResult<()>;
}

struct CompiledStrategy {
    attribute: String,
    kind: StrategyKind,
    args: StrategyArgs,
    /// Position of the dependency in `steps`; always earlier than this one.
    dependency: Option<usize>,
    func: Arc<StrategyFn>,
}

/// A validated, dependency-ordered strategy map.
#[derive(Default)]
pub struct CompiledStrategySet {
    steps: Vec<CompiledStrategy>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

impl StrategyRegistry {
    /// Validate `spec` and order it for evaluation.
    pub fn prepare(&self, spec: &StrategySpecMap) -> StrategyResult<CompiledStrategySet> {
        let entries: Vec<_> = spec.iter().collect();

        let mut funcs = Vec::with_capacity(entries.len());
        let mut deps = Vec::with_capacity(entries.len());
        for (attribute, s) in &entries {
            funcs.push(self.get(s.kind, &s.function)?);
            let dep = match &s.dependency {
                None => None,
                Some(d) => Some(entries.iter().position(|(name, _)| *name == d.as_str()).ok_or_else(|| {
                    StrategyError::UnknownDependency {
                        attribute: (*attribute).to_owned(),
                        dependency: d.clone(),
                    }
                })?),
            };
            deps.push(dep);
        }

        let mut marks = vec![Mark::Unvisited; entries.len()];
        let mut order = Vec::with_capacity(entries.len());
        let mut stack = Vec::new();
        for i in 0..entries.len() {
            visit(i, &deps, &mut marks, &mut order, &mut stack, &entries)?;
        }

        // Position of each declared entry within `order`.
        let mut slot = vec![0usize; entries.len()];
        for (pos, &i) in order.iter().enumerate() {
            slot[i] = pos;
        }

        let steps = order
            .iter()
            .map(|&i| {
                let (attribute, s) = entries[i];
                CompiledStrategy {
                    attribute: attribute.to_owned(),
                    kind: s.kind,
                    args: s.args.clone(),
                    dependency: deps[i].map(|d| slot[d]),
                    func: Arc::clone(&funcs[i]),
                }
            })
            .collect();

        Ok(CompiledStrategySet { steps })
    }

    /// Validate `spec`, evaluate it once, and bind the values onto `model`.
    /// Returns the compiled set for later re-evaluation.
    pub fn compile<T: StrategyTarget + ?Sized>(
        &self,
        model: &mut T,
        spec: &StrategySpecMap,
        ctx: &mut StrategyContext<'_>,
    ) -> StrategyResult<CompiledStrategySet> {
        let set = self.prepare(spec)?;
        set.apply(model, ctx)?;
        Ok(set)
    }
}

/// Depth-first walk along the dependency chain of entry `i`.  Dependencies
/// land in `order` before their dependents; independent entries keep
/// declaration order.
fn visit(
    i: usize,
    deps: &[Option<usize>],
    marks: &mut [Mark],
    order: &mut Vec<usize>,
    stack: &mut Vec<usize>,
    entries: &[(&str, &dd_core::StrategySpec)],
) -> StrategyResult<()> {
    match marks[i] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            let start = stack.iter().position(|&j| j == i).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..].iter().map(|&j| entries[j].0.to_owned()).collect();
            cycle.push(entries[i].0.to_owned());
            return Err(StrategyError::CyclicDependency(cycle));
        }
        Mark::Unvisited => {}
    }

    marks[i] = Mark::Visiting;
    stack.push(i);
    if let Some(d) = deps[i] {
        visit(d, deps, marks, order, stack, entries)?;
    }
    stack.pop();
    marks[i] = Mark::Done;
    order.push(i);
    Ok(())
}

impl CompiledStrategySet {
    /// Run every strategy in dependency order.  Returns `(attribute, value)`
    /// pairs in evaluation order.
    pub fn evaluate(&self, ctx: &mut StrategyContext<'_>) -> StrategyResult<Vec<(String, StrategyValue)>> {
        let mut values: Vec<StrategyValue> = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let dep = step.dependency.map(|d| &values[d]);
            let value = (step.func)(&step.args, dep, ctx)?;
            if value.kind() != step.kind {
                return Err(StrategyError::KindMismatch {
                    attribute: step.attribute.clone(),
                    expected: step.kind,
                    actual: value.kind(),
                });
            }
            values.push(value);
        }
        Ok(self.steps.iter().map(|s| s.attribute.clone()).zip(values).collect())
    }

    /// Evaluate and bind every value onto `model`.
    pub fn apply<T: StrategyTarget + ?Sized>(
        &self,
        model: &mut T,
        ctx: &mut StrategyContext<'_>,
    ) -> StrategyResult<()> {
        for (attribute, value) in self.evaluate(ctx)? {
            model.bind(&attribute, value)?;
        }
        Ok(())
    }

    /// Attribute names in evaluation order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|s| s.attribute.as_str())
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.steps.iter().any(|s| s.attribute == attribute)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for CompiledStrategySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.attributes()).finish()
    }
}
