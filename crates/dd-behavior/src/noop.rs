//! A no-op behavior model: agents never produce intents.

use dd_agent::Agent;
use dd_core::SimRng;

use crate::{BehaviorModel, CycleContext, Intent};

/// A [`BehaviorModel`] that always returns an empty intent list.
///
/// Agents only age.  Useful for tests of the cycle bookkeeping.
pub struct NoopBehavior;

impl BehaviorModel for NoopBehavior {
    fn act(&self, _agent: &Agent, _ctx: &CycleContext<'_>, _rng: &mut SimRng) -> Vec<Intent> {
        vec![]
    }
}
