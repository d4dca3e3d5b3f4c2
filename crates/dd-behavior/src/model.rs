//! The `BehaviorModel` trait, the main extension point for user code.

use dd_agent::Agent;
use dd_core::{AgentId, SimRng};

use crate::{CycleContext, Intent};

/// Pluggable dooder behavior.
///
/// Only [`act`][Self::act] is required.  [`on_encounter`][Self::on_encounter]
/// has a no-op default so simple models can ignore other dooders.
///
/// Models must keep no per-agent state of their own: anything that varies
/// per agent lives on [`Agent`] and is read through the context.  The shared
/// [`SimRng`] is the only source of randomness, which keeps runs
/// reproducible from the seed.
///
/// # Example
///
/// ```rust,ignore
/// struct StandStill;
///
/// impl BehaviorModel for StandStill {
///     fn act(&self, agent: &Agent, _ctx: &CycleContext<'_>, _rng: &mut SimRng) -> Vec<Intent> {
///         if agent.hunger > 5 { vec![Intent::Die(TerminationReason::Starvation)] } else { vec![] }
///     }
/// }
/// ```
pub trait BehaviorModel: Send + Sync + 'static {
    /// Called once per active agent per cycle, after its age and hunger have
    /// been advanced.  An empty `Vec` means "do nothing".
    fn act(&self, agent: &Agent, ctx: &CycleContext<'_>, rng: &mut SimRng) -> Vec<Intent>;

    /// Called once the intents from [`act`][Self::act] have been applied,
    /// if the agent is still active and other active agents share the cell
    /// it is on now.  `agent` and `ctx` reflect those applied intents.
    /// `others` excludes the agent itself.
    fn on_encounter(
        &self,
        _agent: &Agent,
        _others: &[AgentId],
        _ctx: &CycleContext<'_>,
        _rng: &mut SimRng,
    ) -> Vec<Intent> {
        vec![]
    }
}
