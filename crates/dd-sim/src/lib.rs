//! `dd-sim`: the cycle loop for dooders.
//!
//! # One cycle
//!
//! ```text
//! setup (cycle 0):
//!   allocate resources → seed population → Running → collect metrics
//!
//! step (cycle n):
//!   1. Turns:   for each agent active at the start of the cycle, in
//!               creation order: age + hunger, BehaviorModel::act and
//!               apply, then on_encounter with the new cell-mates and apply.
//!   2. Metrics: SimObserver::collect (and on_snapshot on snapshot cycles).
//!   3. Pool:    ResourcePool::step: decay, counter reset, allocate.
//!   4. Arena:   Arena::step: counter reset.
//!   5. Clock:   cycle += 1.
//!
//! run:
//!   setup if needed, then step until a StopCondition fires.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dd_behavior::Forager;
//! use dd_core::SimConfig;
//! use dd_sim::{MetricsRecorder, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), Forager::default()).build()?;
//! let mut metrics = MetricsRecorder::default();
//! let report = sim.run(&mut metrics);
//! println!("{:?} after {} cycles", report.outcome, report.summary.cycles);
//! ```

pub mod builder;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod sim;
pub mod stop;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use metrics::{CycleMetrics, MetricsRecorder};
pub use observer::{NoopObserver, SimObserver, SimView};
pub use sim::{RunOutcome, RunReport, Sim, SimState, SimSummary};
pub use stop::{Extinction, MaxCycles, StopCondition, StopReason};
