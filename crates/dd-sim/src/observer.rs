//! Simulation observer trait for metrics collection and output.

use dd_agent::Arena;
use dd_core::{ClockState, Cycle};
use dd_resource::ResourcePool;
use dd_space::SpatialWorld;

use crate::RunReport;

/// Read-only view of the whole simulation, handed to observers and stop
/// conditions.
#[derive(Clone, Copy)]
pub struct SimView<'a> {
    pub cycle: Cycle,
    pub state: ClockState,
    pub world: &'a SpatialWorld,
    pub arena: &'a Arena,
    pub pool: &'a ResourcePool,
}

/// Callbacks invoked by [`Sim`](crate::Sim) at fixed points of a run.
///
/// All methods have no-op defaults so implementors only override what they
/// care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn collect(&mut self, view: &SimView<'_>) {
///         println!("{}: {} dooders", view.cycle, view.arena.active_count());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once after setup and once per cycle after every agent has
    /// acted, before the resource pool and the arena reset their counters.
    fn collect(&mut self, _view: &SimView<'_>) {}

    /// Called right after [`collect`][Self::collect] on cycles that are a
    /// multiple of `config.output_interval_cycles`.
    fn on_snapshot(&mut self, _view: &SimView<'_>) {}

    /// Called once when a run ends, whether it stopped or failed.
    fn on_stop(&mut self, _report: &RunReport) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn collect(&mut self, view: &SimView<'_>) {
        self.0.collect(view);
        self.1.collect(view);
    }

    fn on_snapshot(&mut self, view: &SimView<'_>) {
        self.0.on_snapshot(view);
        self.1.on_snapshot(view);
    }

    fn on_stop(&mut self, report: &RunReport) {
        self.0.on_stop(report);
        self.1.on_stop(report);
    }
}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn collect(&mut self, view: &SimView<'_>) {
        (**self).collect(view);
    }

    fn on_snapshot(&mut self, view: &SimView<'_>) {
        (**self).on_snapshot(view);
    }

    fn on_stop(&mut self, report: &RunReport) {
        (**self).on_stop(report);
    }
}
