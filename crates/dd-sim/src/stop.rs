//! Stop conditions.
//!
//! Conditions are checked before every cycle.  Any condition returning a
//! reason stops the run; the first one in registration order wins.

use std::fmt;

use serde::Serialize;

use crate::SimView;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The configured number of cycles completed.
    MaxCycles(u64),
    /// No active agents remain.
    Extinction,
    /// [`Sim::stop`](crate::Sim::stop) was called.
    Requested,
    Custom(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::MaxCycles(n) => write!(f, "reached {n} cycles"),
            StopReason::Extinction => f.write_str("all dooders died"),
            StopReason::Requested => f.write_str("stop requested"),
            StopReason::Custom(s) => f.write_str(s),
        }
    }
}

/// A predicate over the simulation state.  `Some` means stop.
pub trait StopCondition: Send {
    fn check(&self, view: &SimView<'_>) -> Option<StopReason>;
}

/// Stop once the given number of cycles has completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxCycles(pub u64);

impl StopCondition for MaxCycles {
    fn check(&self, view: &SimView<'_>) -> Option<StopReason> {
        (view.cycle.0 >= self.0).then_some(StopReason::MaxCycles(self.0))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Extinction;

impl StopCondition for Extinction {
    fn check(&self, view: &SimView<'_>) -> Option<StopReason> {
        view.arena.is_extinct().then_some(StopReason::Extinction)
    }
}
