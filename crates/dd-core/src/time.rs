//! Simulation time model.
//!
//! Time is a monotonically increasing `Cycle` counter.  Cycle 0 is the setup
//! cycle; every call to the simulation's `step` plays the next cycle and
//! then advances the clock to it, so after `n` steps the clock reads `n`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Cycle ─────────────────────────────────────────────────────────────────────

/// An absolute simulation cycle.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle(pub u64);

impl Cycle {
    pub const ZERO: Cycle = Cycle(0);

    #[inline]
    pub fn offset(self, n: u64) -> Cycle {
        Cycle(self.0 + n)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

// ── ClockState ────────────────────────────────────────────────────────────────

/// Lifecycle of a simulation run.
///
/// `Created → Running` happens once, at setup.  `Running → Stopped` happens
/// when a stop condition fires, when the run is stopped explicitly, or when a
/// cycle fails.  There is no way back from `Stopped`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum ClockState {
    #[default]
    Created,
    Running,
    Stopped,
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClockState::Created => "created",
            ClockState::Running => "running",
            ClockState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimClock {
    pub current: Cycle,
    pub state: ClockState,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current = Cycle(self.current.0 + 1);
    }

    /// Mark the clock running.  Returns `false` unless it was `Created`.
    pub fn start(&mut self) -> bool {
        if self.state != ClockState::Created {
            return false;
        }
        self.state = ClockState::Running;
        true
    }

    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current, self.state)
    }
}
