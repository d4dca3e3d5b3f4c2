//! Per-cycle metrics history.

use serde::Serialize;

use dd_core::Cycle;

use crate::{SimObserver, SimView};

/// One row of the metrics history.
///
/// Counters describe the cycle just played: agents created and terminated
/// during it, and resources allocated or dissipated at the previous boundary
/// plus those consumed during it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CycleMetrics {
    pub cycle: Cycle,
    pub active: usize,
    pub created: u32,
    pub terminated: u32,
    pub resources: usize,
    pub allocated: u32,
    pub consumed: u32,
    pub dissipated: u32,
}

impl CycleMetrics {
    pub fn from_view(view: &SimView<'_>) -> Self {
        let arena = view.arena.counters();
        let pool = view.pool.counters();
        Self {
            cycle: view.cycle,
            active: view.arena.active_count(),
            created: arena.created,
            terminated: arena.terminated,
            resources: view.pool.len(),
            allocated: pool.allocated,
            consumed: pool.consumed,
            dissipated: pool.dissipated,
        }
    }
}

/// Keeps one [`CycleMetrics`] per collection.
#[derive(Clone, Debug, Default)]
pub struct MetricsRecorder {
    rows: Vec<CycleMetrics>,
}

impl MetricsRecorder {
    pub fn rows(&self) -> &[CycleMetrics] {
        &self.rows
    }

    pub fn last(&self) -> Option<&CycleMetrics> {
        self.rows.last()
    }

    pub fn into_rows(self) -> Vec<CycleMetrics> {
        self.rows
    }
}

impl SimObserver for MetricsRecorder {
    fn collect(&mut self, view: &SimView<'_>) {
        self.rows.push(CycleMetrics::from_view(view));
    }
}
