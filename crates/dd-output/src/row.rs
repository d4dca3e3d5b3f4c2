//! Plain data row types written by output backends.

use dd_sim::CycleMetrics;

/// One active dooder at a snapshot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSnapshotRow {
    pub cycle: u64,
    pub agent_id: u64,
    pub x: i32,
    pub y: i32,
    pub age: u32,
    pub hunger: u32,
    pub generation: u32,
    pub energy_consumed: u32,
}

/// Population and resource counts for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummaryRow {
    pub cycle: u64,
    pub active: u64,
    pub created: u32,
    pub terminated: u32,
    pub resources: u64,
    pub allocated: u32,
    pub consumed: u32,
    pub dissipated: u32,
}

impl From<CycleMetrics> for CycleSummaryRow {
    fn from(m: CycleMetrics) -> Self {
        Self {
            cycle: m.cycle.0,
            active: m.active as u64,
            created: m.created,
            terminated: m.terminated,
            resources: m.resources as u64,
            allocated: m.allocated,
            consumed: m.consumed,
            dissipated: m.dissipated,
        }
    }
}
