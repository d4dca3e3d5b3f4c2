//! Structured simulation log records.
//!
//! Every record carries `scope`, `cycle` and `granularity` fields alongside
//! its message.  Granularity selects the `tracing` level:
//!
//! | Granularity | Level   | Used for                            |
//! |-------------|---------|-------------------------------------|
//! | 1           | `info`  | lifecycle events (setup, stop)      |
//! | 2           | `debug` | per-cycle summaries, ignored intents |
//! | 3           | `trace` | per-entity detail                   |
//!
//! Filtering is left to the subscriber (`RUST_LOG`).

pub const SIMULATION: &str = "Simulation";
pub const ARENA: &str = "Arena";
pub const RESOURCES: &str = "Resources";
pub const DOODER: &str = "Dooder";
pub const SPACE: &str = "Space";

/// Emit a structured simulation record.
///
/// ```ignore
/// sim_log!(1, log::ARENA, cycle, "seeded {} dooders", n);
/// ```
#[macro_export]
macro_rules! sim_log {
    (1, $scope:expr, $cycle:expr, $($arg:tt)+) => {
        $crate::__tracing::info!(scope = $scope, cycle = $cycle.0, granularity = 1u8, $($arg)+)
    };
    (2, $scope:expr, $cycle:expr, $($arg:tt)+) => {
        $crate::__tracing::debug!(scope = $scope, cycle = $cycle.0, granularity = 2u8, $($arg)+)
    };
    (3, $scope:expr, $cycle:expr, $($arg:tt)+) => {
        $crate::__tracing::trace!(scope = $scope, cycle = $cycle.0, granularity = 3u8, $($arg)+)
    };
}
