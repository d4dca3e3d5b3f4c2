//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AgentSnapshotRow, CycleSummaryRow, OutputResult};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are returned here; [`SimOutputObserver`](crate::SimOutputObserver)
/// keeps the first one for [`take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write one cycle summary row.
    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()>;

    /// Flush and close.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
