//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use dd_sim::{CycleMetrics, RunReport, SimObserver, SimView};

use crate::row::{AgentSnapshotRow, CycleSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes cycle summaries and agent snapshots to any
/// [`OutputWriter`] backend.
///
/// `SimObserver` methods return nothing, so writer errors are stored.  Only
/// the first one is kept; check it with [`take_error`][Self::take_error]
/// once the run returns.
pub struct SimOutputObserver<W: OutputWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn collect(&mut self, view: &SimView<'_>) {
        let row = CycleSummaryRow::from(CycleMetrics::from_view(view));
        let result = self.writer.write_cycle_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, view: &SimView<'_>) {
        let rows: Vec<AgentSnapshotRow> = view
            .arena
            .active()
            .map(|a| AgentSnapshotRow {
                cycle: view.cycle.0,
                agent_id: a.id.0,
                x: a.position.x,
                y: a.position.y,
                age: a.age,
                hunger: a.hunger,
                generation: a.generation,
                energy_consumed: a.energy_consumed,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_stop(&mut self, _report: &RunReport) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
