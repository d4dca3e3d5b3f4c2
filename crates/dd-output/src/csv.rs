//! CSV output backend.
//!
//! Creates two files in the output directory:
//! - `cycle_summaries.csv`
//! - `agent_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, CycleSummaryRow, OutputResult};

pub const SNAPSHOT_HEADER: [&str; 8] =
    ["cycle", "agent_id", "x", "y", "age", "hunger", "generation", "energy_consumed"];

pub const SUMMARY_HEADER: [&str; 8] =
    ["cycle", "active", "created", "terminated", "resources", "allocated", "consumed", "dissipated"];

pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two files and write their headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("cycle_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.cycle.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.age.to_string(),
                row.hunger.to_string(),
                row.generation.to_string(),
                row.energy_consumed.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.cycle.to_string(),
            row.active.to_string(),
            row.created.to_string(),
            row.terminated.to_string(),
            row.resources.to_string(),
            row.allocated.to_string(),
            row.consumed.to_string(),
            row.dissipated.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
