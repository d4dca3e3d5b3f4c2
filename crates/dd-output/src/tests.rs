//! Tests for dd-output.

#[cfg(test)]
mod helpers {
    use tempfile::TempDir;

    use crate::row::{AgentSnapshotRow, CycleSummaryRow};

    pub fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    pub fn snap_row(agent_id: u64, cycle: u64) -> AgentSnapshotRow {
        AgentSnapshotRow {
            cycle,
            agent_id,
            x: agent_id as i32,
            y: 2,
            age: 4,
            hunger: 1,
            generation: 0,
            energy_consumed: 3,
        }
    }

    pub fn summary_row(cycle: u64) -> CycleSummaryRow {
        CycleSummaryRow {
            cycle,
            active: 10,
            created: 2,
            terminated: 1,
            resources: 7,
            allocated: 3,
            consumed: 2,
            dissipated: 0,
        }
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::helpers::{snap_row, summary_row, tmp};
    use crate::csv::{CsvWriter, SNAPSHOT_HEADER, SUMMARY_HEADER};
    use crate::writer::OutputWriter;

    #[test]
    fn files_created_in_nested_dir() {
        let dir = tmp();
        let out = dir.path().join("run").join("one");
        let _w = CsvWriter::new(&out).unwrap();
        assert!(out.join("agent_snapshots.csv").exists());
        assert!(out.join("cycle_summaries.csv").exists());
    }

    #[test]
    fn headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, SNAPSHOT_HEADER);

        let mut rdr = csv::Reader::from_path(dir.path().join("cycle_summaries.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, SUMMARY_HEADER);
    }

    #[test]
    fn snapshot_rows_written_in_order() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "5"); // cycle
        assert_eq!(&rows[1][1], "1"); // agent_id
        assert_eq!(&rows[2][2], "2"); // x
        assert_eq!(&rows[2][7], "3"); // energy_consumed
    }

    #[test]
    fn summary_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_cycle_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("cycle_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let fields: Vec<_> = rows[0].iter().collect();
        assert_eq!(fields, ["3", "10", "2", "1", "7", "3", "2", "0"]);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use rusqlite::Connection;

    use super::helpers::{snap_row, summary_row, tmp};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0)).unwrap()
    }

    #[test]
    fn rows_land_in_both_tables() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 1), snap_row(1, 1)]).unwrap();
        w.write_snapshots(&[]).unwrap();
        w.write_cycle_summary(&summary_row(0)).unwrap();
        w.write_cycle_summary(&summary_row(1)).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let conn = Connection::open(dir.path().join("output.db")).unwrap();
        assert_eq!(count(&conn, "agent_snapshots"), 2);
        assert_eq!(count(&conn, "cycle_summaries"), 2);
        let active: i64 = conn
            .query_row("SELECT active FROM cycle_summaries WHERE cycle = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(active, 10);
    }

    #[test]
    fn duplicate_cycle_is_an_error() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_cycle_summary(&summary_row(4)).unwrap();
        assert!(w.write_cycle_summary(&summary_row(4)).is_err());
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use dd_behavior::NoopBehavior;
    use dd_core::{SimConfig, StopSettings};
    use dd_sim::{RunOutcome, SimBuilder, StopReason};

    use super::helpers::tmp;
    use crate::row::{AgentSnapshotRow, CycleSummaryRow};
    use crate::writer::OutputWriter;
    use crate::{CsvWriter, OutputError, OutputResult, SimOutputObserver};

    fn config() -> SimConfig {
        SimConfig {
            stop: StopSettings { max_cycles: Some(4), stop_on_extinction: true },
            output_interval_cycles: 2,
            ..SimConfig::default()
        }
    }

    #[test]
    fn run_writes_summaries_and_snapshots() {
        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        let mut sim = SimBuilder::new(config(), NoopBehavior).build().unwrap();
        let report = sim.run(&mut obs);
        assert_eq!(report.outcome, RunOutcome::Stopped(StopReason::MaxCycles(4)));
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("cycle_summaries.csv")).unwrap();
        let cycles: Vec<String> = rdr.records().map(|r| r.unwrap()[0].to_owned()).collect();
        assert_eq!(cycles, ["0", "1", "2", "3", "4"]);

        // Snapshots at cycles 0, 2 and 4, one row per dooder.
        let agents = report.summary.starting_agents;
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), 3 * agents);
    }

    /// Fails every write with a numbered I/O error.
    #[derive(Default)]
    struct Broken {
        attempts: u32,
        finished: bool,
    }

    impl Broken {
        fn fail(&mut self) -> OutputResult<()> {
            self.attempts += 1;
            Err(OutputError::Io(std::io::Error::other(format!("failure {}", self.attempts))))
        }
    }

    impl OutputWriter for Broken {
        fn write_snapshots(&mut self, _rows: &[AgentSnapshotRow]) -> OutputResult<()> {
            self.fail()
        }

        fn write_cycle_summary(&mut self, _row: &CycleSummaryRow) -> OutputResult<()> {
            self.fail()
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn first_error_is_kept_and_run_continues() {
        let mut obs = SimOutputObserver::new(Broken::default());
        let mut sim = SimBuilder::new(config(), NoopBehavior).build().unwrap();
        let report = sim.run(&mut obs);
        assert!(!report.is_failure());

        let err = obs.take_error().unwrap();
        assert_eq!(err.to_string(), "I/O error: failure 1");
        assert!(obs.take_error().is_none());

        let writer = obs.into_writer();
        assert!(writer.attempts > 1);
        assert!(writer.finished);
    }
}
