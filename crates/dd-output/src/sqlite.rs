//! SQLite output backend (feature `sqlite`).
//!
//! One `output.db` in the output directory with two tables,
//! `cycle_summaries` and `agent_snapshots`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, CycleSummaryRow, OutputResult};

pub struct SqliteWriter {
    conn: Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 cycle           INTEGER NOT NULL,
                 agent_id        INTEGER NOT NULL,
                 x               INTEGER NOT NULL,
                 y               INTEGER NOT NULL,
                 age             INTEGER NOT NULL,
                 hunger          INTEGER NOT NULL,
                 generation      INTEGER NOT NULL,
                 energy_consumed INTEGER NOT NULL,
                 PRIMARY KEY (cycle, agent_id)
             );
             CREATE TABLE IF NOT EXISTS cycle_summaries (
                 cycle      INTEGER PRIMARY KEY,
                 active     INTEGER NOT NULL,
                 created    INTEGER NOT NULL,
                 terminated INTEGER NOT NULL,
                 resources  INTEGER NOT NULL,
                 allocated  INTEGER NOT NULL,
                 consumed   INTEGER NOT NULL,
                 dissipated INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (cycle, agent_id, x, y, age, hunger, generation, energy_consumed) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.cycle as i64,
                    row.agent_id as i64,
                    row.x,
                    row.y,
                    row.age,
                    row.hunger,
                    row.generation,
                    row.energy_consumed,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO cycle_summaries \
             (cycle, active, created, terminated, resources, allocated, consumed, dissipated) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.cycle as i64,
                row.active as i64,
                row.created,
                row.terminated,
                row.resources as i64,
                row.allocated,
                row.consumed,
                row.dissipated,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
