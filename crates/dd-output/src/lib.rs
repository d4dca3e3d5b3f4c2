//! `dd-output`: simulation output writers.
//!
//! | Feature   | Backend | Files created                                   |
//! |-----------|---------|-------------------------------------------------|
//! | *(none)*  | CSV     | `cycle_summaries.csv`, `agent_snapshots.csv`    |
//! | `sqlite`  | SQLite  | `output.db`                                     |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `dd_sim::SimObserver`.  Summaries
//! are written on every collection; agent snapshots on snapshot cycles
//! (`config.output_interval_cycles`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use dd_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! let report = sim.run(&mut obs);
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, CycleSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
