//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `status_history.csv` — tick, susceptible, infected, recovered, dead,
//!   new_infections
//! - `agent_snapshots.csv` — agent_id, tick, cluster, status, immunity, degree

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, StatusHistoryRow};

pub const STATUS_HEADER: [&str; 6] =
    ["tick", "susceptible", "infected", "recovered", "dead", "new_infections"];
pub const SNAPSHOT_HEADER: [&str; 6] = ["agent_id", "tick", "cluster", "status", "immunity", "degree"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    history:   Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open both CSV files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;

        let mut history = Writer::from_path(dir.join("status_history.csv"))?;
        history.write_record(STATUS_HEADER)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        Ok(Self { history, snapshots, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.cluster.to_string(),
                row.status.as_str().to_owned(),
                format!("{:.4}", row.immunity),
                row.degree.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_status(&mut self, row: &StatusHistoryRow) -> OutputResult<()> {
        self.history.write_record(&[
            row.tick.to_string(),
            row.susceptible.to_string(),
            row.infected.to_string(),
            row.recovered.to_string(),
            row.dead.to_string(),
            row.new_infections.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.history.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
