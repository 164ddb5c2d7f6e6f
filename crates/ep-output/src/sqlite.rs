//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `status_history` (one row per tick) and `agent_snapshots`.

use std::path::Path;

use rusqlite::Connection;

use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, StatusHistoryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS status_history (
                 tick           INTEGER PRIMARY KEY,
                 susceptible    INTEGER NOT NULL,
                 infected       INTEGER NOT NULL,
                 recovered      INTEGER NOT NULL,
                 dead           INTEGER NOT NULL,
                 new_infections INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id INTEGER NOT NULL,
                 tick     INTEGER NOT NULL,
                 cluster  INTEGER NOT NULL,
                 status   TEXT    NOT NULL,
                 immunity REAL    NOT NULL,
                 degree   INTEGER NOT NULL,
                 PRIMARY KEY (tick, agent_id)
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
                 (agent_id, tick, cluster, status, immunity, degree) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick as i64,
                    row.cluster,
                    row.status.as_str(),
                    row.immunity,
                    row.degree,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_status(&mut self, row: &StatusHistoryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO status_history \
             (tick, susceptible, infected, recovered, dead, new_infections) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.tick as i64,
                row.susceptible as i64,
                row.infected as i64,
                row.recovered as i64,
                row.dead as i64,
                row.new_infections as i64,
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
