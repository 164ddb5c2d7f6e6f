//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ep_agent::{Population, StatusTally};
use ep_core::Tick;
use ep_disease::StatusDelta;
use ep_sim::SimObserver;

use crate::row::{AgentSnapshotRow, StatusHistoryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes one status-history row per tick and agent
/// snapshots at the sim's snapshot cadence to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    rows:       usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Status rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn status(&mut self, tick: Tick, tally: &StatusTally, new_infections: usize) {
        let row = StatusHistoryRow::new(tick, tally, new_infections);
        let result = self.writer.write_status(&row);
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_sim_start(&mut self, tick: Tick, tally: &StatusTally, _population: &Population) {
        self.status(tick, tally, 0);
    }

    fn on_tick_end(&mut self, tick: Tick, tally: &StatusTally, delta: &StatusDelta) {
        self.status(tick, tally, delta.newly_infected.len());
    }

    fn on_snapshot(&mut self, tick: Tick, population: &Population) {
        let rows: Vec<AgentSnapshotRow> = population
            .agent_ids()
            .map(|a| AgentSnapshotRow::capture(population, a, tick))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _tally: &StatusTally) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
