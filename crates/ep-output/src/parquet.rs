//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `status_history.parquet`
//! - `agent_snapshots.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, StatusHistoryRow};

fn history_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",           DataType::UInt64, false),
        Field::new("susceptible",    DataType::UInt64, false),
        Field::new("infected",       DataType::UInt64, false),
        Field::new("recovered",      DataType::UInt64, false),
        Field::new("dead",           DataType::UInt64, false),
        Field::new("new_infections", DataType::UInt64, false),
    ]))
}

fn snapshot_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("agent_id", DataType::UInt32,  false),
        Field::new("tick",     DataType::UInt64,  false),
        Field::new("cluster",  DataType::UInt32,  false),
        Field::new("status",   DataType::Utf8,    false),
        Field::new("immunity", DataType::Float64, false),
        Field::new("degree",   DataType::UInt32,  false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Buffered status rows are written as one batch per this many ticks.
const HISTORY_BATCH: usize = 256;

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    history:        Option<ArrowWriter<File>>,
    snapshots:      Option<ArrowWriter<File>>,
    history_schema: Arc<Schema>,
    snap_schema:    Arc<Schema>,
    pending:        Vec<StatusHistoryRow>,
}

impl ParquetWriter {
    /// Create `dir` if needed and open both Parquet files in it.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let history_schema = history_schema();
        let snap_schema = snapshot_schema();

        let history = ArrowWriter::try_new(
            File::create(dir.join("status_history.parquet"))?,
            Arc::clone(&history_schema),
            Some(snappy_props()),
        )?;
        let snapshots = ArrowWriter::try_new(
            File::create(dir.join("agent_snapshots.parquet"))?,
            Arc::clone(&snap_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            history: Some(history),
            snapshots: Some(snapshots),
            history_schema,
            snap_schema,
            pending: Vec::with_capacity(HISTORY_BATCH),
        })
    }

    /// Write buffered status rows as one record batch.
    fn flush_history(&mut self) -> OutputResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.history.as_mut() else {
            self.pending.clear();
            return Ok(());
        };

        let mut columns: [UInt64Builder; 6] = std::array::from_fn(|_| UInt64Builder::new());
        for row in &self.pending {
            let values = [row.tick, row.susceptible, row.infected, row.recovered, row.dead, row.new_infections];
            for (builder, v) in columns.iter_mut().zip(values) {
                builder.append_value(v);
            }
        }
        let arrays = columns
            .iter_mut()
            .map(|b| Arc::new(b.finish()) as arrow::array::ArrayRef)
            .collect();

        let batch = RecordBatch::try_new(Arc::clone(&self.history_schema), arrays)?;
        writer.write(&batch)?;
        self.pending.clear();
        Ok(())
    }
}

impl OutputWriter for ParquetWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.snapshots.as_mut() else {
            return Ok(());
        };

        let mut agent_ids  = UInt32Builder::new();
        let mut ticks      = UInt64Builder::new();
        let mut clusters   = UInt32Builder::new();
        let mut statuses   = StringBuilder::new();
        let mut immunities = Float64Builder::new();
        let mut degrees    = UInt32Builder::new();

        for row in rows {
            agent_ids.append_value(row.agent_id);
            ticks.append_value(row.tick);
            clusters.append_value(row.cluster);
            statuses.append_value(row.status.as_str());
            immunities.append_value(row.immunity);
            degrees.append_value(row.degree);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.snap_schema),
            vec![
                Arc::new(agent_ids.finish()),
                Arc::new(ticks.finish()),
                Arc::new(clusters.finish()),
                Arc::new(statuses.finish()),
                Arc::new(immunities.finish()),
                Arc::new(degrees.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_status(&mut self, row: &StatusHistoryRow) -> OutputResult<()> {
        self.pending.push(*row);
        if self.pending.len() >= HISTORY_BATCH {
            self.flush_history()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.flush_history()?;
        if let Some(w) = self.history.take() {
            w.close()?;
        }
        if let Some(w) = self.snapshots.take() {
            w.close()?;
        }
        Ok(())
    }
}
