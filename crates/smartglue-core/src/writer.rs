//! Append-only result file.
//!
//! [`ResultWriter`] owns the file and enforces the header-once protocol.
//! [`RecordSink`] moves a writer onto its own thread and feeds it completed
//! records over a channel, so draws running in parallel never share the
//! file handle.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::error::{GlueError, Result};

/// One line of the result file: objective values, parameter values and,
/// optionally, the simulated series.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Draw index the record belongs to.
    pub index: usize,
    pub values: Vec<f64>,
}

/// Result file writer.
#[derive(Debug)]
pub struct ResultWriter {
    path: PathBuf,
    out: BufWriter<File>,
    columns: Option<usize>,
    records: usize,
}

impl ResultWriter {
    /// Create (or truncate) the result file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            columns: None,
            records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records appended so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Write the header line. Must be called exactly once, before any record.
    pub fn write_header(
        &mut self,
        metric_names: &[String],
        parameter_names: &[&str],
        timestamp_labels: &[String],
    ) -> Result<()> {
        if self.columns.is_some() {
            return Err(GlueError::Writer("header already written".to_string()));
        }
        let header: Vec<&str> = metric_names
            .iter()
            .map(String::as_str)
            .chain(parameter_names.iter().copied())
            .chain(timestamp_labels.iter().map(String::as_str))
            .collect();
        self.write_line(&header.join(","))?;
        self.columns = Some(header.len());
        Ok(())
    }

    /// Append one record as a complete line.
    ///
    /// Values are written at single precision. The line is flushed before
    /// returning, so the file only ever ends on a record boundary.
    pub fn append_record(&mut self, values: &[f64]) -> Result<()> {
        let Some(columns) = self.columns else {
            return Err(GlueError::Writer(
                "record appended before the header".to_string(),
            ));
        };
        if values.len() != columns {
            return Err(GlueError::Writer(format!(
                "record has {} values, header has {} columns",
                values.len(),
                columns
            )));
        }
        let line = values
            .iter()
            .map(|v| (*v as f32).to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.write_line(&line)?;
        self.records += 1;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.out.write_all(buf.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Flush and close the file.
    pub fn close(mut self) -> Result<usize> {
        self.out.flush()?;
        Ok(self.records)
    }
}

/// Header plus rows of a result file read back from disk.
#[derive(Debug, Clone)]
pub struct ResultTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

/// Read a result file written by [`ResultWriter`].
pub fn read_results(path: &Path) -> Result<ResultTable> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let header = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| {
                    GlueError::format(path, format!("line {}: non-numeric value \"{}\"", i + 2, cell))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }
    Ok(ResultTable { header, rows })
}

/// Result writer running on a dedicated thread.
///
/// Records may arrive in any order; they are written in draw-index order,
/// holding early arrivals back until the records before them are in. When
/// the sink closes, whatever is still held back is written in index order,
/// so an aborted run leaves no record behind.
///
/// If the writer thread stops on an error, the next [`RecordSink::send`]
/// joins it and returns that error.
pub struct RecordSink {
    tx: Option<Sender<ResultRecord>>,
    handle: Mutex<Option<JoinHandle<Result<usize>>>>,
}

impl RecordSink {
    /// Start the writer thread. The writer must already hold its header.
    pub fn spawn(writer: ResultWriter) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = std::thread::Builder::new()
            .name("glue-writer".to_string())
            .spawn(move || write_in_order(writer, rx))?;
        Ok(Self {
            tx: Some(tx),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Hand one record to the writer thread.
    pub fn send(&self, record: ResultRecord) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| GlueError::Writer("sink already closed".to_string()))?;
        if tx.send(record).is_ok() {
            return Ok(());
        }
        let handle = self
            .handle
            .lock()
            .map_err(|_| GlueError::Writer("writer handle lock poisoned".to_string()))?
            .take();
        match handle {
            Some(handle) => {
                join_writer(handle)?;
                Err(GlueError::Writer("writer thread has stopped".to_string()))
            }
            None => Err(GlueError::Writer("writer thread has stopped".to_string())),
        }
    }

    /// Close the channel, wait for the writer and return the record count.
    pub fn close(mut self) -> Result<usize> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<usize> {
        drop(self.tx.take());
        let handle = self
            .handle
            .get_mut()
            .map_err(|_| GlueError::Writer("writer handle lock poisoned".to_string()))?
            .take();
        match handle {
            Some(handle) => join_writer(handle),
            None => Err(GlueError::Writer("writer thread has stopped".to_string())),
        }
    }
}

impl Drop for RecordSink {
    fn drop(&mut self) {
        let running = self
            .handle
            .get_mut()
            .map(|handle| handle.is_some())
            .unwrap_or(false);
        if running {
            if let Err(e) = self.shutdown() {
                warn!(error = %e, "result writer closed with an error");
            }
        }
    }
}

fn join_writer(handle: JoinHandle<Result<usize>>) -> Result<usize> {
    handle
        .join()
        .map_err(|_| GlueError::Writer("writer thread panicked".to_string()))?
}

fn write_in_order(mut writer: ResultWriter, rx: Receiver<ResultRecord>) -> Result<usize> {
    let mut pending: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    let mut next = 0;
    for record in rx.iter() {
        pending.insert(record.index, record.values);
        while let Some(values) = pending.remove(&next) {
            writer.append_record(&values)?;
            next += 1;
        }
    }
    if !pending.is_empty() {
        debug!(held = pending.len(), "writing records left after a gap");
    }
    for values in pending.into_values() {
        writer.append_record(&values)?;
    }
    writer.close()
}
