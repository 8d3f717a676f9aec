//! # Telemetry Logger
//!
//! Writes received sample frames as JSONL with file rotation.
//!
//! Each record is one JSON line with a UTC timestamp and the 23 sample
//! values. Files roll over after a configured number of records and only
//! the most recent files are kept.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::protocol::message::NUM_SAMPLES;

/// One logged telemetry record
#[derive(Debug, Serialize)]
struct TelemetryRecord<'a> {
    /// UTC timestamp, RFC 3339
    timestamp: String,
    /// The 23 received sample values
    samples: &'a [f32],
}

/// Rotating JSONL writer for received telemetry.
#[derive(Debug)]
pub struct TelemetryLogger {
    dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    writer: Option<BufWriter<File>>,
    records_in_file: usize,
    file_seq: u32,
}

impl TelemetryLogger {
    /// Create a logger writing under `dir`, creating it if needed.
    ///
    /// # Arguments
    ///
    /// * `dir` - Log directory
    /// * `max_records_per_file` - Records before rolling to a new file
    /// * `max_files_to_keep` - Old files retained after rotation
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(
        dir: impl Into<PathBuf>,
        max_records_per_file: usize,
        max_files_to_keep: usize,
    ) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            max_records_per_file,
            max_files_to_keep,
            writer: None,
            records_in_file: 0,
            file_seq: 0,
        })
    }

    /// Append one sample frame as a JSONL record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written; callers log and
    /// continue, a failed record never stops frame reception.
    pub fn log(&mut self, samples: &[f32; NUM_SAMPLES]) -> Result<()> {
        if self.writer.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        let record = TelemetryRecord {
            timestamp: Utc::now().to_rfc3339(),
            samples,
        };
        let line = serde_json::to_string(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        // rotate() above guarantees a writer here
        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "{}", line)?;
            writer.flush()?;
            self.records_in_file += 1;
        }
        Ok(())
    }

    /// Open a fresh log file and prune the oldest beyond the retention
    /// limit.
    fn rotate(&mut self) -> Result<()> {
        // The sequence number keeps names unique when rotations land
        // within the same second
        let name = format!(
            "telemetry_{}_{:05}.jsonl",
            Utc::now().format("%Y%m%d_%H%M%S"),
            self.file_seq
        );
        self.file_seq += 1;
        let path = self.dir.join(&name);
        let file = File::create(&path)?;
        self.writer = Some(BufWriter::new(file));
        self.records_in_file = 0;
        info!("telemetry log rotated to {}", path.display());

        self.prune()?;
        Ok(())
    }

    /// Remove the oldest log files, keeping at most `max_files_to_keep`.
    fn prune(&self) -> Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "jsonl")
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("telemetry_"))
            })
            .collect();

        // Timestamped names sort chronologically
        files.sort();

        while files.len() > self.max_files_to_keep {
            let oldest = files.remove(0);
            debug!("pruning old telemetry log {}", oldest.display());
            fs::remove_file(oldest)?;
        }
        Ok(())
    }
}
