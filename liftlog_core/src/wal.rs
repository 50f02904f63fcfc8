//! Append-only summary log.
//!
//! Finished sessions are appended to a JSONL (JSON Lines) file, one
//! [`SessionRecord`] per line, under an exclusive file lock. The session
//! engine never touches this; the host hands it the summary after `end()`.

use crate::{Result, SessionRecord, SessionSummary};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Destination for finished session summaries
pub trait SummarySink {
    fn append(&mut self, record: &SessionRecord) -> Result<()>;

    /// Snapshot a summary into a record and append it
    fn record(&mut self, summary: &SessionSummary) -> Result<SessionRecord> {
        let record = SessionRecord::from_summary(summary);
        self.append(&record)?;
        Ok(record)
    }
}

/// JSONL-based summary sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SummarySink for JsonlSink {
    fn append(&mut self, record: &SessionRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended session {} to summary log", record.id);
        Ok(())
    }
}

/// Read all session records from a log file
///
/// Lines that fail to parse are logged and skipped.
pub fn read_records(path: &Path) -> Result<Vec<SessionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<SessionRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse session at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} sessions from summary log", records.len());
    Ok(records)
}
