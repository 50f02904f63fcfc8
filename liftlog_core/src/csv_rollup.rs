//! CSV rollup of the summary log.
//!
//! Flattens logged sessions into one CSV row per completed set, which is the
//! shape needed for "best set for bench press" style queries. A session with
//! no completed sets still gets one row, with the set columns left empty.

use crate::{Result, SessionRecord};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CsvRow {
    session_id: String,
    routine_name: String,
    started_at: Option<String>,
    ended_at: Option<String>,
    duration_seconds: u64,
    exercise_name: Option<String>,
    set_number: Option<u32>,
    reps_completed: Option<u32>,
    weight_used: Option<f64>,
}

impl CsvRow {
    fn session_only(record: &SessionRecord) -> Self {
        CsvRow {
            session_id: record.id.to_string(),
            routine_name: record.routine_name.clone(),
            started_at: record.started_at.map(|t| t.to_rfc3339()),
            ended_at: record.ended_at.map(|t| t.to_rfc3339()),
            duration_seconds: record.duration_seconds,
            exercise_name: None,
            set_number: None,
            reps_completed: None,
            weight_used: None,
        }
    }
}

fn rows_for(record: &SessionRecord) -> Vec<CsvRow> {
    if record.sets.is_empty() {
        return vec![CsvRow::session_only(record)];
    }

    record
        .sets
        .iter()
        .map(|set| CsvRow {
            exercise_name: Some(set.exercise_name.clone()),
            set_number: Some(set.set_number),
            reps_completed: Some(set.reps_completed),
            weight_used: set.weight_used,
            ..CsvRow::session_only(record)
        })
        .collect()
}

/// Roll up logged sessions into CSV and archive the log
///
/// 1. Reads all records from the log
/// 2. Appends one row per completed set, or one bare row for a session
///    without any (headers only for a new file)
/// 3. Syncs the CSV to disk
/// 4. Renames the log to `.wal.processed`
///
/// Returns the number of sessions processed.
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let records = crate::wal::read_records(wal_path)?;

    if records.is_empty() {
        tracing::info!("No sessions in summary log to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut rows = 0;
    for record in &records {
        for row in rows_for(record) {
            writer.serialize(row)?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} rows from {} sessions to CSV", rows, records.len());

    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;

    tracing::info!("Archived summary log to {:?}", processed_path);

    Ok(records.len())
}

/// Remove archived `.wal.processed` files in `dir`
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed log: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed log files", count);
    }

    Ok(count)
}
