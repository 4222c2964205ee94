use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::model::{ElectionRow, LinkedRow};
use crate::export::{Exporter, ReturnsTable};

pub const RETURNS_FILE: &str = "returns.csv";
pub const LINKED_FILE: &str = "returns_with_incumbency.csv";

pub const RETURNS_COLUMNS: [&str; 14] = [
    "session",
    "type",
    "year",
    "election_dates",
    "state",
    "district",
    "runoff",
    "trial",
    "num_elected",
    "name",
    "party",
    "votes",
    "percentage",
    "result",
];

pub const INCUMBENCY_COLUMNS: [&str; 3] = ["incumbent", "old_vote_share", "clean_name"];

#[derive(Debug, Clone)]
pub struct CsvExporter {
    out_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for CsvExporter {
    fn export(&self, table: &ReturnsTable) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        write_rows_csv(&self.out_dir.join(RETURNS_FILE), &table.extraction.rows)?;
        if let Some(linked) = &table.linked {
            write_linked_csv(&self.out_dir.join(LINKED_FILE), linked)?;
        }
        Ok(())
    }
}

pub fn write_rows_csv(path: &Path, rows: &[ElectionRow]) -> Result<()> {
    write_records(path, rows, &RETURNS_COLUMNS)
}

pub fn write_linked_csv(path: &Path, rows: &[LinkedRow]) -> Result<()> {
    let header: Vec<&str> = RETURNS_COLUMNS
        .iter()
        .chain(INCUMBENCY_COLUMNS.iter())
        .copied()
        .collect();
    write_records(path, rows, &header)
}

/// Reads a table written by [`write_rows_csv`].
pub fn read_rows_csv(path: &Path) -> Result<Vec<ElectionRow>> {
    read_records(path)
}

fn write_records<T: Serialize>(path: &Path, records: &[T], header: &[&str]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(!records.is_empty())
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    if records.is_empty() {
        writer.write_record(header)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    log::info!("wrote {} row(s) to {}", records.len(), path.display());
    Ok(())
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();
    for (idx, record) in reader.deserialize().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let record = record.with_context(|| format!("{}: bad row at line {}", path.display(), idx + 2))?;
        records.push(record);
    }
    Ok(records)
}
