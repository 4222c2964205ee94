use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::export::{Exporter, ReturnsTable};

#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, table: &ReturnsTable) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let rows = match &table.linked {
            Some(linked) => serde_json::to_string_pretty(linked)?,
            None => serde_json::to_string_pretty(&table.extraction.rows)?,
        };
        fs::write(self.out_dir.join("returns.json"), rows)?;
        let diagnostics = serde_json::to_string_pretty(&table.extraction.diagnostics)?;
        fs::write(self.out_dir.join("diagnostics.json"), diagnostics)?;
        Ok(())
    }
}
