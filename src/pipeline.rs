use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::diagnostics::Extraction;
use crate::core::model::LinkedRow;
use crate::export::csv_export::CsvExporter;
use crate::export::json_export::JsonExporter;
use crate::export::{Exporter, ReturnsTable};
use crate::incumbency::link_incumbency;
use crate::parser::{HtmlSpanReader, SpanSource};
use crate::segment::extract;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub formats: Vec<TableFormat>,
    pub link_incumbency: bool,
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            formats: vec![TableFormat::Csv],
            link_incumbency: true,
        }
    }

    pub fn with_formats(mut self, formats: Vec<TableFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_incumbency(mut self, enabled: bool) -> Self {
        self.link_incumbency = enabled;
        self
    }
}

pub fn build_table(config: &PipelineConfig) -> Result<ReturnsTable> {
    let reader = HtmlSpanReader::new(config.input.clone())?;
    table_from_source(&reader, config.link_incumbency)
}

/// Runs extraction, and optionally the incumbency pass, over any span source.
pub fn table_from_source(source: &dyn SpanSource, link: bool) -> Result<ReturnsTable> {
    let spans = source.read_spans()?;
    let extraction = extract(&spans);
    log::info!(
        "extracted {} row(s) with {} diagnostic(s) from {} span(s)",
        extraction.rows.len(),
        extraction.diagnostics.len(),
        spans.len()
    );
    let linked = link.then(|| link_rows(&extraction));
    Ok(ReturnsTable { extraction, linked })
}

fn link_rows(extraction: &Extraction) -> Vec<LinkedRow> {
    let linked = link_incumbency(extraction.rows.clone());
    log::info!(
        "{} incumbent row(s)",
        linked.iter().filter(|row| row.incumbent).count()
    );
    linked
}

pub fn export_table(table: &ReturnsTable, output: &Path, formats: &[TableFormat]) -> Result<()> {
    for format in formats {
        match format {
            TableFormat::Csv => CsvExporter::new(output.to_path_buf()).export(table)?,
            TableFormat::Json => JsonExporter::new(output.to_path_buf()).export(table)?,
        }
    }
    Ok(())
}
