use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use housereturns::core::span_classifier::classify_all;
use housereturns::export::csv_export::{read_rows_csv, write_linked_csv};
use housereturns::incumbency::link_incumbency;
use housereturns::parser::{HtmlSpanReader, SpanSource};
use housereturns::pipeline::{build_table, export_table, PipelineConfig, TableFormat};

#[derive(Parser, Debug)]
#[command(name = "housereturns")]
#[command(version, about = "Extract U.S. House election returns and link incumbents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract candidate rows from an HTML rendition of the returns
    Extract {
        /// Input HTML file path
        input: PathBuf,

        /// Output directory (default: ./<input_name>_output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format(s) to generate
        #[arg(short, long, value_enum, default_values_t = vec![Format::Csv])]
        format: Vec<Format>,

        /// Skip the incumbency pass
        #[arg(long)]
        no_incumbency: bool,

        /// Suppress status lines
        #[arg(short, long)]
        quiet: bool,
    },

    /// Link incumbents in a previously extracted returns.csv
    Link {
        /// returns.csv written by `extract`
        input: PathBuf,

        /// Output CSV path (default: returns_with_incumbency.csv next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show span and session counts for an HTML file
    Info {
        /// Input HTML file path
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for TableFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => TableFormat::Csv,
            Format::Json => TableFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            format,
            no_incumbency,
            quiet,
        } => extract_returns(input, output, format, !no_incumbency, quiet),
        Commands::Link { input, output } => link_returns(input, output),
        Commands::Info { input } => show_info(input),
    }
}

fn extract_returns(
    input: PathBuf,
    output: Option<PathBuf>,
    formats: Vec<Format>,
    link: bool,
    quiet: bool,
) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    let output_dir = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "returns".to_string());
        PathBuf::from(format!("{stem}_output"))
    });

    if !quiet {
        println!("[*] Processing: {}", input.display());
        println!("[*] Output: {}", output_dir.display());
    }

    let config = PipelineConfig::new(input.clone(), output_dir.clone())
        .with_formats(formats.into_iter().map(TableFormat::from).collect())
        .with_incumbency(link);

    let table = build_table(&config)
        .with_context(|| format!("Failed to process returns: {}", input.display()))?;

    if !quiet {
        println!(
            "[+] {} row(s), {} diagnostic(s)",
            table.extraction.rows.len(),
            table.extraction.diagnostics.len()
        );
    }

    export_table(&table, &config.output, &config.formats)
        .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;

    if !quiet {
        println!("[✓] Done! Results saved to: {}", output_dir.display());
    }
    Ok(())
}

fn link_returns(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let rows = read_rows_csv(&input)
        .with_context(|| format!("Failed to read returns: {}", input.display()))?;
    let output = output.unwrap_or_else(|| input.with_file_name("returns_with_incumbency.csv"));

    let linked = link_incumbency(rows);
    let incumbents = linked.iter().filter(|row| row.incumbent).count();
    write_linked_csv(&output, &linked)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    println!("[✓] {} row(s), {incumbents} incumbent(s): {}", linked.len(), output.display());
    Ok(())
}

fn show_info(input: PathBuf) -> Result<()> {
    let reader = HtmlSpanReader::new(input.clone())
        .with_context(|| format!("Failed to open HTML: {}", input.display()))?;
    let spans = reader.read_spans()?;
    let classified = classify_all(&spans);

    let mut roles: BTreeMap<String, usize> = BTreeMap::new();
    for item in &classified {
        *roles.entry(format!("{:?}", item.role)).or_default() += 1;
    }

    println!("Returns Information");
    println!("===================");
    println!("File: {}", input.display());
    println!("Spans: {}", spans.len());
    for (role, count) in &roles {
        println!("  {role}: {count}");
    }
    println!(
        "Sessions: {}",
        roles.get("CongressHeader").copied().unwrap_or_default()
    );
    Ok(())
}
