//! Scan extracted CAS text and print the analysis as JSON.
//!
//! # Usage
//!
//! ```bash
//! cas_scan statement.txt --pretty
//! pdftotext cas.pdf - | cas_scan - --years 3
//! RUST_LOG=debug cas_scan statement.txt --settings settings.json
//! ```

use anyhow::{Context, Result};
use cas_scan::scan::scan_statement;
use cas_scan::settings::AnalysisSettings;
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cas_scan", version, about = "Extract mutual fund holdings from CAS text")]
struct Args {
    /// Statement text file, or `-` for stdin
    input: String,

    /// JSON settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Holding period in years (overrides the settings file)
    #[arg(short, long)]
    years: Option<f64>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut settings = match &args.settings {
        Some(path) => AnalysisSettings::load(path)?,
        None => AnalysisSettings::default(),
    };
    if let Some(years) = args.years {
        settings.holding_period_years = years;
        settings.validate()?;
    }

    let text = read_input(&args.input)?;
    log::info!("Read {} bytes from {}", text.len(), args.input);

    let report = scan_statement(&text, &settings).context("Failed to scan statement")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read statement from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}
