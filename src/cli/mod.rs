//! Command-line front end for the tax engine.
//!
//! This module holds everything outside the calculation itself: reading the
//! monthly income, choosing the configuration source, logging setup, and
//! rendering the report.

mod input;
mod logging;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use tracing::info;

use crate::calculation::TaxCalculator;
use crate::config::{ConfigLoader, TaxYearStore};

pub use input::{INCOME_PROMPT, INVALID_INCOME_HINT, parse_formatted_income, prompt_income};
pub use logging::{DEFAULT_LOG_FILTER, init_logging, make_filter};
pub use report::{format_currency, format_fraction, format_percentage, render_json, render_text};

/// Tax year used when `--year` is not given.
pub const DEFAULT_TAX_YEAR: i32 = 2025;

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Titled tables.
    Text,
    /// The audited calculation as JSON.
    Json,
}

/// Calculate Colombian income tax and social-security contributions.
#[derive(Parser, Debug)]
#[command(name = "colombia-tax")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Tax year whose configuration is used
    #[arg(short, long, default_value_t = DEFAULT_TAX_YEAR)]
    pub year: i32,

    /// Monthly income in COP (e.g. 15.000.000); prompts when omitted
    #[arg(short, long)]
    pub income: Option<String>,

    /// Directory of tax year YAML files to use instead of the built-in set
    #[arg(short, long)]
    pub config_dir: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log filter directive (e.g. "debug"); overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Runs one calculation as described by `args`, printing the report.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let loader = match &args.config_dir {
        Some(dir) => ConfigLoader::load(dir)
            .with_context(|| format!("Failed to load tax years from {}", dir.display()))?,
        None => ConfigLoader::builtin().context("Failed to load built-in tax years")?,
    };

    let calculator = TaxCalculator::new(&loader, args.year).with_context(|| {
        format!(
            "Tax year {} is not available (available: {:?})",
            args.year,
            loader.years()
        )
    })?;

    let monthly_income = match &args.income {
        Some(raw) => parse_formatted_income(raw)?,
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if args.format == OutputFormat::Text {
                writeln!(out, "Calculadora de Impuestos Colombia {}", args.year)?;
                writeln!(out, "=====================================")?;
            }
            match prompt_income(io::stdin().lock(), &mut out)? {
                Some(amount) => amount,
                None => bail!("No monthly income was entered"),
            }
        }
    };

    let calculation = calculator.calculate_with_audit(monthly_income)?;
    info!(
        calculation_id = %calculation.calculation_id,
        year = calculation.tax_year,
        "Rendering report"
    );

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&calculation.breakdown)),
        OutputFormat::Json => println!("{}", render_json(&calculation)?),
    }

    Ok(())
}
