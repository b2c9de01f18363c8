use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use survey_profiler::data::filter::{self, FilterState};
use survey_profiler::data::loader::load_file;
use survey_profiler::export::{export_filename, write_csv_file};
use survey_profiler::profile::{self, numeric_overview, AnalysisTier};
use survey_profiler::{CellValue, Dataset, ProfilerConfig};

#[derive(Parser)]
#[command(
    name = "survey-profiler",
    about = "Profile survey exports: column types, statistics and chart choices"
)]
pub struct Cli {
    /// Path to a JSON profiler config. Falls back to $SURVEY_PROFILER_CONFIG.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log per-column decisions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Column kinds and descriptive statistics
    Summary { file: PathBuf },
    /// Columns with missing answers, most missing first
    Missing { file: PathBuf },
    /// Columns offered for charting by default
    Columns { file: PathBuf },
    /// Chart specification for one column
    Chart {
        file: PathBuf,
        #[arg(short, long)]
        column: String,
    },
    /// Contingency table of two columns
    Crosstab {
        file: PathBuf,
        column_a: String,
        column_b: String,
    },
    /// Histograms of every numeric column
    Overview {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Tier::Quick)]
        tier: Tier,
    },
    /// Write the (optionally segmented) survey back to CSV
    Export {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Tier::Quick)]
        tier: Tier,
        /// Output path. Defaults to the tier's file name in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep rows where COLUMN equals VALUE; repeat to allow more values (full tier only)
        #[arg(long = "filter", value_name = "COLUMN=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tier {
    Quick,
    Full,
}

impl From<Tier> for AnalysisTier {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Quick => AnalysisTier::Quick,
            Tier::Full => AnalysisTier::Full,
        }
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{raw}'"))?;
    if column.trim().is_empty() {
        return Err(format!("empty column name in '{raw}'"));
    }
    Ok((column.trim().to_string(), value.to_string()))
}

pub fn run(cli: Cli) -> Result<()> {
    let config = ProfilerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Summary { file } => {
            let dataset = load(&file)?;
            print_json(&profile::profile_dataset(&dataset, &config))
        }
        Commands::Missing { file } => {
            let report = profile::missing_report(&load(&file)?);
            if report.is_empty() {
                println!("No missing data.");
                return Ok(());
            }
            print_json(&report)
        }
        Commands::Columns { file } => {
            print_json(&profile::selectable_columns(&load(&file)?, &config))
        }
        Commands::Chart { file, column } => {
            let spec = profile::select_chart(&load(&file)?, &column, &config)?;
            print_json(&spec)
        }
        Commands::Crosstab {
            file,
            column_a,
            column_b,
        } => print_json(&profile::cross_tabulate(&load(&file)?, &column_a, &column_b)?),
        Commands::Overview { file, tier } => {
            print_json(&numeric_overview(&load(&file)?, tier.into()))
        }
        Commands::Export {
            file,
            tier,
            output,
            filters,
        } => {
            let tier = AnalysisTier::from(tier);
            let dataset = load(&file)?;
            let segment = segment(&dataset, &filters, tier)?;
            let output = output.unwrap_or_else(|| PathBuf::from(export_filename(tier)));
            write_csv_file(&segment, &output)?;
            if !filters.is_empty() {
                print_json(&profile::summarize(&segment, &config))?;
            }
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<Dataset> {
    load_file(path).with_context(|| format!("loading {}", path.display()))
}

fn segment(dataset: &Dataset, filters: &[(String, String)], tier: AnalysisTier) -> Result<Dataset> {
    if filters.is_empty() {
        return Ok(dataset.clone());
    }
    if !tier.allows_segmentation() {
        bail!("segment filters need the full analysis tier");
    }

    let mut state = FilterState::new();
    for (column, value) in filters {
        if dataset.column(column).is_none() {
            bail!("filter column '{column}' not found in dataset");
        }
        state
            .entry(column.clone())
            .or_insert_with(BTreeSet::new)
            .insert(CellValue::infer(value));
    }
    Ok(filter::apply(dataset, &state))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{text}");
    Ok(())
}
