use anyhow::{Context, Result};
use appsec_kpi::{
    chart,
    config::{KpiConfig, Overrides},
    metrics::{self, Metric},
    report::{self, OutputFormat},
    RecordSet,
};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const EXAMPLES: &str = "\
Examples:
  kpi NACV all-issues.csv
  kpi TTR all-issues.csv --created-col \"Created\" --resolved-col \"Resolved\"
  kpi NVT all-issues.csv --team-col \"Custom field (Squad Plataforma)\" --exclude-teams \"None\" \"Dev Ops\"
  kpi TTRC all-issues.csv --severity-col \"Custom field (Severity)\"";

/// Calculate AppSec KPIs from a CSV file.
#[derive(Parser, Debug)]
#[command(name = "kpi", version, after_help = EXAMPLES)]
struct Args {
    /// The KPI to calculate
    #[arg(value_enum, ignore_case = true)]
    metric: Metric,

    /// Path to the CSV file
    csv_file: PathBuf,

    #[command(flatten)]
    overrides: Overrides,

    /// YAML file with column names and team exclusions
    #[arg(long, env = "KPI_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Skip the NVT/TTRC chart
    #[arg(long)]
    no_chart: bool,
}

fn main() -> ExitCode {
    // ─── logging goes to stderr; stdout is the report ────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    // ─── 1) layer config: flags > file > defaults ────────────────────
    let mut config = match &args.config {
        Some(path) => KpiConfig::from_yaml_file(path)?,
        None => KpiConfig::default(),
    };
    config.apply(args.overrides);

    // ─── 2) load records ─────────────────────────────────────────────
    info!(metric = %args.metric, path = %args.csv_file.display(), "loading records");
    let records = RecordSet::from_path(&args.csv_file)?;
    info!(rows = records.len(), columns = records.headers().len(), "loaded");

    // ─── 3) compute + print ──────────────────────────────────────────
    let report = metrics::compute(args.metric, &records, &config)?;
    match args.format {
        OutputFormat::Text => {
            if !args.no_chart {
                if let Some(c) = chart::for_report(&report) {
                    println!("{c}");
                }
            }
            println!("{}", report::render_text(&report));
        }
        OutputFormat::Json => {
            let json = report::render_json(&report).context("serializing report")?;
            println!("{json}");
        }
    }
    Ok(())
}
