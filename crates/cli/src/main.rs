mod render;

use clap::{Args, Parser, ValueEnum};
use onco_core::constants::{
    ADJUVANT_MAX_YEARS_ENV, ADJUVANT_MIN_YEARS_ENV, AS_OF_ENV, RECORDS_PATH_ENV,
};
use onco_core::{
    build_report, resolve_core_config, ConfigValues, InMemoryRecordSource, OncologyError,
    RuleEngine,
};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit code when the requested patient id is not in the record source. Distinct from clap's
/// usage-error code 2.
const EXIT_NOT_FOUND: u8 = 3;

#[derive(Debug, Parser)]
#[command(name = "onco")]
#[command(about = "Breast cancer guideline compliance checker")]
struct Cli {
    #[command(flatten)]
    mode: Mode,

    /// YAML or JSON records file (defaults to ONCO_RECORDS_PATH, then the demonstration set)
    #[arg(long, value_name = "PATH")]
    records: Option<String>,

    /// Reference date treated as today (defaults to ONCO_AS_OF, then the system date)
    #[arg(long, value_name = "YYYY-MM-DD")]
    as_of: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct Mode {
    /// Evaluate a single patient by id
    #[arg(long, value_name = "ID")]
    patient: Option<String>,
    /// Evaluate every patient
    #[arg(long)]
    all: bool,
    /// Population compliance report
    #[arg(long)]
    report: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            match e.downcast_ref::<OncologyError>() {
                Some(OncologyError::NotFound(_)) => ExitCode::from(EXIT_NOT_FOUND),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so JSON output on stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("onco=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let values = ConfigValues {
        records_path: cli.records.or_else(|| std::env::var(RECORDS_PATH_ENV).ok()),
        as_of: cli.as_of.or_else(|| std::env::var(AS_OF_ENV).ok()),
        adjuvant_min_years: std::env::var(ADJUVANT_MIN_YEARS_ENV).ok(),
        adjuvant_max_years: std::env::var(ADJUVANT_MAX_YEARS_ENV).ok(),
    };
    let config = resolve_core_config(values, chrono::Local::now().date_naive())?;
    let source = InMemoryRecordSource::from_optional_path(config.records_path())?;
    let engine = RuleEngine::from_config(&config);
    tracing::debug!(
        "Evaluating {} records as of {}",
        source.len(),
        config.as_of()
    );

    if let Some(id) = cli.mode.patient {
        let evaluation = engine.evaluate_patient(&source, &id)?;
        match cli.format {
            Format::Text => print!("{}", render::evaluation(&evaluation)),
            Format::Json => println!("{}", serde_json::to_string_pretty(&evaluation)?),
        }
    } else if cli.mode.all {
        let evaluations = engine.evaluate_source(&source)?;
        match cli.format {
            Format::Text => {
                for evaluation in &evaluations {
                    print!("{}", render::evaluation(evaluation));
                }
            }
            Format::Json => println!("{}", serde_json::to_string_pretty(&evaluations)?),
        }
    } else {
        let evaluations = engine.evaluate_source(&source)?;
        let report = build_report(engine.registry(), &evaluations);
        match cli.format {
            Format::Text => print!("{}", render::report(&report, config.as_of())),
            Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
    }

    Ok(())
}
