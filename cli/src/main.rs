//! fxconv CLI
//!
//! Converts amounts between currencies using the built-in rate table.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxconv_fx::{ConversionRequest, FxError, RateTable};

mod config;

use config::{CliConfig, RateOverride};

/// fxconv CLI
#[derive(Parser, Debug)]
#[command(name = "fxconv")]
#[command(about = "Convert amounts between currencies using static exchange rates")]
struct Args {
    /// Override or add a rate, as CODE=RATE (repeatable)
    #[arg(long = "rate", global = true)]
    rates: Vec<RateOverride>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert AMOUNT from one currency to another
    Convert {
        /// Amount to convert
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Source currency code
        from: String,
        /// Target currency code
        to: String,
    },
    /// List registered currencies and their rates
    Rates,
}

/// Error body for `--json` output.
#[derive(Debug, Serialize)]
struct ErrorOutput<'a> {
    code: &'a str,
    message: String,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = CliConfig::from_env()?;
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.rate_overrides.extend(args.rates.iter().cloned());

    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    init_logging(&config);

    let table = config.rate_table()?;
    debug!(currencies = table.len(), "Rate table ready");

    let stdout = io::stdout();
    let stderr = io::stderr();
    let ok = run(&args.command, &table, args.json, &mut stdout.lock(), &mut stderr.lock())?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_logging(config: &CliConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

/// Execute a command, writing results to `out` and user errors to `err`.
///
/// Returns false when the conversion was rejected.
fn run(
    command: &Command,
    table: &RateTable,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<bool> {
    match command {
        Command::Convert { amount, from, to } => {
            match ConversionRequest::from_text(amount, from, to).execute(table) {
                Ok(conversion) => {
                    info!(
                        from = %conversion.from,
                        to = %conversion.to,
                        converted = conversion.converted,
                        "Converted amount"
                    );
                    if json {
                        writeln!(out, "{}", serde_json::to_string(&conversion)?)?;
                    } else {
                        writeln!(out, "{}", conversion)?;
                    }
                    Ok(true)
                }
                Err(e) => {
                    report_error(&e, json, err)?;
                    Ok(false)
                }
            }
        }
        Command::Rates => {
            if json {
                writeln!(out, "{}", serde_json::to_string(table)?)?;
            } else {
                for (code, rate) in table.iter() {
                    writeln!(out, "{} {}", code, rate)?;
                }
            }
            Ok(true)
        }
    }
}

fn report_error(e: &FxError, json: bool, err: &mut impl Write) -> anyhow::Result<()> {
    warn!(error = %e, code = e.error_code(), "Conversion rejected");

    if json {
        let body = ErrorOutput {
            code: e.error_code(),
            message: e.user_message(),
        };
        writeln!(err, "{}", serde_json::to_string(&body)?)?;
    } else {
        writeln!(err, "Error: {}", e.user_message())?;
    }
    Ok(())
}
