mod analysis;
mod cli;
mod config;
mod error;
mod export;
mod graph;
mod output;
mod parser;
mod query;
mod resolver;
mod walker;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use analysis::analyze;
use cli::Cli;
use config::{CONFIG_FILE_NAME, ModcyclesConfig, ScanConfig};
use output::print_summary;
use query::output::{DisplayNames, format_report};

/// Environment variable holding a `tracing` filter directive, e.g. `modcycles=trace`.
const LOG_ENV: &str = "MODCYCLES_LOG";

/// Exit status when `--strict` is set and cycles were found.
const EXIT_CYCLES_FOUND: u8 = 2;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let mut config = load_config(cli.config.as_deref(), &cwd)?;
    cli.apply(&mut config, &cwd)?;

    let analysis = analyze(&config).map_err(|err| {
        let hint = if err.is_missing_root() {
            " (pass ROOT or set `root` in modcycles.toml)"
        } else {
            ""
        };
        anyhow::Error::new(err).context(format!("cannot scan {}{hint}", config.root.display()))
    })?;

    let names = DisplayNames::new(&analysis.root, &config.root);
    let report = format_report(&analysis, &names, &cli.format).context("failed to render report")?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;

    if cli.stats {
        print_summary(&analysis.stats);
    }

    if config.strict && !analysis.cycles.is_empty() {
        return Ok(ExitCode::from(EXIT_CYCLES_FOUND));
    }
    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so the report on stdout stays clean for piping.
/// `MODCYCLES_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,modcycles=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// An explicit `--config` must load; the implicit `modcycles.toml` is best-effort.
fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<ScanConfig> {
    match explicit {
        Some(path) => {
            let file = ModcyclesConfig::load_file(path)?;
            let absolute = cwd.join(path);
            let base_dir = absolute.parent().unwrap_or(cwd);
            tracing::debug!(path = %path.display(), "loaded config file");
            Ok(ScanConfig::from_file(file, base_dir))
        }
        None => {
            if cwd.join(CONFIG_FILE_NAME).exists() {
                tracing::debug!(file = CONFIG_FILE_NAME, "loading config from working directory");
            }
            Ok(ScanConfig::from_file(ModcyclesConfig::load(cwd), cwd))
        }
    }
}
