#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `ccdtiming`: apply CCD timing settings from a TOML config.

mod cli;
mod commands;
mod error_fmt;

use ccd_config::{Config, Logging};
use clap::Parser;
use eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

/// Install the subscriber. The returned guard flushes the file layer on drop
/// and must outlive every event that should reach the file.
fn init_tracing(
    json: bool,
    level: Option<&str>,
    logging: Option<&Logging>,
) -> Result<Option<WorkerGuard>> {
    // RUST_LOG, then --log-level, then [logging] level, then info
    let level = level
        .or_else(|| logging.and_then(|l| l.level.as_deref()))
        .unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let mut guard = None;
    let file = match logging.and_then(|l| l.file.as_deref()) {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {path:?}"))?;
            let appender = match logging.and_then(|l| l.rotation.as_deref()) {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, file_guard) = tracing_appender::non_blocking(appender);
            guard = Some(file_guard);
            Some(fmt::layer().json().with_writer(writer).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;
    Ok(guard)
}

fn require(cfg: Option<&Config>) -> Result<&Config> {
    cfg.ok_or_else(|| eyre::eyre!("config required for this command"))
}

fn run(cli: &Cli, cfg: Option<&Config>) -> Result<()> {
    match &cli.cmd {
        Commands::Encode { us } => commands::run_encode(*us, cli.json),
        Commands::Apply => commands::run_apply(require(cfg)?, cli.json),
        Commands::Set { setting, us, gain } => {
            commands::run_set(require(cfg)?, *setting, *us, *gain, cli.json)
        }
        Commands::SelfCheck => commands::run_self_check(require(cfg)?, cli.json),
    }
}

/// Print `err`, flush the log file and exit with the error's code.
fn report(err: &eyre::Report, guard: Option<WorkerGuard>) -> ! {
    let json = JSON_MODE.get().copied().unwrap_or(false);
    tracing::error!(error = %err, "command failed");
    if json {
        println!("{}", format_error_json(err));
    } else {
        eprintln!("{}", humanize(err));
    }
    // process::exit skips destructors
    drop(guard);
    std::process::exit(exit_code_for_error(err));
}

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if !cli.json {
        let _ = color_eyre::install();
    }

    let loaded = if cli.cmd.needs_config() {
        Some(ccd_config::load_file(&cli.config))
    } else {
        None
    };
    let logging = loaded
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|c| &c.logging);
    let guard = match init_tracing(cli.json, cli.log_level.as_deref(), logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            None
        }
    };

    let cfg = match loaded.transpose() {
        Ok(cfg) => cfg,
        Err(e) => report(&e, guard),
    };
    if let Some(cfg) = &cfg {
        tracing::debug!(path = ?cli.config, target_board = cfg.board.target, "config loaded");
    }

    if let Err(e) = run(&cli, cfg.as_ref()) {
        report(&e, guard);
    }
    drop(guard);
}
