/*
[INPUT]:  CLI arguments, layered configuration (defaults, YAML, env, flags)
[OUTPUT]: Interactive TUI session or one-shot task command
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or logging setup
*/

mod cli;
mod display;
mod tui;

use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use taskdeck_console::config::LogConfig;
use taskdeck_console::{ConfigOverrides, ConsoleConfig};

use crate::cli::Command;
use crate::tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "Terminal client for the task execution service")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "base-url", value_name = "URL", global = true)]
    base_url: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    /// Print machine-readable JSON instead of tables
    #[arg(long = "json", global = true)]
    json: bool,
    /// Load and validate configuration, then exit
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

enum LogSink {
    Stderr,
    Buffer(LogBufferHandle),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let overrides = ConfigOverrides {
        base_url: args.base_url.clone(),
        log_level: args.log_level.clone(),
    };
    let config = load_config(args.config_path.as_ref(), &overrides)?;
    let command = args.command.clone().unwrap_or(Command::Tui);
    let interactive = matches!(command, Command::Tui) && !args.dry_run;

    let log_buffer: LogBufferHandle = Arc::new(StdMutex::new(LogBuffer::new(LOG_BUFFER_CAPACITY)));
    let sink = if interactive {
        LogSink::Buffer(log_buffer.clone())
    } else {
        LogSink::Stderr
    };
    let _log_guard = init_tracing(&config.log, sink)?;

    info!(
        base_url = %config.service.base_url,
        dry_run = args.dry_run,
        "starting taskdeck"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    if interactive {
        tui::run_tui(config, log_buffer).await
    } else {
        cli::run(command, &config, args.json).await
    }
}

fn load_config(path: Option<&PathBuf>, overrides: &ConfigOverrides) -> Result<ConsoleConfig> {
    ConsoleConfig::load(path.map(PathBuf::as_path), overrides).context("load config")
}

fn init_tracing(log: &LogConfig, sink: LogSink) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&log.level).context("invalid log level")?;

    let (file_layer, guard) = match &log.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .context("log.file must name a file")?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    let result = match sink {
        LogSink::Stderr => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogSink::Buffer(buffer) => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(LogWriterFactory::new(buffer)),
            )
            .try_init(),
    };
    result
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}
