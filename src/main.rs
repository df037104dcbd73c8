use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use version_lookup::check::run_check;
use version_lookup::config::{LookupConfig, log_path};
use version_lookup::version::compare_versions;

#[derive(Parser)]
#[command(name = "version-lookup")]
#[command(version, about = "Version lookup and comparison for packaged artifacts")]
struct Cli {
    /// JSON lookup configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to the default log file instead of stderr
    #[arg(long, global = true)]
    log: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up and validate the version of an artifact or a directory of artifacts
    Check { path: PathBuf },
    /// Compare two version strings
    Compare { a: String, b: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log_file.clone().or_else(|| cli.log.then(log_path));
    let _guard = init_logging(log_file.as_deref(), cli.log_json)?;

    let config = match &cli.config {
        Some(path) => LookupConfig::from_file(path)?,
        None => LookupConfig::default(),
    };

    match cli.command {
        Command::Check { path } => {
            let stdout = std::io::stdout();
            run_check(&path, &config, &mut stdout.lock())?;
        }
        Command::Compare { a, b } => {
            let symbol = match compare_versions(&a, &b)? {
                Ordering::Less => "<",
                Ordering::Equal => "==",
                Ordering::Greater => ">",
            };
            println!("{} {} {}", a, symbol, b);
        }
    }

    Ok(())
}

fn init_logging(log_file: Option<&Path>, json: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path {:?}", path))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(guard.is_none());
    let layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    tracing_subscriber::registry().with(layer).with(filter).init();

    Ok(guard)
}
