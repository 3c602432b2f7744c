use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use spendmail_core::{CsvSink, JsonlSink, KeyedTransaction, TransactionSink, read_csv, summarize};
use spendmail_ingest::{BatchReport, MailExtractor, ParseOptions, TimestampPolicy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod pool;
mod state;

use config::{Config, OutputFormat, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "spendmail",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SPENDMAIL_BUILD_SHA"), ")"),
    about = "Turn bank alert emails into transactions"
)]
struct Cli {
    /// Config file (default: ~/.spendmail/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Zero unparseable Date headers instead of failing the message
    #[arg(long, global = true)]
    lenient_time: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse exported messages and print transactions as JSON lines
    Parse {
        /// One message per line: {"id","raw"} objects or bare base64url payloads
        file: PathBuf,
    },

    /// Parse exported messages and store them in the configured sink
    Ingest {
        file: PathBuf,

        /// Output file (overrides config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output format (overrides config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Parse workers (overrides config)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Print spend totals from an expenses CSV
    Summary {
        csv: PathBuf,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = load_config(cli.config.as_deref())?;
    if cli.lenient_time {
        cfg.parse.timestamp_policy = TimestampPolicy::Lenient;
    }

    match cli.command {
        Command::Parse { file } => {
            parse_to_stdout(&cfg, &file).await?;
        }

        Command::Ingest {
            file,
            out,
            format,
            workers,
        } => {
            if let Some(out) = out {
                cfg.output.path = out;
            }
            if let Some(format) = format {
                cfg.output.format = format;
            }
            if let Some(workers) = workers {
                cfg.batch.workers = workers;
            }

            let report = ingest(&cfg, &file).await?;
            println!(
                "Parsed {} | stored {} | duplicates {} | failed {}",
                report.parsed,
                report.stored,
                report.duplicates,
                report.failed()
            );
            for f in &report.failures {
                println!("- {}: {}", f.message_id, f.error);
            }
            println!("Output: {}", cfg.output.path.display());
        }

        Command::Summary { csv } => {
            if !csv.exists() {
                bail!("CSV not found: {}", csv.display());
            }
            let records = read_csv(&csv).with_context(|| format!("reading {}", csv.display()))?;
            let groups = summarize(&records);

            println!("{} transactions from {}\n", records.len(), csv.display());
            for g in &groups {
                println!("{}", g.line());
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn extractor(cfg: &Config) -> Result<Arc<MailExtractor>> {
    let options = ParseOptions {
        timestamp_policy: cfg.parse.timestamp_policy,
    };
    Ok(Arc::new(MailExtractor::new(options)?))
}

fn open_sink(cfg: &Config) -> Result<Box<dyn TransactionSink>> {
    let path = &cfg.output.path;
    let sink: Box<dyn TransactionSink> = match cfg.output.format {
        OutputFormat::Csv => Box::new(CsvSink::open(path)?),
        OutputFormat::Jsonl => Box::new(JsonlSink::open(path)?),
    };
    Ok(sink)
}

async fn parse_to_stdout(cfg: &Config, file: &Path) -> Result<()> {
    let messages = input::read_messages(file)?;
    let total = messages.len();
    let results = pool::parse_all(extractor(cfg)?, messages, cfg.batch.workers).await?;

    let mut failed = 0;
    for (id, result) in results {
        match result {
            Ok(t) => println!("{}", serde_json::to_string(&KeyedTransaction::new(id, t))?),
            Err(e) => {
                failed += 1;
                warn!(message_id = %id, error = %e, "skipping message");
            }
        }
    }
    info!(total, failed, "parse complete");
    Ok(())
}

async fn ingest(cfg: &Config, file: &Path) -> Result<BatchReport> {
    let messages = input::read_messages(file)?;
    info!(count = messages.len(), file = %file.display(), "ingesting");

    let results = pool::parse_all(extractor(cfg)?, messages, cfg.batch.workers).await?;

    let mut sink = open_sink(cfg)?;
    let mut report = BatchReport::default();
    for (id, result) in results {
        report.record(sink.as_mut(), id, result)?;
    }
    sink.flush()?;
    Ok(report)
}
