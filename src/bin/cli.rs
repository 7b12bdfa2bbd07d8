//! examboard CLI
//!
//! Local execution entry point. The surrounding web application embeds the
//! same library and spawns the scheduler at startup; this binary exposes the
//! loop, the on-demand pass and the read façade directly.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use examboard::{
    error::Result,
    models::{Board, Config, ContentKind, Tier},
    pipeline::{Collector, Scheduler},
    registry::BoardRegistry,
    store::ExamStore,
};

/// examboard - GCSE exam board content crawler
#[derive(Parser, Debug)]
#[command(name = "examboard", version, about = "Exam board content crawler")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "examboard.toml")]
    config: PathBuf,

    /// Override the database location (also: DATABASE_URL)
    #[arg(short, long)]
    database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the background scheduler loop (one pass per interval)
    Run,

    /// Run one full collection pass and exit
    Collect,

    /// Harvest raw links from one board page into board_links
    Harvest {
        #[arg(long)]
        board: Board,

        #[arg(long)]
        kind: ContentKind,
    },

    /// Print stored records for a board/tier/kind as JSON
    Query {
        #[arg(long)]
        board: Board,

        #[arg(long)]
        tier: Tier,

        #[arg(long)]
        kind: ContentKind,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    if let Command::Validate = cli.command {
        config.validate()?;
        log::info!("Config OK");
        return Ok(());
    }

    let db_url = cli
        .database
        .clone()
        .unwrap_or_else(|| config.database.effective_url());
    let store = ExamStore::open(&db_url)?;
    log::info!("Opened store at {}", db_url);

    let registry = BoardRegistry::gcse_defaults();
    let collector = Collector::new(&config, registry, store.clone())?;

    match cli.command {
        Command::Run => {
            log::info!(
                "Starting scheduler: one pass every {} days",
                config.schedule.interval_days
            );
            Scheduler::with_interval_days(collector, config.schedule.interval_days)
                .run()
                .await;
        }

        Command::Collect => {
            let stats = collector.collect_all().await;
            log::info!(
                "Pass complete: {} stored, {} skipped, {} stage failures",
                stats.stored(),
                stats.skipped(),
                stats.failures()
            );
        }

        Command::Harvest { board, kind } => {
            let outcome = collector.harvest_links(board, kind).await;
            log::info!(
                "Harvest {}/{}: {} found, {} new, {} seen ({:?})",
                board,
                kind,
                outcome.found,
                outcome.stored,
                outcome.skipped,
                outcome.result
            );
        }

        Command::Query { board, tier, kind } => {
            let records = store.query(board, tier, kind)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Command::Validate => unreachable!(),
    }

    Ok(())
}
