use clap::Parser;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use votegate::api::{self, AppState};
use votegate::cli::{Cli, Commands};
use votegate::config::AppConfig;
use votegate::coordinator::VotingCoordinator;
use votegate::error::{Result, VotegateError};
use votegate::ledger::{EvmLedger, LedgerClient, MemoryLedger};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config_dir)?;
    init_logging(&config);

    let dry_run = cli.dry_run || config.dry_run.enabled;
    if let Err(problems) = config.validate(dry_run) {
        return Err(VotegateError::Internal(format!(
            "invalid configuration: {}",
            problems.join("; ")
        )));
    }

    let ledger: Arc<dyn LedgerClient> = if dry_run {
        warn!("dry-run mode: using the in-memory ledger, nothing reaches the chain");
        Arc::new(MemoryLedger::new())
    } else {
        Arc::new(EvmLedger::new(&config.ledger)?)
    };
    let coordinator = Arc::new(VotingCoordinator::new(ledger, &config.execution));

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            api::serve(AppState { coordinator }, port).await?;
        }
        Commands::CreateOrg { name } => {
            let outcome = coordinator.create_organization(&name).await?;
            println!(
                "organization created: id={} tx={}",
                display_id(outcome.organization_id),
                outcome.transaction_id
            );
        }
        Commands::CreatePoll {
            org,
            title,
            description,
            options,
            images,
            start,
            end,
        } => {
            // Image hashes are optional on the command line; pad so the
            // 1:1 alignment check sees one (empty) hash per option.
            let images = if images.is_empty() {
                vec![String::new(); options.len()]
            } else {
                images
            };
            let outcome = coordinator
                .create_poll(org, &title, &description, options, images, start, end)
                .await?;
            println!(
                "poll created: id={} tx={}",
                display_id(outcome.poll_id),
                outcome.transaction_id
            );
        }
        Commands::Vote { poll, option } => {
            let outcome = coordinator.vote(poll, option).await?;
            println!(
                "vote cast on poll {} option {}: tx={}",
                outcome.poll_id, outcome.option_id, outcome.transaction_id
            );
        }
        Commands::Results { poll } => {
            let results = coordinator.results(poll).await?;
            println!("poll {}: {} votes", results.poll_id, results.total());
            for (idx, count) in results.counts.iter().enumerate() {
                println!("  option {idx}: {count}");
            }
        }
    }

    Ok(())
}

fn display_id(id: Option<u64>) -> String {
    id.map(|i| i.to_string()).unwrap_or_else(|| "?".to_string())
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
