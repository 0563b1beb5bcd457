use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod blockchain;
mod config;
mod db;
mod models;
mod services;
mod utils;

use crate::blockchain::ArenaClient;
use crate::config::AppConfig;
use crate::db::Database;
use crate::services::ledger::LedgerWriter;
use crate::services::tournament::{history::TournamentHistory, TournamentService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tournament_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    tracing::info!("Starting tournament settlement v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.environment);

    // The arena contract is both roster source and settlement target
    let arena = ArenaClient::new(
        &config.rpc_url,
        &config.signer_private_key,
        &config.arena_contract_address,
        config.chain_id,
    )?;
    tracing::info!(
        "Arena client initialized for chain_id={}, contract={}",
        config.chain_id,
        config.arena_contract_address
    );

    // Optional local history recording
    let history = if config.has_history_config() {
        let url = config.database_url.as_deref().unwrap_or_default();
        match Database::connect(url).await {
            Ok(database) => {
                let history = TournamentHistory::new(database.pool.clone());
                history.ensure_schema().await?;
                tracing::info!("Local tournament history enabled");
                Some(history)
            }
            Err(e) => {
                tracing::warn!("History database unavailable, continuing without: {}", e);
                None
            }
        }
    } else {
        tracing::info!("Local tournament history disabled (no DATABASE_URL)");
        None
    };

    let writer = LedgerWriter::new(arena.clone(), config.retry_policy(), config.ledger_timeout());
    let service = TournamentService::new(arena, writer, history);

    match service.run().await? {
        Some(report) => {
            tracing::info!(
                "Tournament settled: champion {}, {} participants, {} matches over {} rounds, prize pool {:.2}",
                report.champion,
                report.participants,
                report.total_matches,
                report.rounds,
                report.prize_pool
            );
        }
        None => {
            tracing::info!("Tournament skipped, waiting for the next scheduled run");
        }
    }

    Ok(())
}
