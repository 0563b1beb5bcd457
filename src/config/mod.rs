use std::time::Duration;

use serde::Deserialize;

use crate::services::ledger::RetryPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_environment")]
    pub environment: String,

    // Blockchain settings
    pub rpc_url: String,
    pub chain_id: u64,
    pub arena_contract_address: String,
    pub signer_private_key: String,

    // Ledger write retry settings
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_ledger_timeout_secs")]
    pub ledger_timeout_secs: u64,

    // Optional local history database
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_ledger_timeout_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }

    /// Retry policy for ledger writes.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    /// Upper bound on a single ledger call.
    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_secs(self.ledger_timeout_secs)
    }

    /// Check if local history recording is configured
    pub fn has_history_config(&self) -> bool {
        self.database_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}
