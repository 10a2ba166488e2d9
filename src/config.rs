use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dry_run: DryRunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of the ledger node
    #[serde(default)]
    pub rpc_url: String,
    /// Address of the deployed voting contract
    #[serde(default)]
    pub contract_address: String,
    /// Chain id used when signing transactions
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Signing key; supply via VOTEGATE_LEDGER__PRIVATE_KEY, never in a file
    #[serde(default)]
    pub private_key: Option<String>,
}

fn default_chain_id() -> u64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// How long to wait for a submitted transaction to confirm, in milliseconds
    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout_ms: u64,
    /// Polling interval for confirmation status in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_confirmation_timeout() -> u64 {
    60_000
}

fn default_poll_interval() -> u64 {
    1_000
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout_ms: default_confirmation_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl ExecutionConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DryRunConfig {
    /// Run against the in-memory ledger instead of the configured chain
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("execution.confirmation_timeout_ms", 60_000)?
            .set_default("execution.poll_interval_ms", 1_000)?
            .set_default("server.port", 3001)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("VOTEGATE_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (VOTEGATE_LEDGER__RPC_URL, etc.)
            .add_source(
                Environment::with_prefix("VOTEGATE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values. Ledger settings are only required when
    /// the gateway actually talks to a chain.
    pub fn validate(&self, dry_run: bool) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.execution.poll_interval_ms == 0 {
            errors.push("poll_interval_ms must be positive".to_string());
        }

        if self.execution.confirmation_timeout_ms < self.execution.poll_interval_ms {
            errors.push(format!(
                "confirmation_timeout_ms ({}) must not be below poll_interval_ms ({})",
                self.execution.confirmation_timeout_ms, self.execution.poll_interval_ms
            ));
        }

        if !dry_run {
            if self.ledger.rpc_url.is_empty() {
                errors.push("ledger.rpc_url is required".to_string());
            }
            if self.ledger.contract_address.is_empty() {
                errors.push("ledger.contract_address is required".to_string());
            }
            if self.ledger.private_key.is_none() {
                errors.push(
                    "ledger.private_key is required (set VOTEGATE_LEDGER__PRIVATE_KEY)".to_string(),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
