//! Feeder configuration with TOML file support.

use feeder_types::{Coin, StdFee, DEFAULT_GAS};
use feeder_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::coordinator::RetryPolicy;
use crate::OracleError;

/// Configuration for the feeder.
///
/// Loaded from a TOML file via [`OracleConfig::from_toml_file`] or built
/// programmatically. The mnemonic is never part of it; it comes from the
/// command line or environment only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Tendermint RPC endpoint for queries and broadcasts.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Websocket endpoint for the block subscription.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    #[serde(default)]
    pub chain_id: String,

    /// Bech32 operator address of the validator being fed for.
    #[serde(default)]
    pub validator: String,

    /// Human-readable address prefix (`terra` → `terra1...`, `terravaloper1...`).
    #[serde(default = "default_bech32_prefix")]
    pub bech32_prefix: String,

    #[serde(default = "default_fee_denom")]
    pub fee_denom: String,

    #[serde(default = "default_fee_amount")]
    pub fee_amount: u64,

    #[serde(default = "default_gas")]
    pub gas: u64,

    /// `fixed:<decimal>` or an HTTP(S) base URL.
    #[serde(default = "default_price_source")]
    pub price_source: String,

    /// Overall run deadline in seconds; 0 runs until the stream ends.
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,

    /// Broadcast attempts per submission.
    #[serde(default = "default_submit_attempts")]
    pub submit_attempts: u32,

    /// Wait before the first retry; doubles per attempt.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "http://127.0.0.1:26657".to_string()
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:26657/websocket".to_string()
}

fn default_bech32_prefix() -> String {
    "terra".to_string()
}

fn default_fee_denom() -> String {
    "ukrw".to_string()
}

fn default_fee_amount() -> u64 {
    750
}

fn default_gas() -> u64 {
    DEFAULT_GAS
}

fn default_price_source() -> String {
    "fixed:0.10".to_string()
}

fn default_run_timeout_secs() -> u64 {
    500
}

fn default_submit_attempts() -> u32 {
    1
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl OracleConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, OracleError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| OracleError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, OracleError> {
        toml::from_str(s).map_err(|e| OracleError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, OracleError> {
        toml::to_string_pretty(self).map_err(|e| OracleError::Config(e.to_string()))
    }

    /// Check the fields that have no usable default.
    pub fn validate(&self) -> Result<(), OracleError> {
        if self.chain_id.is_empty() {
            return Err(OracleError::Config("chain_id is required".into()));
        }
        if self.validator.is_empty() {
            return Err(OracleError::Config("validator is required".into()));
        }
        if self.gas == 0 {
            return Err(OracleError::Config("gas must be positive".into()));
        }
        Ok(())
    }

    pub fn fee(&self) -> StdFee {
        StdFee::new(Coin::new(u128::from(self.fee_amount), self.fee_denom.clone()), self.gas)
    }

    /// `None` means no deadline.
    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_secs > 0).then(|| Duration::from_secs(self.run_timeout_secs))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_attempts(
            self.submit_attempts.max(1),
            Duration::from_millis(self.retry_backoff_ms),
        )
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            ws_url: default_ws_url(),
            chain_id: String::new(),
            validator: String::new(),
            bech32_prefix: default_bech32_prefix(),
            fee_denom: default_fee_denom(),
            fee_amount: default_fee_amount(),
            gas: default_gas(),
            price_source: default_price_source(),
            run_timeout_secs: default_run_timeout_secs(),
            submit_attempts: default_submit_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = OracleConfig {
            chain_id: "soju-0008".into(),
            ..OracleConfig::default()
        };
        let toml_str = config.to_toml_string().unwrap();
        let parsed = OracleConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.chain_id, "soju-0008");
        assert_eq!(parsed.fee_amount, 750);
        assert_eq!(parsed.log_format, LogFormat::Human);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = OracleConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.gas, 50_000);
        assert_eq!(config.run_timeout(), Some(Duration::from_secs(500)));
        assert_eq!(config.retry_policy().max_attempts, 1);
        assert_eq!(config.price_source, "fixed:0.10");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            chain_id = "columbus-2"
            validator = "terravaloper1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn9a88r2"
            run_timeout_secs = 0
            submit_attempts = 3
            log_format = "json"
        "#;
        let config = OracleConfig::from_toml_str(toml).expect("should parse");
        assert!(config.validate().is_ok());
        assert_eq!(config.run_timeout(), None);
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.rpc_url, "http://127.0.0.1:26657"); // default
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        let config = OracleConfig::default();
        assert!(matches!(config.validate(), Err(OracleError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chain_id = \"soju-0008\"\nfee_amount = 1000").unwrap();
        let config = OracleConfig::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.fee().amount[0].amount, 1000);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = OracleConfig::from_toml_file("/nonexistent/feeder.toml");
        assert!(matches!(result, Err(OracleError::Config(_))));
    }
}
