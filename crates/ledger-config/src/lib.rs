//! Configuration for the ledger client.
//!
//! Configuration is loaded from TOML. String values may reference
//! environment variables as `${VAR}` or `${VAR:-default}`; these are
//! resolved before parsing so that endpoints and chain ids can be injected
//! per deployment.

use ledger_types::ChainId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the ledger client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Client identity settings.
	pub client: ClientConfig,
	/// Transaction confirmation defaults.
	#[serde(default)]
	pub wait: WaitConfig,
	/// Transport implementations and which one to use.
	pub transport: TransportConfig,
}

/// Client identity settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
	/// Chain the client expects every response to come from.
	pub chain_id: ChainId,
}

/// Defaults for waiting on submitted transactions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WaitConfig {
	/// Interval between two lookups of a pending transaction.
	/// Defaults to 500 milliseconds.
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Upper bound on how long a wait may take when the caller does not
	/// pass a timeout. Defaults to 30 seconds.
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
}

impl WaitConfig {
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds)
	}
}

impl Default for WaitConfig {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval_ms(),
			timeout_seconds: default_timeout_seconds(),
		}
	}
}

fn default_poll_interval_ms() -> u64 {
	500
}

fn default_timeout_seconds() -> u64 {
	30
}

/// Configuration for transport implementations.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of transport implementation names to their configurations.
	/// Each implementation has its own configuration format stored as raw TOML values.
	pub implementations: HashMap<String, toml::Value>,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut output = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		output.push_str(&input[last_end..full_match.start()]);
		output.push_str(&value);
		last_end = full_match.end();
	}
	output.push_str(&input[last_end..]);

	Ok(output)
}

impl Config {
	/// Loads configuration from a file, resolving environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;
		content.parse()
	}

	/// Validates the configuration.
	///
	/// - The primary transport must name a configured implementation
	/// - The poll interval and the default timeout must be positive
	fn validate(&self) -> Result<(), ConfigError> {
		if self.transport.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Primary transport cannot be empty".into(),
			));
		}

		if !self
			.transport
			.implementations
			.contains_key(&self.transport.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary transport '{}' not found in transport.implementations",
				self.transport.primary
			)));
		}

		if self.wait.poll_interval_ms == 0 {
			return Err(ConfigError::Validation(
				"wait.poll_interval_ms must be greater than 0".into(),
			));
		}

		if self.wait.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"wait.timeout_seconds must be greater than 0".into(),
			));
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	const MINIMAL: &str = r#"
[client]
chain_id = 2

[transport]
primary = "http"
[transport.implementations.http]
url = "http://localhost:8080"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("LEDGER_TEST_HOST", "localhost");
		std::env::set_var("LEDGER_TEST_PORT", "8080");

		let input = "url = \"http://${LEDGER_TEST_HOST}:${LEDGER_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "url = \"http://localhost:8080\"");

		std::env::remove_var("LEDGER_TEST_HOST");
		std::env::remove_var("LEDGER_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "url = \"${LEDGER_TEST_MISSING_URL:-http://localhost:9000}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "url = \"http://localhost:9000\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "url = \"${LEDGER_TEST_UNDEFINED_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("LEDGER_TEST_UNDEFINED_VAR"));
	}

	#[test]
	fn test_minimal_config_uses_wait_defaults() {
		let config: Config = MINIMAL.parse().unwrap();

		assert_eq!(config.client.chain_id, ChainId::TESTNET);
		assert_eq!(config.wait.poll_interval(), Duration::from_millis(500));
		assert_eq!(config.wait.timeout(), Duration::from_secs(30));
		assert_eq!(config.transport.primary, "http");
	}

	#[test]
	fn test_chain_id_out_of_range_rejected() {
		let config_str = MINIMAL.replace("chain_id = 2", "chain_id = 300");
		let result = Config::from_str(&config_str);
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}

	#[test]
	fn test_unknown_primary_transport_rejected() {
		let config_str = MINIMAL.replace("primary = \"http\"", "primary = \"grpc\"");
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(
			err.to_string().contains("Primary transport 'grpc' not found"),
			"unexpected error: {}",
			err
		);
	}

	#[test]
	fn test_zero_poll_interval_rejected() {
		let config_str = format!("{}\n[wait]\npoll_interval_ms = 0\n", MINIMAL);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("poll_interval_ms"));
	}

	#[tokio::test]
	async fn test_from_file_resolves_env_vars() {
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("client.toml");

		std::env::set_var("LEDGER_TEST_CHAIN_ID", "4");
		let config_content = r#"
[client]
chain_id = ${LEDGER_TEST_CHAIN_ID}

[wait]
poll_interval_ms = 100
timeout_seconds = 5

[transport]
primary = "http"
[transport.implementations.http]
url = "${LEDGER_TEST_RPC_URL:-http://testnet.local/v1}"
"#;
		fs::write(&config_path, config_content).unwrap();

		let config = Config::from_file(&config_path).await.unwrap();
		std::env::remove_var("LEDGER_TEST_CHAIN_ID");

		assert_eq!(config.client.chain_id, ChainId::TESTING);
		assert_eq!(config.wait.poll_interval(), Duration::from_millis(100));
		assert_eq!(config.wait.timeout(), Duration::from_secs(5));
		let http = &config.transport.implementations["http"];
		assert_eq!(
			http.get("url").and_then(|v| v.as_str()),
			Some("http://testnet.local/v1")
		);
	}

	#[tokio::test]
	async fn test_from_file_missing_file() {
		let temp_dir = TempDir::new().unwrap();
		let result = Config::from_file(temp_dir.path().join("missing.toml")).await;
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
