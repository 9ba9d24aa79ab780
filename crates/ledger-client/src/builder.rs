//! Builder for constructing a [`LedgerClient`] from configuration.
//!
//! The transport is chosen by name: the configuration lists transport
//! implementations with their raw settings, and the caller supplies a
//! factory per implementation name.

use crate::LedgerClient;
use ledger_config::Config;
use ledger_transport::{RpcTransport, TransportError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during client construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builds a [`LedgerClient`] with the chain id, wait defaults and primary
/// transport taken from a [`Config`].
pub struct ClientBuilder {
	config: Config,
}

impl ClientBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the client on top of an already constructed transport,
	/// ignoring the configured transport section.
	pub fn with_transport(self, transport: Arc<dyn RpcTransport>) -> LedgerClient {
		LedgerClient::new(self.config.client.chain_id, transport).with_wait_config(self.config.wait)
	}

	/// Builds the client, creating the primary transport with the factory
	/// registered under its name.
	///
	/// Only `transport.primary` is instantiated. Other configured
	/// implementations are never used by the client, so they are left alone.
	pub fn build<TF>(self, factories: &HashMap<String, TF>) -> Result<LedgerClient, BuilderError>
	where
		TF: Fn(&toml::Value) -> Result<Box<dyn RpcTransport>, TransportError>,
	{
		let primary = &self.config.transport.primary;
		let settings = self
			.config
			.transport
			.implementations
			.get(primary)
			.ok_or_else(|| {
				BuilderError::Config(format!(
					"Primary transport '{}' not found in transport.implementations",
					primary
				))
			})?;

		let factory = factories.get(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"Primary transport '{}' has no registered factory",
				primary
			))
		})?;

		let transport = match factory(settings) {
			Ok(transport) => {
				tracing::info!(component = "transport", implementation = %primary, "Loaded");
				transport
			},
			Err(e) => {
				tracing::error!(
					component = "transport",
					implementation = %primary,
					error = %e,
					"Failed to create transport implementation"
				);
				return Err(BuilderError::Config(format!(
					"Failed to create transport implementation '{}': {}",
					primary, e
				)));
			},
		};

		tracing::info!(
			chain_id = %self.config.client.chain_id,
			poll_interval_ms = self.config.wait.poll_interval_ms,
			timeout_seconds = self.config.wait.timeout_seconds,
			"Client ready"
		);
		Ok(self.with_transport(Arc::from(transport)))
	}
}
