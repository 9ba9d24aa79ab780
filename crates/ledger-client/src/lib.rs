//! Consistency and confirmation layer for the ledger RPC service.
//!
//! [`LedgerClient`] sends each call through an [`RpcTransport`] and runs
//! every response through a [`LedgerStateGuard`] before its result reaches
//! the caller. The guard rejects responses from the wrong chain and
//! responses older than anything this client has already seen, so the
//! sequence of results a client hands out never moves backwards.
//!
//! On top of that, [`TransactionWaiter`] turns a submitted transaction into
//! a bounded wait for its final outcome, using the ledger's own clock to
//! decide when the transaction has expired.

use ledger_config::WaitConfig;
use ledger_transport::{Method, RpcError, RpcRequest, RpcTransport, TransportError};
use ledger_types::{
	Account, Address, ChainId, CurrencyInfo, Event, LedgerState, Metadata, Transaction,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub mod builder;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod waiter;

pub use builder::{BuilderError, ClientBuilder};
pub use state::{LedgerStateError, LedgerStateGuard, StaleField};
pub use waiter::{TransactionOutcome, TransactionWaiter, WaitError, DEFAULT_POLL_INTERVAL};

/// Errors that can occur during a client call.
#[derive(Debug, Error)]
pub enum ClientError {
	/// The transport failed to deliver the request or its response.
	#[error("Transport error: {0}")]
	Transport(#[from] TransportError),
	/// The response failed the chain identity or staleness check.
	#[error(transparent)]
	LedgerState(#[from] LedgerStateError),
	/// The remote service answered with an error object.
	#[error("RPC error: {0}")]
	Rpc(RpcError),
	/// The transport returned a response for a different request.
	#[error("Unexpected response id: expected {expected}, got {actual}")]
	UnexpectedResponseId { expected: u64, actual: u64 },
	/// The result could not be decoded into the method's result type.
	#[error("Failed to decode {method} result: {message}")]
	Decode { method: Method, message: String },
	/// The method requires a result but the response carried none.
	#[error("Empty result for {0}")]
	EmptyResult(Method),
}

/// Client for the ledger RPC service.
///
/// Safe to share between tasks; all calls take `&self`.
pub struct LedgerClient {
	transport: Arc<dyn RpcTransport>,
	state: LedgerStateGuard,
	next_request_id: AtomicU64,
	wait: WaitConfig,
}

impl LedgerClient {
	/// Creates a client for `chain_id` on top of `transport`.
	pub fn new(chain_id: ChainId, transport: Arc<dyn RpcTransport>) -> Self {
		Self {
			transport,
			state: LedgerStateGuard::new(chain_id),
			next_request_id: AtomicU64::new(1),
			wait: WaitConfig::default(),
		}
	}

	/// Replaces the defaults used by [`Self::wait_for_transaction`].
	pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
		self.wait = wait;
		self
	}

	pub fn chain_id(&self) -> ChainId {
		self.state.chain_id()
	}

	pub fn wait_config(&self) -> &WaitConfig {
		&self.wait
	}

	/// Ledger state of the freshest response accepted so far.
	pub fn last_response_ledger_state(&self) -> LedgerState {
		self.state.current()
	}

	/// The guard every response passes through.
	pub fn ledger_state_guard(&self) -> &LedgerStateGuard {
		&self.state
	}

	/// Returns all currencies registered on chain.
	pub async fn get_currencies(&self) -> Result<Vec<CurrencyInfo>, ClientError> {
		Ok(self
			.call(Method::GetCurrencies, Vec::new())
			.await?
			.unwrap_or_default())
	}

	/// Returns ledger metadata at the latest version.
	pub async fn get_metadata(&self) -> Result<Metadata, ClientError> {
		self.call(Method::GetMetadata, Vec::new())
			.await?
			.ok_or(ClientError::EmptyResult(Method::GetMetadata))
	}

	/// Returns ledger metadata at `version`.
	pub async fn get_metadata_by_version(&self, version: u64) -> Result<Metadata, ClientError> {
		self.call(Method::GetMetadata, vec![json!(version)])
			.await?
			.ok_or(ClientError::EmptyResult(Method::GetMetadata))
	}

	/// Returns the account at `address`, or `None` if it does not exist.
	pub async fn get_account(&self, address: &Address) -> Result<Option<Account>, ClientError> {
		self.call(Method::GetAccount, vec![json!(address.as_str())])
			.await
	}

	/// Returns the transaction sent by `address` with `sequence_number`, or
	/// `None` if no such transaction has been committed yet.
	pub async fn get_account_transaction(
		&self,
		address: &Address,
		sequence_number: u64,
		include_events: bool,
	) -> Result<Option<Transaction>, ClientError> {
		self.call(
			Method::GetAccountTransaction,
			vec![
				json!(address.as_str()),
				json!(sequence_number),
				json!(include_events),
			],
		)
		.await
	}

	/// Returns up to `limit` transactions sent by `address`, starting at
	/// sequence number `start`.
	pub async fn get_account_transactions(
		&self,
		address: &Address,
		start: u64,
		limit: u64,
		include_events: bool,
	) -> Result<Vec<Transaction>, ClientError> {
		Ok(self
			.call(
				Method::GetAccountTransactions,
				vec![
					json!(address.as_str()),
					json!(start),
					json!(limit),
					json!(include_events),
				],
			)
			.await?
			.unwrap_or_default())
	}

	/// Returns up to `limit` transactions starting at ledger version
	/// `start_version`.
	pub async fn get_transactions(
		&self,
		start_version: u64,
		limit: u64,
		include_events: bool,
	) -> Result<Vec<Transaction>, ClientError> {
		Ok(self
			.call(
				Method::GetTransactions,
				vec![json!(start_version), json!(limit), json!(include_events)],
			)
			.await?
			.unwrap_or_default())
	}

	/// Returns up to `limit` events under `key`, starting at `start`.
	pub async fn get_events(
		&self,
		key: &str,
		start: u64,
		limit: u64,
	) -> Result<Vec<Event>, ClientError> {
		Ok(self
			.call(Method::GetEvents, vec![json!(key), json!(start), json!(limit)])
			.await?
			.unwrap_or_default())
	}

	/// Submits a hex encoded signed transaction.
	pub async fn submit(&self, signed_txn_hex: &str) -> Result<(), ClientError> {
		self.call::<Value>(Method::Submit, vec![json!(signed_txn_hex)])
			.await?;
		Ok(())
	}

	/// Waits until the transaction sent by `address` with `sequence_number`
	/// reaches a final outcome, polling at the configured interval.
	pub async fn wait_for_transaction(
		&self,
		address: &Address,
		sequence_number: u64,
		signature: &str,
		expiration_timestamp_secs: u64,
		timeout: Duration,
	) -> Result<Transaction, WaitError> {
		TransactionWaiter::new(self)
			.with_step(self.wait.poll_interval())
			.wait(
				address,
				sequence_number,
				signature,
				expiration_timestamp_secs,
				timeout,
			)
			.await
	}

	/// Same as [`Self::wait_for_transaction`] with the configured timeout.
	pub async fn wait_for_transaction_with_default_timeout(
		&self,
		address: &Address,
		sequence_number: u64,
		signature: &str,
		expiration_timestamp_secs: u64,
	) -> Result<Transaction, WaitError> {
		self.wait_for_transaction(
			address,
			sequence_number,
			signature,
			expiration_timestamp_secs,
			self.wait.timeout(),
		)
		.await
	}

	/// Sends one request and validates the response.
	///
	/// The chain id and ledger state are checked before the response's
	/// error, so an error response still advances the ledger state. A null
	/// result decodes to `None`.
	async fn call<T: DeserializeOwned>(
		&self,
		method: Method,
		params: Vec<Value>,
	) -> Result<Option<T>, ClientError> {
		let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
		tracing::trace!(method = %method, id, "Sending request");

		let response = self
			.transport
			.call(RpcRequest::new(id, method, params))
			.await?;

		if response.id != id {
			return Err(ClientError::UnexpectedResponseId {
				expected: id,
				actual: response.id,
			});
		}

		self.state
			.validate_and_advance(response.chain_id(), response.ledger_state())?;

		if let Some(error) = response.error {
			tracing::debug!(method = %method, error = %error, "Remote call failed");
			return Err(ClientError::Rpc(error));
		}

		match response.result {
			None | Some(Value::Null) => Ok(None),
			Some(value) => serde_json::from_value(value)
				.map(Some)
				.map_err(|e| ClientError::Decode {
					method,
					message: e.to_string(),
				}),
		}
	}
}
