//! Waiting for submitted transactions to reach a final outcome.
//!
//! The remote service is poll only, so confirmation is a loop over the
//! account transaction lookup. Two independent bounds end the loop: the
//! caller's timeout, measured on the local clock, and the transaction's own
//! expiration, measured on the ledger clock reported by the freshest
//! response this client has accepted.

use crate::{ClientError, LedgerClient};
use ledger_types::{truncate_id, Address, LedgerState, Transaction, VmStatus};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::instrument;

/// Interval between two lookups of a pending transaction.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result of looking for a submitted transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionOutcome {
	/// Not visible yet; polling should continue.
	Pending,
	/// Committed with the expected signature and executed successfully.
	Executed(Box<Transaction>),
	/// Committed with the expected signature but did not execute.
	ExecutionFailed { status: VmStatus },
	/// A different transaction occupies the same account sequence number.
	SignatureMismatch {
		expected: String,
		found: Option<String>,
	},
	/// The ledger clock passed the expiration before the transaction showed up.
	Expired {
		expiration_timestamp_secs: u64,
		ledger_timestamp_usec: u64,
	},
	/// The caller's wait budget ran out first.
	TimedOut { timeout: Duration },
}

impl TransactionOutcome {
	/// Whether polling should stop.
	pub fn is_terminal(&self) -> bool {
		!matches!(self, TransactionOutcome::Pending)
	}

	pub fn is_success(&self) -> bool {
		matches!(self, TransactionOutcome::Executed(_))
	}

	/// Classifies one lookup result against the expected signature and the
	/// ledger state observed after the lookup.
	///
	/// The expiration boundary is inclusive: a transaction whose expiration
	/// equals the ledger timestamp is already expired.
	pub fn classify(
		found: Option<Transaction>,
		expected_signature: &str,
		expiration_timestamp_secs: u64,
		ledger: LedgerState,
	) -> Self {
		match found {
			Some(txn) => {
				if txn.signature() != Some(expected_signature) {
					TransactionOutcome::SignatureMismatch {
						expected: expected_signature.to_string(),
						found: txn.transaction.signature,
					}
				} else if !txn.is_executed() {
					TransactionOutcome::ExecutionFailed {
						status: txn.vm_status,
					}
				} else {
					TransactionOutcome::Executed(Box::new(txn))
				}
			},
			None => {
				if expiration_timestamp_secs.saturating_mul(1_000_000) <= ledger.timestamp_usec {
					TransactionOutcome::Expired {
						expiration_timestamp_secs,
						ledger_timestamp_usec: ledger.timestamp_usec,
					}
				} else {
					TransactionOutcome::Pending
				}
			},
		}
	}

	/// Maps a terminal outcome onto the result of [`TransactionWaiter::wait`].
	///
	/// `Pending` only reaches here when the wait budget ran out, so it maps
	/// to [`WaitError::TimedOut`] with the budget that was used.
	fn into_result(self, timeout: Duration) -> Result<Transaction, WaitError> {
		match self {
			TransactionOutcome::Executed(txn) => Ok(*txn),
			TransactionOutcome::ExecutionFailed { status } => {
				Err(WaitError::ExecutionFailed { status })
			},
			TransactionOutcome::SignatureMismatch { expected, found } => {
				Err(WaitError::SignatureMismatch { expected, found })
			},
			TransactionOutcome::Expired {
				expiration_timestamp_secs,
				ledger_timestamp_usec,
			} => Err(WaitError::Expired {
				expiration_timestamp_secs,
				ledger_timestamp_usec,
			}),
			TransactionOutcome::TimedOut { timeout } => Err(WaitError::TimedOut { timeout }),
			TransactionOutcome::Pending => Err(WaitError::TimedOut { timeout }),
		}
	}
}

/// Errors returned by [`TransactionWaiter::wait`].
#[derive(Debug, Error)]
pub enum WaitError {
	/// A lookup failed; polling stopped at the first failure.
	#[error(transparent)]
	Client(#[from] ClientError),
	#[error(
		"found transaction, but signature does not match: expected {expected}, found {}",
		.found.as_deref().unwrap_or("none")
	)]
	SignatureMismatch {
		expected: String,
		found: Option<String>,
	},
	#[error("transaction execution failed: {status}")]
	ExecutionFailed { status: VmStatus },
	#[error(
		"transaction expired: expiration {expiration_timestamp_secs}s reached by ledger timestamp {ledger_timestamp_usec}us"
	)]
	Expired {
		expiration_timestamp_secs: u64,
		ledger_timestamp_usec: u64,
	},
	#[error("transaction not found within timeout period: {timeout:?}")]
	TimedOut { timeout: Duration },
}

impl WaitError {
	/// Whether the transaction is known never to be included, so sending a
	/// replacement cannot result in both landing.
	///
	/// A timed out transaction may still be committed later and a failed or
	/// mismatched one already consumed its sequence number, so only an
	/// expired transaction qualifies.
	pub fn may_resubmit(&self) -> bool {
		matches!(self, WaitError::Expired { .. })
	}
}

/// Polls the account transaction lookup until a submitted transaction
/// reaches a final outcome.
pub struct TransactionWaiter<'a> {
	client: &'a LedgerClient,
	step: Duration,
}

impl<'a> TransactionWaiter<'a> {
	pub fn new(client: &'a LedgerClient) -> Self {
		Self {
			client,
			step: DEFAULT_POLL_INTERVAL,
		}
	}

	/// Sets the interval between two lookups.
	///
	/// A zero step falls back to [`DEFAULT_POLL_INTERVAL`] so the loop never
	/// polls without pausing.
	pub fn with_step(mut self, step: Duration) -> Self {
		self.step = if step.is_zero() {
			DEFAULT_POLL_INTERVAL
		} else {
			step
		};
		self
	}

	/// Looks the transaction up once and classifies the result.
	///
	/// Returns [`TransactionOutcome::Pending`] when the transaction is not
	/// visible and has not expired yet.
	pub async fn poll(
		&self,
		address: &Address,
		sequence_number: u64,
		signature: &str,
		expiration_timestamp_secs: u64,
	) -> Result<TransactionOutcome, ClientError> {
		let found = self
			.client
			.get_account_transaction(address, sequence_number, true)
			.await?;

		// Read after the lookup so the response that just came back counts.
		let ledger = self.client.last_response_ledger_state();
		Ok(TransactionOutcome::classify(
			found,
			signature,
			expiration_timestamp_secs,
			ledger,
		))
	}

	/// Polls until the transaction reaches a terminal outcome or `timeout`
	/// elapses.
	///
	/// Never returns [`TransactionOutcome::Pending`]. Lookup failures,
	/// including stale or mismatched responses, end the wait with `Err`.
	#[instrument(skip_all, fields(address = %truncate_id(address.as_str()), sequence_number = sequence_number))]
	pub async fn wait_for_outcome(
		&self,
		address: &Address,
		sequence_number: u64,
		signature: &str,
		expiration_timestamp_secs: u64,
		timeout: Duration,
	) -> Result<TransactionOutcome, ClientError> {
		let start_time = Instant::now();
		let mut attempts: u64 = 0;

		while start_time.elapsed() < timeout {
			attempts += 1;
			let outcome = self
				.poll(
					address,
					sequence_number,
					signature,
					expiration_timestamp_secs,
				)
				.await?;

			match &outcome {
				TransactionOutcome::Pending => {
					tracing::debug!(
						attempts,
						elapsed_ms = start_time.elapsed().as_millis() as u64,
						"Waiting for transaction"
					);
					tokio::time::sleep(self.step).await;
					continue;
				},
				TransactionOutcome::Executed(txn) => {
					tracing::info!(attempts, version = txn.version, "Confirmed");
				},
				other => {
					tracing::warn!(attempts, outcome = ?other, "Transaction did not execute");
				},
			}
			return Ok(outcome);
		}

		tracing::warn!(
			attempts,
			timeout_ms = timeout.as_millis() as u64,
			"Transaction not found within timeout"
		);
		Ok(TransactionOutcome::TimedOut { timeout })
	}

	/// Waits for the transaction and returns it if it executed successfully.
	pub async fn wait(
		&self,
		address: &Address,
		sequence_number: u64,
		signature: &str,
		expiration_timestamp_secs: u64,
		timeout: Duration,
	) -> Result<Transaction, WaitError> {
		let outcome = self
			.wait_for_outcome(
				address,
				sequence_number,
				signature,
				expiration_timestamp_secs,
				timeout,
			)
			.await?;
		outcome.into_result(timeout)
	}
}
