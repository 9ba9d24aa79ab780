//! Ledger state tracking for response consistency.
//!
//! Every response passes through [`LedgerStateGuard::validate_and_advance`]
//! before its result reaches the caller. The guard remembers the freshest
//! ledger state this client has accepted and rejects any response that
//! reports an older one, so a lagging or rolled back server cannot feed
//! stale data to callers.

use ledger_types::{ChainId, LedgerState};
use std::fmt;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Which part of the ledger state went backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleField {
	Version,
	TimestampUsec,
}

impl fmt::Display for StaleField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StaleField::Version => f.write_str("version"),
			StaleField::TimestampUsec => f.write_str("timestamp(usec)"),
		}
	}
}

/// Errors raised when a response fails the consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerStateError {
	/// The response came from a different network than the client expects.
	#[error("chain id mismatch error: expected server response chain id == {expected}, but got {actual}")]
	ChainIdMismatch { expected: ChainId, actual: ChainId },
	/// The response reports ledger state older than state already accepted.
	#[error("stale response error: expected server response ledger {field} >= {last}, but got {received}")]
	StaleResponse {
		field: StaleField,
		last: u64,
		received: u64,
	},
}

/// Latest ledger state accepted by a client, and the chain it belongs to.
///
/// Accepted states never move backwards in either version or timestamp.
#[derive(Debug)]
pub struct LedgerStateGuard {
	chain_id: ChainId,
	last: RwLock<LedgerState>,
}

impl LedgerStateGuard {
	/// Creates a guard for `chain_id` starting at the zero ledger state.
	pub fn new(chain_id: ChainId) -> Self {
		Self {
			chain_id,
			last: RwLock::new(LedgerState::default()),
		}
	}

	/// Chain identity every response must report.
	pub fn chain_id(&self) -> ChainId {
		self.chain_id
	}

	/// Returns the latest accepted ledger state.
	pub fn current(&self) -> LedgerState {
		// The guarded value is a Copy pair that is only ever replaced whole,
		// so a poisoned lock still holds a valid state.
		*self.last.read().unwrap_or_else(PoisonError::into_inner)
	}

	/// Checks a response's chain identity and ledger state, and records the
	/// state if it is at least as fresh as the current one.
	///
	/// The chain identity is checked first. A candidate equal to the current
	/// state is accepted without change. A candidate with a lower version or
	/// a lower timestamp is rejected and leaves the stored state untouched.
	pub fn validate_and_advance(
		&self,
		chain_id: ChainId,
		candidate: LedgerState,
	) -> Result<(), LedgerStateError> {
		if chain_id != self.chain_id {
			tracing::warn!(
				expected = %self.chain_id,
				actual = %chain_id,
				"Rejected response from unexpected chain"
			);
			return Err(LedgerStateError::ChainIdMismatch {
				expected: self.chain_id,
				actual: chain_id,
			});
		}

		let result = {
			let mut last = self.last.write().unwrap_or_else(PoisonError::into_inner);
			if *last == candidate {
				Ok(())
			} else if candidate.version < last.version {
				Err(LedgerStateError::StaleResponse {
					field: StaleField::Version,
					last: last.version,
					received: candidate.version,
				})
			} else if candidate.timestamp_usec < last.timestamp_usec {
				Err(LedgerStateError::StaleResponse {
					field: StaleField::TimestampUsec,
					last: last.timestamp_usec,
					received: candidate.timestamp_usec,
				})
			} else {
				*last = candidate;
				Ok(())
			}
		};

		match &result {
			Ok(()) => tracing::trace!(state = %candidate, "Accepted ledger state"),
			Err(e) => tracing::warn!(error = %e, "Rejected stale response"),
		}
		result
	}
}
