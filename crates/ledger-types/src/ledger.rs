//! Ledger clock and chain identity types.
//!
//! Every response from the remote service reports the chain it belongs to
//! and the ledger version and timestamp it was served at. These two types
//! carry that metadata through the client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The remote ledger's logical clock as observed by a client.
///
/// The zero value is the state of a freshly constructed client, before any
/// response has been accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerState {
	/// Ledger timestamp in microseconds since the unix epoch.
	pub timestamp_usec: u64,
	/// Ledger version the response was served at.
	pub version: u64,
}

impl LedgerState {
	/// Creates a ledger state from a timestamp in microseconds and a version.
	pub fn new(timestamp_usec: u64, version: u64) -> Self {
		Self {
			timestamp_usec,
			version,
		}
	}
}

impl fmt::Display for LedgerState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"version={} timestamp_usec={}",
			self.version, self.timestamp_usec
		)
	}
}

/// Single byte network identifier.
///
/// A client is constructed for exactly one chain and expects every
/// response to report the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u8);

impl ChainId {
	pub const MAINNET: ChainId = ChainId(1);
	pub const TESTNET: ChainId = ChainId(2);
	pub const DEVNET: ChainId = ChainId(3);
	pub const TESTING: ChainId = ChainId(4);

	/// Returns the raw identifier byte.
	pub fn id(self) -> u8 {
		self.0
	}
}

impl From<u8> for ChainId {
	fn from(id: u8) -> Self {
		ChainId(id)
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_ledger_state_is_zero() {
		let state = LedgerState::default();
		assert_eq!(state, LedgerState::new(0, 0));
	}

	#[test]
	fn test_chain_id_serializes_as_number() {
		let json = serde_json::to_string(&ChainId::TESTNET).unwrap();
		assert_eq!(json, "2");

		let parsed: ChainId = serde_json::from_str("4").unwrap();
		assert_eq!(parsed, ChainId::TESTING);
	}
}
