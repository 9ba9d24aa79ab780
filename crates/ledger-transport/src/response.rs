//! Response types returned by the transport.

use ledger_types::{ChainId, LedgerState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error object returned by the remote service in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
	pub code: i64,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<serde_json::Value>,
}

impl fmt::Display for RpcError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (code {})", self.message, self.code)
	}
}

impl std::error::Error for RpcError {}

/// Response to a single request.
///
/// Every response carries the chain it came from and the ledger state it
/// was served at, whether it holds a result or an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
	pub id: u64,
	#[serde(default)]
	pub result: Option<serde_json::Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<RpcError>,
	#[serde(rename = "libra_chain_id")]
	pub chain_id: u8,
	#[serde(rename = "libra_ledger_version")]
	pub ledger_version: u64,
	#[serde(rename = "libra_ledger_timestampusec")]
	pub ledger_timestamp_usec: u64,
}

impl RpcResponse {
	/// Ledger state the response was served at.
	pub fn ledger_state(&self) -> LedgerState {
		LedgerState::new(self.ledger_timestamp_usec, self.ledger_version)
	}

	/// Chain identity reported by the response.
	pub fn chain_id(&self) -> ChainId {
		ChainId(self.chain_id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_deserialize_response_metadata() {
		let response: RpcResponse = serde_json::from_value(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"result": null,
			"libra_chain_id": 2,
			"libra_ledger_version": 3480,
			"libra_ledger_timestampusec": 1597084681499780u64
		}))
		.unwrap();

		assert_eq!(response.result, None);
		assert_eq!(response.chain_id(), ChainId::TESTNET);
		assert_eq!(
			response.ledger_state(),
			LedgerState::new(1597084681499780, 3480)
		);
	}

	#[test]
	fn test_deserialize_error_response() {
		let response: RpcResponse = serde_json::from_value(json!({
			"jsonrpc": "2.0",
			"id": 9,
			"error": {"code": -32602, "message": "Invalid param account address"},
			"libra_chain_id": 2,
			"libra_ledger_version": 10,
			"libra_ledger_timestampusec": 20
		}))
		.unwrap();

		let error = response.error.unwrap();
		assert_eq!(error.code, -32602);
		assert_eq!(
			error.to_string(),
			"Invalid param account address (code -32602)"
		);
	}
}
