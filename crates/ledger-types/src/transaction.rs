//! Transaction record types.
//!
//! A committed transaction as returned by the account and version based
//! transaction lookups, together with the VM status it executed with.

use crate::metadata::Event;
use serde::{Deserialize, Serialize};
use std::fmt;

/// VM status type reported for a transaction that executed successfully.
pub const VM_STATUS_EXECUTED: &str = "executed";

/// A committed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	/// Ledger version the transaction was committed at.
	pub version: u64,
	/// The transaction body.
	pub transaction: TransactionData,
	/// Transaction hash as hex.
	#[serde(default)]
	pub hash: String,
	/// Serialized transaction bytes as hex.
	#[serde(default)]
	pub bytes: String,
	/// Events emitted by the transaction, present only when requested.
	#[serde(default)]
	pub events: Vec<Event>,
	/// Execution status.
	pub vm_status: VmStatus,
	#[serde(default)]
	pub gas_used: u64,
}

impl Transaction {
	/// Signature recorded for a user transaction, if any.
	pub fn signature(&self) -> Option<&str> {
		self.transaction.signature.as_deref()
	}

	/// Whether the transaction executed successfully.
	pub fn is_executed(&self) -> bool {
		self.vm_status.is_executed()
	}
}

/// Body of a committed transaction.
///
/// Only user transactions carry sender, sequence number and signature.
/// Block metadata and writeset transactions leave them empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sender: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub signature_scheme: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub signature: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub public_key: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sequence_number: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chain_id: Option<u8>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_gas_amount: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_unit_price: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_currency: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiration_timestamp_secs: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub script_hash: Option<String>,
}

/// VM execution status of a committed transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmStatus {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub abort_code: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub function_index: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_offset: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub explanation: Option<serde_json::Value>,
}

impl VmStatus {
	/// Creates a status with only the type set.
	pub fn new(kind: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			..Default::default()
		}
	}

	pub fn is_executed(&self) -> bool {
		self.kind == VM_STATUS_EXECUTED
	}
}

impl fmt::Display for VmStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.kind)?;
		if let Some(location) = &self.location {
			write!(f, " location={}", location)?;
		}
		if let Some(abort_code) = self.abort_code {
			write!(f, " abort_code={}", abort_code)?;
		}
		if let Some(function_index) = self.function_index {
			write!(f, " function_index={}", function_index)?;
		}
		if let Some(code_offset) = self.code_offset {
			write!(f, " code_offset={}", code_offset)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn user_transaction_json(vm_status: serde_json::Value) -> serde_json::Value {
		serde_json::json!({
			"version": 4433,
			"transaction": {
				"type": "user",
				"sender": "000000000000000000000000000000dd",
				"signature_scheme": "Scheme::Ed25519",
				"signature": "abc",
				"public_key": "8b5e",
				"sequence_number": 3,
				"chain_id": 2,
				"max_gas_amount": 1000000,
				"gas_unit_price": 0,
				"gas_currency": "Coin1",
				"expiration_timestamp_secs": 1000,
				"script_hash": "61749d"
			},
			"hash": "0e1f",
			"bytes": "00aa",
			"events": [],
			"vm_status": vm_status,
			"gas_used": 175
		})
	}

	#[test]
	fn test_deserialize_executed_user_transaction() {
		let json = user_transaction_json(serde_json::json!({"type": "executed"}));
		let txn: Transaction = serde_json::from_value(json).unwrap();

		assert_eq!(txn.version, 4433);
		assert_eq!(txn.signature(), Some("abc"));
		assert_eq!(txn.transaction.sequence_number, Some(3));
		assert_eq!(txn.transaction.expiration_timestamp_secs, Some(1000));
		assert!(txn.is_executed());
	}

	#[test]
	fn test_move_abort_status_is_not_executed() {
		let json = user_transaction_json(serde_json::json!({
			"type": "move_abort",
			"location": "00000000000000000000000000000001::LibraAccount",
			"abort_code": 1031
		}));
		let txn: Transaction = serde_json::from_value(json).unwrap();

		assert!(!txn.is_executed());
		assert_eq!(
			txn.vm_status.to_string(),
			"move_abort location=00000000000000000000000000000001::LibraAccount abort_code=1031"
		);
	}

	#[test]
	fn test_block_metadata_transaction_has_no_signature() {
		let json = serde_json::json!({
			"version": 1,
			"transaction": {"type": "blockmetadata", "timestamp_usecs": 10},
			"vm_status": {"type": "executed"}
		});
		let txn: Transaction = serde_json::from_value(json).unwrap();

		assert_eq!(txn.signature(), None);
		assert!(txn.events.is_empty());
	}
}
