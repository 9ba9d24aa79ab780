//! Ledger metadata, currency and event payloads.

use serde::{Deserialize, Serialize};

/// Ledger metadata at a given version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
	pub version: u64,
	/// Ledger timestamp in microseconds.
	pub timestamp: u64,
	pub chain_id: u8,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub script_hash_allow_list: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub module_publishing_allowed: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub libra_version: Option<u64>,
}

/// A currency registered on chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
	pub code: String,
	pub scaling_factor: u64,
	pub fractional_part: u64,
	#[serde(default)]
	pub to_lbr_exchange_rate: f64,
	#[serde(default)]
	pub mint_events_key: String,
	#[serde(default)]
	pub burn_events_key: String,
	#[serde(default)]
	pub preburn_events_key: String,
	#[serde(default)]
	pub cancel_burn_events_key: String,
	#[serde(default)]
	pub exchange_rate_update_events_key: String,
}

/// An event emitted by a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub key: String,
	pub sequence_number: u64,
	pub transaction_version: u64,
	/// Event payload, shape depends on the event type.
	#[serde(default)]
	pub data: serde_json::Value,
}
