//! Account types.
//!
//! Defines the account address used to key account lookups and the account
//! payload returned by the remote service.

use crate::utils::without_0x_prefix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of bytes in an account address.
pub const ADDRESS_LENGTH: usize = 16;

/// Errors that can occur when parsing an account address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
	/// The input is not valid hex.
	#[error("Invalid hex in address: {0}")]
	InvalidHex(String),
	/// The input decodes to the wrong number of bytes.
	#[error("Invalid address length: expected 16 bytes, got {0}")]
	InvalidLength(usize),
}

/// Account address, kept as lowercase hex without a `0x` prefix.
///
/// Deserialization goes through the same validation as [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
	/// Returns the address as a hex string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl FromStr for Address {
	type Err = AddressError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let hex_str = without_0x_prefix(s.trim());
		let bytes = hex::decode(hex_str).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
		if bytes.len() != ADDRESS_LENGTH {
			return Err(AddressError::InvalidLength(bytes.len()));
		}
		Ok(Address(hex::encode(bytes)))
	}
}

impl TryFrom<String> for Address {
	type Error = AddressError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<Address> for String {
	fn from(address: Address) -> Self {
		address.0
	}
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
	fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
		Address(hex::encode(bytes))
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A balance in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
	pub amount: u64,
	pub currency: String,
}

/// On-chain account state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
	pub address: String,
	#[serde(default)]
	pub balances: Vec<Amount>,
	pub sequence_number: u64,
	#[serde(default)]
	pub authentication_key: String,
	#[serde(default)]
	pub sent_events_key: String,
	#[serde(default)]
	pub received_events_key: String,
	#[serde(default)]
	pub delegated_key_rotation_capability: bool,
	#[serde(default)]
	pub delegated_withdrawal_capability: bool,
	#[serde(default)]
	pub is_frozen: bool,
	/// Role details vary by account type and are passed through untyped.
	#[serde(default)]
	pub role: serde_json::Value,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_address_normalizes_case_and_prefix() {
		let address: Address = "0x0000000000000000000000000A550C18".parse().unwrap();
		assert_eq!(address.as_str(), "0000000000000000000000000a550c18");

		let mut bytes = [0u8; ADDRESS_LENGTH];
		bytes[12..].copy_from_slice(&[0x0a, 0x55, 0x0c, 0x18]);
		assert_eq!(Address::from(bytes), address);
	}

	#[test]
	fn test_deserialize_address_validates_input() {
		let address: Address =
			serde_json::from_value(serde_json::json!("0x000000000000000000000000000000DD")).unwrap();
		assert_eq!(address.as_str(), "000000000000000000000000000000dd");
		assert_eq!(
			serde_json::to_value(&address).unwrap(),
			serde_json::json!("000000000000000000000000000000dd")
		);

		let err = serde_json::from_value::<Address>(serde_json::json!("abcd")).unwrap_err();
		assert!(err.to_string().contains("expected 16 bytes, got 2"));
		assert!(serde_json::from_value::<Address>(serde_json::json!("zz")).is_err());
	}

	#[test]
	fn test_parse_address_rejects_bad_input() {
		assert!(matches!(
			"10000000010000000000000010000C1K".parse::<Address>(),
			Err(AddressError::InvalidHex(_))
		));
		assert_eq!(
			"abcd".parse::<Address>(),
			Err(AddressError::InvalidLength(2))
		);
	}

	#[test]
	fn test_account_deserializes_with_missing_optional_fields() {
		let json = serde_json::json!({
			"address": "000000000000000000000000000000dd",
			"balances": [{"amount": 100, "currency": "Coin1"}],
			"sequence_number": 3,
			"role": {"type": "unknown"}
		});

		let account: Account = serde_json::from_value(json).unwrap();
		assert_eq!(account.sequence_number, 3);
		assert_eq!(account.balances[0].currency, "Coin1");
		assert!(!account.is_frozen);
	}
}
