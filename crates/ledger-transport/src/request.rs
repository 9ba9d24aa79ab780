//! Request types handed to the transport.

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON-RPC protocol version stamped on every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Remote methods the client knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
	GetCurrencies,
	GetMetadata,
	GetAccount,
	GetAccountTransaction,
	GetAccountTransactions,
	GetTransactions,
	GetEvents,
	Submit,
}

impl Method {
	/// Returns the method name used on the wire.
	pub fn as_str(self) -> &'static str {
		match self {
			Method::GetCurrencies => "get_currencies",
			Method::GetMetadata => "get_metadata",
			Method::GetAccount => "get_account",
			Method::GetAccountTransaction => "get_account_transaction",
			Method::GetAccountTransactions => "get_account_transactions",
			Method::GetTransactions => "get_transactions",
			Method::GetEvents => "get_events",
			Method::Submit => "submit",
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single remote call with ordered parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
	pub jsonrpc: String,
	pub id: u64,
	pub method: Method,
	pub params: Vec<serde_json::Value>,
}

impl RpcRequest {
	/// Creates a request for `method` with the given id and parameters.
	pub fn new(id: u64, method: Method, params: Vec<serde_json::Value>) -> Self {
		Self {
			jsonrpc: JSONRPC_VERSION.to_string(),
			id,
			method,
			params,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_request_serializes_wire_method_name() {
		let request = RpcRequest::new(
			7,
			Method::GetAccountTransaction,
			vec![json!("000000000000000000000000000000dd"), json!(3), json!(true)],
		);

		let value = serde_json::to_value(&request).unwrap();
		assert_eq!(
			value,
			json!({
				"jsonrpc": "2.0",
				"id": 7,
				"method": "get_account_transaction",
				"params": ["000000000000000000000000000000dd", 3, true]
			})
		);
	}

	#[test]
	fn test_method_display_matches_serde_name() {
		for method in [
			Method::GetCurrencies,
			Method::GetMetadata,
			Method::GetAccount,
			Method::GetAccountTransaction,
			Method::GetAccountTransactions,
			Method::GetTransactions,
			Method::GetEvents,
			Method::Submit,
		] {
			let serialized = serde_json::to_value(method).unwrap();
			assert_eq!(serialized, json!(method.to_string()));
		}
	}
}
