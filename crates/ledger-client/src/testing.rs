//! In-memory transport that replays scripted responses.
//!
//! Responses are returned in the order they were pushed. Once the script
//! runs out the last entry is repeated, which keeps polling loops fed with
//! the same answer for as long as they keep asking.

use async_trait::async_trait;
use ledger_transport::{RpcError, RpcRequest, RpcResponse, RpcTransport, TransportError};
use ledger_types::{ChainId, LedgerState};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// A response to replay, minus the request id which is filled in on call.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
	pub result: Option<serde_json::Value>,
	pub error: Option<RpcError>,
	pub chain_id: ChainId,
	pub state: LedgerState,
	/// Replaces the echoed request id when set.
	pub id: Option<u64>,
}

impl ScriptedResponse {
	/// A successful response carrying `result`.
	pub fn result(chain_id: ChainId, state: LedgerState, result: serde_json::Value) -> Self {
		Self {
			result: Some(result),
			error: None,
			chain_id,
			state,
			id: None,
		}
	}

	/// A successful response with a null result.
	pub fn null(chain_id: ChainId, state: LedgerState) -> Self {
		Self {
			result: None,
			error: None,
			chain_id,
			state,
			id: None,
		}
	}

	/// A response carrying an error object instead of a result.
	pub fn error(chain_id: ChainId, state: LedgerState, error: RpcError) -> Self {
		Self {
			result: None,
			error: Some(error),
			chain_id,
			state,
			id: None,
		}
	}

	/// Overrides the response id.
	pub fn with_id(mut self, id: u64) -> Self {
		self.id = Some(id);
		self
	}
}

type Reply = Result<ScriptedResponse, String>;

/// Transport returning scripted responses and recording every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
	script: Mutex<VecDeque<Reply>>,
	last: Mutex<Option<Reply>>,
	requests: Mutex<Vec<RpcRequest>>,
}

impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a response.
	pub fn push(&self, response: ScriptedResponse) {
		self.lock_script().push_back(Ok(response));
	}

	/// Queues a network failure.
	pub fn push_network_error(&self, message: impl Into<String>) {
		self.lock_script().push_back(Err(message.into()));
	}

	/// Requests received so far, in order.
	pub fn requests(&self) -> Vec<RpcRequest> {
		self.requests
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
		self.script.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn next_reply(&self) -> Option<Reply> {
		let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
		if let Some(reply) = self.lock_script().pop_front() {
			*last = Some(reply);
		}
		last.clone()
	}
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
	async fn call(&self, request: RpcRequest) -> Result<RpcResponse, TransportError> {
		let id = request.id;
		self.requests
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(request);

		match self.next_reply() {
			Some(Ok(scripted)) => Ok(RpcResponse {
				id: scripted.id.unwrap_or(id),
				result: scripted.result,
				error: scripted.error,
				chain_id: scripted.chain_id.id(),
				ledger_version: scripted.state.version,
				ledger_timestamp_usec: scripted.state.timestamp_usec,
			}),
			Some(Err(message)) => Err(TransportError::Network(message)),
			None => Err(TransportError::Network("no scripted response".into())),
		}
	}
}
