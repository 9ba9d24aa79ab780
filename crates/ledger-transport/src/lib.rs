//! Transport interface for the ledger client.
//!
//! The client does not speak the wire protocol itself. It hands an
//! [`RpcRequest`] to an [`RpcTransport`] and gets back an [`RpcResponse`]
//! carrying the result payload together with the chain identity and
//! ledger state the response was served at. Connection handling,
//! serialization and batching all live behind this trait.

use async_trait::async_trait;
use thiserror::Error;

pub mod request;
pub mod response;

pub use request::{Method, RpcRequest, JSONRPC_VERSION};
pub use response::{RpcError, RpcResponse};

/// Errors that can occur while exchanging a request with the remote service.
#[derive(Debug, Error)]
pub enum TransportError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a response body cannot be decoded.
	#[error("Decode error: {0}")]
	Decode(String),
	/// Error that occurs when a transport is configured incorrectly.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for request/response transports.
///
/// Implementations send exactly one request per call and return the
/// matching response. They must not retry, and must not inspect the ledger
/// metadata: consistency checks are the client's job.
#[async_trait]
pub trait RpcTransport: Send + Sync {
	/// Sends a request and returns the response for it.
	async fn call(&self, request: RpcRequest) -> Result<RpcResponse, TransportError>;
}

/// Type alias for transport factory functions.
///
/// Transport implementations provide a factory so they can be selected by
/// name from the `[transport.implementations]` configuration table.
pub type TransportFactory = fn(&toml::Value) -> Result<Box<dyn RpcTransport>, TransportError>;
