//! Common types for the ledger client.
//!
//! This crate defines the data model shared by the transport interface and
//! the client: the ledger's logical clock as observed by a client, the chain
//! identity, account addresses and the typed payloads returned by each
//! remote method.

/// Account related types, including addresses and balances.
pub mod account;
/// Chain identity and observed ledger state.
pub mod ledger;
/// Metadata, currency and event payloads.
pub mod metadata;
/// Transaction records and their execution status.
pub mod transaction;
/// Utility functions for string formatting.
pub mod utils;

pub use account::{Account, Address, AddressError, Amount};
pub use ledger::{ChainId, LedgerState};
pub use metadata::{CurrencyInfo, Event, Metadata};
pub use transaction::{Transaction, TransactionData, VmStatus, VM_STATUS_EXECUTED};
pub use utils::{truncate_id, without_0x_prefix};
