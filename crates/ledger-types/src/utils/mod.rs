//! Utility functions for formatting identifiers in logs and errors.

pub mod formatting;

pub use formatting::{truncate_id, without_0x_prefix};
