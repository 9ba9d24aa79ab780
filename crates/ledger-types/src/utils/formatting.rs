//! String formatting utilities.
//!
//! Provides hex prefix stripping and truncation of long identifiers
//! such as addresses and signatures for log output.

/// Truncates an identifier for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((idx, _)) => format!("{}..", &id[..idx]),
		None => id.to_string(),
	}
}

/// Removes "0x" or "0X" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("abc"), "abc");
		assert_eq!(truncate_id("12345678"), "12345678");
		assert_eq!(
			truncate_id("000000000000000000000000000000dd"),
			"00000000.."
		);
	}

	#[test]
	fn test_prefix_helpers() {
		assert_eq!(without_0x_prefix("0xdd"), "dd");
		assert_eq!(without_0x_prefix("dd"), "dd");
	}
}
