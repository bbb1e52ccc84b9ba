//! String formatting utilities.
//!
//! Hex prefix management and truncation of long identifiers for log lines.

/// Shortens an identifier for display, keeping the first 10 characters.
pub fn truncate_id(id: &str) -> String {
	if id.chars().count() <= 10 {
		id.to_string()
	} else {
		format!("{}..", id.chars().take(10).collect::<String>())
	}
}

/// Adds a "0x" prefix to a hex string unless one is already present.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.starts_with("0x") || hex_str.starts_with("0X") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Strips a "0x" or "0X" prefix if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}
