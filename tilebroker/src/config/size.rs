//! Human-readable size parsing (e.g., "2GB", "500MB").

use thiserror::Error;

/// Error parsing a size string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '2GB', '500MB', or '1024KB'")]
pub struct SizeParseError {
    input: String,
}

impl SizeParseError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Parse a human-readable size string into bytes.
///
/// Bare numbers are bytes; `K`/`KB`, `M`/`MB` and `G`/`GB` suffixes are
/// powers of 1024. Case and surrounding whitespace are ignored.
///
/// ```
/// use tilebroker::config::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1 KB").unwrap(), 1024);
/// assert_eq!(parse_size("512mb").unwrap(), 512 * 1024 * 1024);
/// ```
pub fn parse_size(s: &str) -> Result<u64, SizeParseError> {
    let s = s.trim();
    let upper = s.to_ascii_uppercase();

    let (suffix_len, multiplier) = [("GB", GB), ("G", GB), ("MB", MB), ("M", MB), ("KB", KB), ("K", KB)]
        .iter()
        .find(|(suffix, _)| upper.ends_with(suffix))
        .map(|(suffix, m)| (suffix.len(), *m))
        .unwrap_or((0, 1));

    let number = s[..s.len() - suffix_len].trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SizeParseError::new(s));
    }

    number
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| SizeParseError::new(s))
}

/// Format a byte count using the largest unit that divides it evenly.
///
/// ```
/// use tilebroker::config::format_size;
///
/// assert_eq!(format_size(512 * 1024 * 1024), "512MB");
/// assert_eq!(format_size(1000), "1000");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes >= GB && bytes % GB == 0 {
        format!("{}GB", bytes / GB)
    } else if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        bytes.to_string()
    }
}
