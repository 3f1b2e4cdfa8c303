//! Usage: Redaction helpers for identity values written to logs.

const MASK_PREFIX_LEN: usize = 3;
const MASK_SUFFIX_LEN: usize = 4;

/// Mask an identity string (principal name, account name) for logging.
pub(crate) fn mask_identity(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let len = chars.len();
    if len <= MASK_PREFIX_LEN + MASK_SUFFIX_LEN {
        return "*".repeat(len.min(8));
    }

    let prefix: String = chars[..MASK_PREFIX_LEN].iter().collect();
    let suffix: String = chars[len - MASK_SUFFIX_LEN..].iter().collect();
    format!("{prefix}...{suffix}")
}
