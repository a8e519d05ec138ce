//! Package name validation and normalization.
//!
//! Implements the PyPI naming rules from
//! <https://packaging.python.org/en/latest/specifications/name-normalization/>.
//! Checks run in order and the first failing rule decides the verdict.

use crate::types::NormalizationVerdict;
use regex::Regex;
use std::sync::LazyLock;

/// Longest accepted name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

pub const MSG_EMPTY: &str = "Package name cannot be empty";
pub const MSG_TOO_LONG: &str = "Package name exceeds maximum length of 255 characters";
pub const MSG_INVALID_CHARS: &str = "Package name contains invalid characters";
pub const MSG_BAD_BOUNDARY: &str = "Package name must start and end with a letter or digit";
pub const MSG_CONSECUTIVE: &str = "Package name cannot contain consecutive '.', '-', or '_'";
pub const MSG_VALID: &str = "Valid package name";

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("separator pattern is valid"));

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | '.')
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_separator(c)
}

/// Validate `raw` against PyPI naming rules and compute its canonical form.
pub fn normalize_pypi_name(raw: &str) -> NormalizationVerdict {
    if raw.is_empty() {
        return NormalizationVerdict::invalid(MSG_EMPTY);
    }

    if raw.chars().count() > MAX_NAME_LENGTH {
        return NormalizationVerdict::invalid(MSG_TOO_LONG);
    }

    if !raw.chars().all(is_allowed) {
        return NormalizationVerdict::invalid(MSG_INVALID_CHARS);
    }

    // Only ASCII remains past this point, so byte indexing is safe.
    let bytes = raw.as_bytes();
    if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
        return NormalizationVerdict::invalid(MSG_BAD_BOUNDARY);
    }

    if bytes
        .windows(2)
        .any(|pair| is_separator(pair[0] as char) && is_separator(pair[1] as char))
    {
        return NormalizationVerdict::invalid(MSG_CONSECUTIVE);
    }

    let canonical = SEPARATOR_RUN.replace_all(raw, "-").to_lowercase();

    let message = if canonical == raw {
        MSG_VALID.to_string()
    } else {
        format!("Valid, but normalized to {}", canonical)
    };

    NormalizationVerdict::valid(message, canonical)
}
