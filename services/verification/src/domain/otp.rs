//! One-time code generation, hashing and target normalization.

use constant_time_eq::constant_time_eq;
use rand::RngExt;
use sha2::{Digest, Sha256};

/// Smallest code ever issued (codes are always six digits).
pub const CODE_MIN: u32 = 100_000;
/// Largest code ever issued.
pub const CODE_MAX: u32 = 999_999;

/// Draw a six-digit code uniformly from `CODE_MIN..=CODE_MAX`.
///
/// `rand::rng()` is the thread-local ChaCha-based CSPRNG, reseeded from the OS.
pub fn generate_code() -> String {
    rand::rng().random_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Lowercase hex SHA-256 of the code's UTF-8 bytes.
pub fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// Compare two code hashes without leaking the mismatch position.
pub fn codes_match(submitted_hash: &str, stored_hash: &str) -> bool {
    constant_time_eq(submitted_hash.as_bytes(), stored_hash.as_bytes())
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Drop every whitespace character; no further canonicalization.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Render a normalized target for logs without exposing the full address.
pub fn mask_target(value: &str) -> String {
    match value.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => {
            let chars: Vec<char> = value.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
            format!("***{tail}")
        }
    }
}
