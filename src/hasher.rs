//! Anonymized identity tokens.
//!
//! A raw client address goes through SHA-256 and comes out as lowercase hex.
//! No salt and no key: the same address always maps to the same token, which
//! is all the cooldown needs. This is coarse anonymization, not a security
//! boundary.

use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Hash a raw client address into an opaque identity token (64 hex chars).
pub fn anon_hash(raw_address: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_address.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest.iter() {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Short prefix of a token, safe to put in logs.
pub(crate) fn token_prefix(token: &str) -> &str {
    token.get(..12).unwrap_or(token)
}
