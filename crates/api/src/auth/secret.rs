//! Shared-secret comparison for machine callers (the cron trigger).
//!
//! Both sides are reduced to SHA-256 digests and compared in constant time,
//! so neither the length nor a shared prefix of the secret leaks through
//! timing.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Whether `provided` equals `expected`.
pub fn secret_matches(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a[..].ct_eq(&b[..]).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_secrets_match() {
        assert!(secret_matches("s3cret", "s3cret"));
    }

    #[test]
    fn different_secrets_do_not_match() {
        assert!(!secret_matches("s3cret", "s3cret "));
        assert!(!secret_matches("", "s3cret"));
    }

    #[test]
    fn shared_prefix_does_not_match() {
        assert!(!secret_matches("s3cre", "s3cret"));
        assert!(!secret_matches("s3cret-and-more", "s3cret"));
    }
}
