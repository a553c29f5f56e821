//! Bearer Token Utilities
//!
//! Opaque session tokens: 32 random bytes, base64url-encoded for the wire.
//! Only the SHA-256 digest is persisted, so a database leak does not leak
//! usable credentials.

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Token length in raw bytes (256 bits of entropy)
pub const TOKEN_BYTES_LEN: usize = 32;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a fresh opaque bearer token (base64url, no padding)
pub fn generate_token() -> String {
    let bytes = random_bytes(TOKEN_BYTES_LEN);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest a token for storage or lookup
pub fn token_digest(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        assert_eq!(random_bytes(32).len(), 32);
        assert_eq!(random_bytes(0).len(), 0);
    }

    #[test]
    fn test_random_bytes_not_all_zeros() {
        let bytes = random_bytes(32);
        assert!(
            bytes.iter().any(|&b| b != 0),
            "Random bytes should not be all zeros"
        );
    }

    #[test]
    fn test_generate_token_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // base64url of 32 bytes without padding
        assert_eq!(a.len(), 43);
        assert!(!a.contains('+') && !a.contains('/') && !a.contains('='));
    }

    #[test]
    fn test_token_digest_known_value() {
        // SHA-256 of "hello"
        let digest = token_digest("hello");
        let expected =
            hex::decode("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
                .unwrap();
        assert_eq!(digest.to_vec(), expected);
    }

    #[test]
    fn test_token_digest_deterministic() {
        let token = generate_token();
        assert_eq!(token_digest(&token), token_digest(&token));
        assert_ne!(token_digest(&token), token_digest("other"));
    }

}
