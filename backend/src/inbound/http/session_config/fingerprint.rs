//! Loggable fingerprints of secrets.
//!
//! Startup logs name the session key, the hosted backend key and the model
//! key by a truncated SHA-256 digest, so two deployments can be compared
//! without any secret reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of `secret`, as 16 lowercase hex digits.
///
/// # Examples
///
/// ```rust
/// use coderush::inbound::http::session_config::fingerprint::fingerprint;
///
/// let fp = fingerprint(b"anon-key");
/// assert_eq!(fp.len(), 16);
/// assert_eq!(fp, fingerprint(b"anon-key"));
/// ```
#[must_use]
pub fn fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}

/// Fingerprint of a cookie key's signing half.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    fingerprint(key.signing())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_key_material_gives_same_fingerprint() {
        let first = Key::derive_from(&[b'a'; 64]);
        let second = Key::derive_from(&[b'a'; 64]);
        assert_eq!(key_fingerprint(&first), key_fingerprint(&second));
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"sb-anon-key".as_slice())]
    #[case(b"codestral-api-key".as_slice())]
    fn fingerprints_are_short_lowercase_hex(#[case] secret: &[u8]) {
        let fp = fingerprint(secret);
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, fp.to_lowercase());
    }

    #[rstest]
    fn distinct_secrets_are_distinguishable() {
        assert_ne!(fingerprint(b"staging"), fingerprint(b"production"));
    }
}
