use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_BYTES: usize = 16;

/// Generate a fresh random salt (base64-encoded 16 bytes from the OS CSPRNG).
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// Salted digest of a secret: base64(sha256(secret + salt)).
/// Deterministic over its inputs.
pub fn hash_password(secret: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt.as_bytes());
    BASE64.encode(hasher.finalize())
}

/// Recompute the digest for (secret, salt) and compare against the stored one.
/// The comparison runs over the full digest length regardless of where the
/// first mismatch occurs.
pub fn verify_password(secret: &str, salt: &str, expected_digest: &str) -> bool {
    let computed = hash_password(secret, salt);
    constant_time_eq(computed.as_bytes(), expected_digest.as_bytes())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = hash_password("hunter2", "pepper");
        let b = hash_password("hunter2", "pepper");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_salts_give_distinct_digests() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();
        assert_ne!(salt1, salt2);
        assert_ne!(hash_password("hunter2", &salt1), hash_password("hunter2", &salt2));
    }

    #[test]
    fn verify_accepts_genuine_digest() {
        let salt = generate_salt();
        let digest = hash_password("correct horse", &salt);
        assert!(verify_password("correct horse", &salt, &digest));
    }

    #[test]
    fn verify_rejects_altered_secret_or_salt() {
        let salt = generate_salt();
        let digest = hash_password("correct horse", &salt);
        assert!(!verify_password("battery staple", &salt, &digest));
        assert!(!verify_password("correct horse", "other-salt", &digest));
    }

    #[test]
    fn constant_time_eq_works() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"short", b"longer"));
    }
}
