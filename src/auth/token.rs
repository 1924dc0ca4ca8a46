use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, PermissionLevel};
use crate::config::SecurityConfig;

/// Signed claim payload embedded in every token.
/// Immutable once issued; validity is exactly `iat..exp` with no revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id (the credential's row id).
    pub sub: i64,
    pub permissions: PermissionLevel,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies signed tokens using the process-wide secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(security: &SecurityConfig) -> Result<Self, AuthError> {
        if security.token_secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(security.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(security.token_secret.as_bytes()),
            ttl: Duration::seconds(security.token_ttl_secs),
        })
    }

    /// Issue a token for `subject_id` valid for the configured TTL from now.
    pub fn issue(&self, subject_id: i64, permissions: PermissionLevel) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id,
            permissions,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|_| AuthError::Malformed)
    }

    /// Verify signature and expiry, returning the embedded claim.
    ///
    /// Zero leeway so the TTL boundary is exact: a token is `Expired` the
    /// moment `now > exp`, `InvalidSignature` on any tampering, and
    /// `Malformed` for anything that does not decode into a [`Claims`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            }
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&SecurityConfig {
            token_secret: secret.to_string(),
            token_ttl_secs: 300,
        })
        .unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        let result = TokenCodec::new(&SecurityConfig {
            token_secret: String::new(),
            token_ttl_secs: 300,
        });
        assert!(matches!(result, Err(AuthError::MissingSecret)));
    }

    #[test]
    fn issue_then_verify_round_trips_the_claim() {
        let codec = codec("unit-test-secret");
        let token = codec.issue(42, PermissionLevel::Admin).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.permissions, PermissionLevel::Admin);
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let codec = codec("unit-test-secret");
        // Hand-roll a claim whose validity window already ended.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 7,
            permissions: PermissionLevel::RegularUser,
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert!(matches!(codec.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn token_signed_with_other_secret_fails_signature_check() {
        let issuer = codec("secret-one");
        let verifier = codec("secret-two");
        let token = issuer.issue(1, PermissionLevel::RegularUser).unwrap();
        assert!(matches!(verifier.verify(&token), Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let codec = codec("unit-test-secret");
        assert!(matches!(codec.verify("not.a.token"), Err(AuthError::Malformed)));
        assert!(matches!(codec.verify(""), Err(AuthError::Malformed)));
    }

    #[test]
    fn structurally_different_payload_is_rejected() {
        let codec = codec("unit-test-secret");
        // Valid signature, wrong shape: no sub/permissions fields.
        #[derive(Serialize)]
        struct Other {
            exp: i64,
            role: &'static str,
        }
        let token = encode(
            &Header::default(),
            &Other { exp: Utc::now().timestamp() + 300, role: "admin" },
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert!(matches!(codec.verify(&token), Err(AuthError::Malformed)));
    }
}
