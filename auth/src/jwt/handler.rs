use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Token codec: issues and verifies compact signed tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a single symmetric key injected at
/// construction. Key rotation is unsupported; changing the key invalidates
/// every previously issued token.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new token codec with a secret key.
    ///
    /// The secret should be at least 256 bits (32 bytes) for HS256 and come
    /// from configuration, never from a constant in code.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed token for a subject.
    ///
    /// The claim set carries `sub` = `subject`, `iat` = now, `exp` = now +
    /// `validity`, merged with `extra_claims`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        subject: &str,
        extra_claims: HashMap<String, serde_json::Value>,
        validity: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_subject(subject, validity).with_extra_claims(extra_claims);
        self.encode(&claims)
    }

    /// Encode a claim set into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode a token and verify its signature and expiration.
    ///
    /// The signature is checked first; `Expired` is only ever reported for a
    /// token whose signature verified, so an attacker cannot learn anything
    /// from an unsigned expiration claim.
    ///
    /// # Errors
    /// * `Malformed` - Token structure cannot be parsed
    /// * `InvalidSignature` - Signature does not match
    /// * `Expired` - Current time is at or past the expiration claim
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        // Expiration is checked manually below so the exclusive bound
        // (valid iff now < exp) holds.
        validation.validate_exp = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        let claims = token_data.claims;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }

    /// Extract the subject claim from a verified token.
    ///
    /// # Errors
    /// * All `verify` errors
    /// * `MissingClaim` - Verified token carries no `sub`
    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        self.verify(token)?
            .sub
            .ok_or_else(|| JwtError::MissingClaim("sub".to_string()))
    }

    /// Check whether a token is valid for an expected subject.
    ///
    /// True iff the signature verifies, the token is not expired, and the
    /// embedded subject equals `expected_subject`. Used on the per-request
    /// hot path, so every failure collapses to `false` instead of an error.
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        match self.verify(token) {
            Ok(claims) => claims.sub.as_deref() == Some(expected_subject),
            Err(_) => false,
        }
    }
}
