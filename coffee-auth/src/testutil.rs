//! Test helpers for minting tokens and key sets.
//!
//! Tokens are signed with HS256 using a shared secret published as an `oct` JWK, so
//! tests need no key generation. Enable the `testutil` feature to use these outside
//! this crate:
//!
//! ```toml
//! [dev-dependencies]
//! coffee-auth = { path = "../coffee-auth", features = ["testutil"] }
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

pub const TEST_KID: &str = "coffee-test-key";
pub const TEST_SECRET: &[u8] = b"coffee-shop-test-signing-secret-0123456789";
pub const TEST_AUDIENCE: &str = "coffee";
pub const TEST_DOMAIN: &str = "coffee-test.auth0.com";
pub const TEST_ISSUER: &str = "https://coffee-test.auth0.com/";

/// JWKS document containing the test signing key
pub fn test_jwks_json() -> Value {
    json!({
        "keys": [{
            "kty": "oct",
            "kid": TEST_KID,
            "alg": "HS256",
            "k": URL_SAFE_NO_PAD.encode(TEST_SECRET),
        }]
    })
}

/// Parsed form of [`test_jwks_json`]
///
/// # Panics
///
/// Panics if the test key set cannot be parsed.
pub fn test_jwks() -> JwkSet {
    serde_json::from_value(test_jwks_json()).expect("Failed to parse test JWKS")
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Builds signed test tokens. Defaults produce a token the test verifier accepts.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    kid: Option<String>,
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    subject: String,
    permissions: Option<Vec<String>>,
    expires_in: i64,
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self {
            kid: Some(TEST_KID.to_string()),
            secret: TEST_SECRET.to_vec(),
            issuer: TEST_ISSUER.to_string(),
            audience: TEST_AUDIENCE.to_string(),
            subject: "auth0|barista".to_string(),
            permissions: None,
            expires_in: 3600,
        }
    }
}

impl TokenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions = Some(permissions.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn kid(mut self, kid: &str) -> Self {
        self.kid = Some(kid.to_string());
        self
    }

    pub fn without_kid(mut self) -> Self {
        self.kid = None;
        self
    }

    pub fn secret(mut self, secret: &[u8]) -> Self {
        self.secret = secret.to_vec();
        self
    }

    pub fn issuer(mut self, issuer: &str) -> Self {
        self.issuer = issuer.to_string();
        self
    }

    pub fn audience(mut self, audience: &str) -> Self {
        self.audience = audience.to_string();
        self
    }

    /// Expired an hour ago, well past the default validation leeway
    pub fn expired(mut self) -> Self {
        self.expires_in = -3600;
        self
    }

    /// # Panics
    ///
    /// Panics if JWT encoding fails.
    pub fn sign(&self) -> String {
        let now = now();
        let mut claims = json!({
            "iss": self.issuer,
            "sub": self.subject,
            "aud": self.audience,
            "iat": now,
            "exp": now + self.expires_in,
        });
        if let Some(permissions) = &self.permissions {
            claims["permissions"] = json!(permissions);
        }

        let mut header = Header::new(Algorithm::HS256);
        header.kid = self.kid.clone();

        jsonwebtoken::encode(&header, &claims, &EncodingKey::from_secret(&self.secret))
            .expect("Failed to encode test JWT")
    }
}
