//! Bearer token verification.
//!
//! ```text
//! Authorization header → bearer token
//!                      → decode header (kid, alg), no signature check yet
//!                      → pick the JWK with that kid from the trusted key set
//!                      → verify signature, exp, aud, iss
//!                      → Claims
//! ```

use crate::claims::Claims;
use crate::error::AuthError;
use crate::header::bearer_token;
use crate::keys::{KeyProvider, KeyStore};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use log::{debug, error, warn};

/// Verifies access tokens issued for one audience by one issuer
#[derive(Clone)]
pub struct TokenVerifier {
    keys: KeyStore,
    audience: String,
    issuer: String,
    algorithms: Vec<Algorithm>,
}

impl TokenVerifier {
    pub fn new(
        keys: KeyStore,
        audience: impl Into<String>,
        issuer: impl Into<String>,
        algorithms: Vec<Algorithm>,
    ) -> Self {
        Self {
            keys,
            audience: audience.into(),
            issuer: issuer.into(),
            algorithms,
        }
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Extracts the bearer token from an `Authorization` header value and verifies it
    pub async fn verify_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = bearer_token(header).inspect_err(|e| {
            warn!("Rejected Authorization header: {}", e.description);
        })?;
        self.verify(token).await
    }

    /// Verifies a raw JWT and returns its full payload
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            warn!("Failed to decode token header: {}", e);
            AuthError::invalid_header("Unable to parse authentication token.")
        })?;

        let kid = header.kid.ok_or_else(|| {
            warn!("Token header has no 'kid'");
            AuthError::invalid_header("Authorization malformed.")
        })?;

        if !self.algorithms.contains(&header.alg) {
            warn!("Token signed with disallowed algorithm {:?}", header.alg);
            return Err(AuthError::invalid_header(
                "Unable to parse authentication token.",
            ));
        }

        let key_set = self.keys.key_set().await.map_err(|e| {
            error!("Failed to obtain signing keys: {}", e);
            AuthError::key_set_unavailable("Unable to fetch signing keys.")
        })?;

        let jwk = key_set.find(&kid).ok_or_else(|| {
            warn!("No signing key found for kid '{}'", kid);
            AuthError::invalid_header("Unable to find the appropriate key.")
        })?;

        let key = DecodingKey::from_jwk(jwk).map_err(|e| {
            warn!("Signing key '{}' is unusable: {}", kid, e);
            AuthError::invalid_header("Unable to find the appropriate key.")
        })?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
            let err = AuthError::from(e);
            warn!("Token rejected: {}", err);
            err
        })?;

        debug!("Verified token for subject {}", data.claims.subject());
        Ok(data.claims)
    }
}
