use jsonwebtoken::jwk::JwkSet;
use std::sync::Arc;
use thiserror::Error;

pub mod remote;
pub mod fixed;

pub use fixed::StaticKeyStore;
pub use remote::RemoteKeyStore;

/// Errors that can occur while obtaining the trusted key set
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("Failed to fetch key set: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Key set endpoint answered with status {0}")]
    InvalidStatus(u16),
    #[error("Failed to parse key set: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of the signing keys tokens are verified against.
///
/// Implementations return the whole key set; the verifier picks the key by `kid`.
#[async_trait::async_trait]
pub trait KeyProvider: Send + Sync {
    /// Current trusted key set
    async fn key_set(&self) -> Result<Arc<JwkSet>, KeyStoreError>;

    /// Checks the key source can be reached and yields a usable key set
    async fn health_check(&self) -> Result<(), String> {
        match self.key_set().await {
            Ok(keys) if keys.keys.is_empty() => Err("key set is empty".to_string()),
            Ok(_) => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Key set source chosen at startup
#[derive(Clone)]
pub enum KeyStore {
    /// Keys fetched from a JWKS endpoint and cached in memory
    Remote(RemoteKeyStore),
    /// Fixed key set, used for tests and offline deployments
    Static(StaticKeyStore),
}

#[async_trait::async_trait]
impl KeyProvider for KeyStore {
    async fn key_set(&self) -> Result<Arc<JwkSet>, KeyStoreError> {
        match self {
            Self::Remote(store) => store.key_set().await,
            Self::Static(store) => store.key_set().await,
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        match self {
            Self::Remote(store) => store.health_check().await,
            Self::Static(store) => store.health_check().await,
        }
    }
}
