use crate::{
    config::Settings,
    store::{create_store, DrinkStore, Store},
};
use coffee_auth::{KeyProvider, KeyStore, RemoteKeyStore, TokenVerifier};
use log::info;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<Store>,
    pub verifier: Arc<TokenVerifier>,
}

/// Health of each component backing the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHealth {
    pub store: Result<(), String>,
    pub keys: Result<(), String>,
}

impl ComponentHealth {
    pub fn is_healthy(&self) -> bool {
        self.store.is_ok() && self.keys.is_ok()
    }
}

impl AppState {
    fn create_verifier(settings: &Settings) -> Result<TokenVerifier, std::io::Error> {
        let auth = &settings.auth;
        let algorithms = auth.algorithms().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
        })?;

        let keys = RemoteKeyStore::new(auth.jwks_url(), auth.jwks_cache_ttl(), auth.jwks_timeout())
            .map_err(|e| std::io::Error::other(format!("Failed to create key store: {}", e)))?;
        info!(
            "Verifying tokens for audience '{}' from issuer '{}' (keys: {})",
            auth.audience,
            auth.issuer(),
            keys.url()
        );

        Ok(TokenVerifier::new(
            KeyStore::Remote(keys),
            auth.audience.clone(),
            auth.issuer(),
            algorithms,
        ))
    }

    pub async fn new(settings: Settings) -> Result<Self, std::io::Error> {
        let verifier = Self::create_verifier(&settings)?;
        let store = create_store(&settings)
            .await
            .map_err(|e| std::io::Error::other(format!("Failed to create store: {}", e)))?;

        Ok(Self {
            settings: Arc::new(settings),
            store: Arc::new(store),
            verifier: Arc::new(verifier),
        })
    }

    /// Check every component; a failing one makes the service not ready
    pub async fn health_check(&self) -> ComponentHealth {
        ComponentHealth {
            store: self.store.health_check().await,
            keys: self.verifier.keys().health_check().await,
        }
    }
}
