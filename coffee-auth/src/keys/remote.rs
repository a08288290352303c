use super::{KeyProvider, KeyStoreError};
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use log::{debug, warn};
use moka::future::Cache as MokaCache;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Key set published at a JWKS endpoint (e.g. `https://{domain}/.well-known/jwks.json`).
///
/// The set is fetched on first use and kept for `ttl`; a failed fetch is reported to the
/// caller and retried on the next request.
#[derive(Clone)]
pub struct RemoteKeyStore {
    url: String,
    client: Client,
    cache: MokaCache<String, Arc<JwkSet>>,
}

impl RemoteKeyStore {
    pub fn new(
        url: impl Into<String>,
        ttl: Duration,
        timeout: Duration,
    ) -> Result<Self, KeyStoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        let cache = MokaCache::builder()
            .time_to_live(ttl)
            .max_capacity(1)
            .build();

        Ok(Self {
            url: url.into(),
            client,
            cache,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Arc<JwkSet>, KeyStoreError> {
        debug!("Fetching signing keys from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!("Key set endpoint {} answered with status {}", self.url, status);
            return Err(KeyStoreError::InvalidStatus(status));
        }

        let body = response.bytes().await?;
        let keys: JwkSet = serde_json::from_slice(&body)?;
        debug!("Fetched {} signing key(s) from {}", keys.keys.len(), self.url);
        Ok(Arc::new(keys))
    }
}

#[async_trait]
impl KeyProvider for RemoteKeyStore {
    async fn key_set(&self) -> Result<Arc<JwkSet>, KeyStoreError> {
        if let Some(keys) = self.cache.get(&self.url).await {
            return Ok(keys);
        }

        let keys = self.fetch().await?;
        self.cache.insert(self.url.clone(), Arc::clone(&keys)).await;
        Ok(keys)
    }
}
