use super::{KeyProvider, KeyStoreError};
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use std::sync::Arc;

/// Key set that never changes
#[derive(Clone)]
pub struct StaticKeyStore {
    keys: Arc<JwkSet>,
}

impl StaticKeyStore {
    pub fn new(keys: JwkSet) -> Self {
        Self {
            keys: Arc::new(keys),
        }
    }
}

#[async_trait]
impl KeyProvider for StaticKeyStore {
    async fn key_set(&self) -> Result<Arc<JwkSet>, KeyStoreError> {
        Ok(Arc::clone(&self.keys))
    }
}
