use super::{DrinkStore, StoreError};
use crate::models::{Drink, NewDrink};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    last_id: i64,
    drinks: BTreeMap<i64, Drink>,
}

impl Inner {
    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.drinks
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except)
    }
}

/// In-process drink store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Drink>, StoreError> {
        Ok(self.inner.read().await.drinks.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Drink>, StoreError> {
        Ok(self.inner.read().await.drinks.get(&id).cloned())
    }

    async fn insert(&self, drink: NewDrink) -> Result<Drink, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.title_taken(&drink.title, None) {
            return Err(StoreError::Conflict(drink.title));
        }

        inner.last_id += 1;
        let drink = Drink {
            id: inner.last_id,
            title: drink.title,
            recipe: drink.recipe,
        };
        inner.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    async fn update(&self, drink: &Drink) -> Result<Drink, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.drinks.contains_key(&drink.id) {
            return Err(StoreError::NotFound(drink.id));
        }
        if inner.title_taken(&drink.title, Some(drink.id)) {
            return Err(StoreError::Conflict(drink.title.clone()));
        }

        inner.drinks.insert(drink.id, drink.clone());
        Ok(drink.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        match self.inner.write().await.drinks.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.inner.write().await = Inner::default();
        Ok(())
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}
