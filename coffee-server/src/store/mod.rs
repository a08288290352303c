use crate::config::{Settings, StoreKind};
use crate::models::{Drink, Ingredient, NewDrink};
use log::info;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Drink {0} not found")]
    NotFound(i64),
    #[error("A drink titled '{0}' already exists")]
    Conflict(String),
    #[error("Failed to (de)serialize recipe: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Backend(String),
}

/// Persistence interface for drinks.
///
/// Every call is a single-row (or full-scan) operation; implementations rely on their own
/// row-level atomicity and hold no locks across calls.
#[async_trait::async_trait]
pub trait DrinkStore: Send + Sync {
    /// All drinks ordered by id
    async fn find_all(&self) -> Result<Vec<Drink>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Drink>, StoreError>;

    /// Persists a new drink and returns it with its assigned id
    async fn insert(&self, drink: NewDrink) -> Result<Drink, StoreError>;

    /// Overwrites title and recipe of an existing drink
    async fn update(&self, drink: &Drink) -> Result<Drink, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Creates missing tables; never drops data
    async fn init_schema(&self) -> Result<(), StoreError>;

    /// Drops every drink and recreates the schema
    async fn clear(&self) -> Result<(), StoreError>;

    /// Returns Ok(()) if healthy, or Err with a descriptive message if unhealthy.
    async fn health_check(&self) -> Result<(), String>;
}

/// Drink store chosen at runtime from configuration
pub enum Store {
    /// SQLite file (or `:memory:`) backed store
    Sqlite(sqlite::SqliteStore),
    /// Process-local store, contents are lost on restart
    Memory(memory::MemoryStore),
}

#[async_trait::async_trait]
impl DrinkStore for Store {
    async fn find_all(&self) -> Result<Vec<Drink>, StoreError> {
        match self {
            Self::Sqlite(store) => store.find_all().await,
            Self::Memory(store) => store.find_all().await,
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Drink>, StoreError> {
        match self {
            Self::Sqlite(store) => store.find_by_id(id).await,
            Self::Memory(store) => store.find_by_id(id).await,
        }
    }

    async fn insert(&self, drink: NewDrink) -> Result<Drink, StoreError> {
        match self {
            Self::Sqlite(store) => store.insert(drink).await,
            Self::Memory(store) => store.insert(drink).await,
        }
    }

    async fn update(&self, drink: &Drink) -> Result<Drink, StoreError> {
        match self {
            Self::Sqlite(store) => store.update(drink).await,
            Self::Memory(store) => store.update(drink).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.delete(id).await,
            Self::Memory(store) => store.delete(id).await,
        }
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.init_schema().await,
            Self::Memory(store) => store.init_schema().await,
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.clear().await,
            Self::Memory(store) => store.clear().await,
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        match self {
            Self::Sqlite(store) => store.health_check().await,
            Self::Memory(store) => store.health_check().await,
        }
    }
}

/// Builds the configured store and makes sure its schema exists
pub async fn create_store(settings: &Settings) -> Result<Store, StoreError> {
    let store = match settings.database.store {
        StoreKind::Sqlite => Store::Sqlite(sqlite::SqliteStore::open(&settings.database.path)?),
        StoreKind::Memory => Store::Memory(memory::MemoryStore::new()),
    };
    store.init_schema().await?;
    info!("Using {} drink store", settings.database.store);
    Ok(store)
}

/// Wipes the store and seeds it with a single sample drink.
///
/// Destructive; only run on explicit operator request.
pub async fn reset<S: DrinkStore + ?Sized>(store: &S) -> Result<Drink, StoreError> {
    store.clear().await?;
    let drink = store
        .insert(NewDrink {
            title: "water".to_string(),
            recipe: vec![Ingredient {
                color: "blue".to_string(),
                name: "water".to_string(),
                parts: 1,
            }],
        })
        .await?;
    info!("Store reset, seeded drink {} '{}'", drink.id, drink.title);
    Ok(drink)
}
