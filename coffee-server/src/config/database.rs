use confique::Config;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Specifies which drink store implementation to use
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Error)]
#[error("Unknown store '{0}', expected 'sqlite' or 'memory'")]
pub struct UnknownStore(String);

impl FromStr for StoreKind {
    type Err = UnknownStore;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(UnknownStore(other.to_string())),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Configuration for the drink store
#[derive(Debug, Config, Clone)]
pub struct DatabaseConfig {
    /// Store type: "sqlite" or "memory" (default: sqlite)
    #[config(env = "COFFEE_DATABASE_STORE", parse_env = StoreKind::from_str, default = "sqlite")]
    pub store: StoreKind,

    /// SQLite database file (default: database.db)
    #[config(env = "COFFEE_DATABASE_PATH", default = "database.db")]
    pub path: String,
}
