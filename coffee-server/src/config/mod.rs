pub(crate) use crate::config::auth::AuthConfig;
pub(crate) use crate::config::cors::CorsConfig;
pub(crate) use crate::config::database::{DatabaseConfig, StoreKind};
use confique::Config;

pub mod auth;
pub mod cors;
pub mod database;

/// Optional configuration file read from the working directory
pub const CONFIG_FILE: &str = "coffee.toml";

/// Main configuration structure for the coffee server
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The port the server will listen to (default: 5000)
    #[config(env = "COFFEE_PORT", default = 5000)]
    pub port: u16,

    /// Identity provider configuration
    #[config(nested)]
    pub auth: AuthConfig,

    /// Drink store configuration
    #[config(nested)]
    pub database: DatabaseConfig,

    /// CORS configuration
    #[config(nested)]
    pub cors: CorsConfig,
}

impl Settings {
    /// Loads settings from environment variables, falling back to `coffee.toml`
    pub fn new() -> Result<Self, confique::Error> {
        Settings::builder().env().file(CONFIG_FILE).load()
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        use coffee_auth::testutil::{TEST_AUDIENCE, TEST_DOMAIN};

        Self {
            port: 0, // Let the OS choose a port
            auth: AuthConfig {
                domain: TEST_DOMAIN.to_string(),
                audience: TEST_AUDIENCE.to_string(),
                algorithms: vec!["HS256".to_string()],
                jwks_url: None,
                jwks_cache_ttl: 600,
                jwks_timeout: 1,
            },
            database: DatabaseConfig {
                store: StoreKind::Memory,
                path: ":memory:".to_string(),
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_string()],
            },
        }
    }
}
