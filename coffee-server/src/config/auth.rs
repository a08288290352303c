//! Identity provider configuration

use coffee_auth::Algorithm;
use confique::Config;
use std::str::FromStr;
use std::time::Duration;

/// Settings for verifying bearer tokens issued by the identity provider
#[derive(Debug, Config, Clone)]
pub struct AuthConfig {
    /// Identity provider domain, e.g. `my-tenant.us.auth0.com` (required)
    #[config(env = "COFFEE_AUTH_DOMAIN")]
    pub domain: String,

    /// API audience tokens must be issued for (default: coffee)
    #[config(env = "COFFEE_AUTH_AUDIENCE", default = "coffee")]
    pub audience: String,

    /// Accepted signing algorithms, comma-separated (default: RS256)
    #[config(
        env = "COFFEE_AUTH_ALGORITHMS",
        parse_env = confique::env::parse::list_by_comma,
        default = ["RS256"]
    )]
    pub algorithms: Vec<String>,

    /// Key set URL; derived from the domain when unset
    #[config(env = "COFFEE_AUTH_JWKS_URL")]
    pub jwks_url: Option<String>,

    /// How long a fetched key set is trusted, in seconds (default: 600)
    #[config(env = "COFFEE_AUTH_JWKS_CACHE_TTL", default = 600)]
    pub jwks_cache_ttl: u64,

    /// Timeout for key set requests in seconds (default: 5)
    #[config(env = "COFFEE_AUTH_JWKS_TIMEOUT", default = 5)]
    pub jwks_timeout: u64,
}

impl AuthConfig {
    /// Expected `iss` claim
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain.trim_end_matches('/'))
    }

    pub fn jwks_url(&self) -> String {
        match &self.jwks_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "https://{}/.well-known/jwks.json",
                self.domain.trim_end_matches('/')
            ),
        }
    }

    pub fn algorithms(&self) -> Result<Vec<Algorithm>, String> {
        self.algorithms
            .iter()
            .map(|alg| {
                Algorithm::from_str(alg.trim())
                    .map_err(|_| format!("Unsupported signing algorithm '{alg}'"))
            })
            .collect()
    }

    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl)
    }

    pub fn jwks_timeout(&self) -> Duration {
        Duration::from_secs(self.jwks_timeout)
    }
}
