use confique::Config;

/// Cross-origin settings for the browser frontend
#[derive(Debug, Config, Clone)]
pub struct CorsConfig {
    /// Allowed origins, comma-separated; "*" allows any origin (default: *)
    #[config(
        env = "COFFEE_CORS_ALLOWED_ORIGINS",
        parse_env = confique::env::parse::list_by_comma,
        default = ["*"]
    )]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}
