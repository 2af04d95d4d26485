//! Sync server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Sync server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: String,
    /// HTTP port (webhook ingress + admin API)
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Webhook signature key shared with the commerce platform
    pub webhook_signature_key: String,
    /// Public notification URL registered with the commerce platform;
    /// signed together with each delivery body
    pub webhook_notification_url: String,
    /// Base URL of the commerce API
    pub commerce_base_url: String,
    /// Bearer token for the commerce API
    pub commerce_access_token: String,
    /// Location whose inventory this deployment tracks
    pub commerce_location_id: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/sync.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            webhook_signature_key: Self::require_secret("WEBHOOK_SIGNATURE_KEY", &environment)?,
            webhook_notification_url: std::env::var("WEBHOOK_NOTIFICATION_URL")
                .unwrap_or_else(|_| "http://localhost:8080/webhooks/commerce".into()),
            commerce_base_url: std::env::var("COMMERCE_BASE_URL")
                .unwrap_or_else(|_| "https://connect.commerce.example.com".into()),
            commerce_access_token: Self::require_secret("COMMERCE_ACCESS_TOKEN", &environment)?,
            commerce_location_id: std::env::var("COMMERCE_LOCATION_ID")
                .unwrap_or_else(|_| "main".into()),
            environment,
        })
    }

    /// Create a config with custom overrides
    ///
    /// Used in tests
    pub fn with_overrides(
        database_path: impl Into<String>,
        http_port: u16,
        webhook_signature_key: impl Into<String>,
    ) -> Result<Self, BoxError> {
        let mut config = Self::from_env()?;
        config.database_path = database_path.into();
        config.http_port = http_port;
        config.webhook_signature_key = webhook_signature_key.into();
        Ok(config)
    }
}
