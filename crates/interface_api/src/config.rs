//! API configuration

use serde::Deserialize;

use domain_lifecycle::{AdminBootstrap, DEFAULT_PAGE_LIMIT};

/// API configuration
///
/// Every field can be overridden with an `API_`-prefixed environment
/// variable, e.g. `API_PORT=9000` or `API_ADMIN_PASSWORD=...`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Upper bound on pooled database connections
    pub max_connections: u32,
    /// Page size used when a listing omits `limit`
    pub default_page_limit: u32,
    /// Create the administrator account at startup when none exists
    pub bootstrap_admin: bool,
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_full_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let admin = AdminBootstrap::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 1800,
            database_url: "postgres://localhost/acp_health".to_string(),
            log_level: "info".to_string(),
            max_connections: 10,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            bootstrap_admin: true,
            admin_username: admin.username,
            admin_email: admin.email,
            admin_password: admin.password,
            admin_full_name: admin.full_name,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Administrator credentials to bootstrap, if enabled
    pub fn admin_bootstrap(&self) -> Option<AdminBootstrap> {
        self.bootstrap_admin.then(|| AdminBootstrap {
            username: self.admin_username.clone(),
            email: self.admin_email.clone(),
            password: self.admin_password.clone(),
            full_name: self.admin_full_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_listen_on_8001() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8001");
        assert_eq!(config.jwt_expiration_secs, 1800);
    }

    #[test]
    fn test_admin_bootstrap_can_be_disabled() {
        let mut config = ApiConfig::default();
        assert_eq!(
            config.admin_bootstrap().map(|a| a.username),
            Some("admin".to_string())
        );

        config.bootstrap_admin = false;
        assert!(config.admin_bootstrap().is_none());
    }
}
