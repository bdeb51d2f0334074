use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Shared HS256 secret, same value the token issuer signs with
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_header: String,
    pub jwt_prefix: String,
    pub jwt_leeway_secs: u64,
    pub jwt_expiration_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        Self::for_environment(environment).with_env_overrides()
    }

    /// Profile defaults only, no environment variables consulted
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides (GASTOS_API_PORT wins over the generic PORT)
        if let Some(port) = env::var("GASTOS_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("STORAGE") {
            match v.to_ascii_lowercase().as_str() {
                "memory" | "mem" => self.database.backend = StorageBackend::Memory,
                "postgres" | "pg" => self.database.backend = StorageBackend::Postgres,
                other => tracing::warn!("Ignoring unknown STORAGE value '{}'", other),
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_HEADER") {
            if !v.trim().is_empty() {
                self.security.jwt_header = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("JWT_PREFIX") {
            if !v.trim().is_empty() {
                self.security.jwt_prefix = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("JWT_LEEWAY_SECS") {
            self.security.jwt_leeway_secs = v.parse().unwrap_or(self.security.jwt_leeway_secs);
        }
        if let Ok(v) = env::var("JWT_EXPIRATION_SECS") {
            self.security.jwt_expiration_secs = v.parse().unwrap_or(self.security.jwt_expiration_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                backend: StorageBackend::Memory,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:19006".to_string(),
                ],
                jwt_secret: String::new(),
                jwt_header: "Authorization".to_string(),
                jwt_prefix: "Bearer".to_string(),
                jwt_leeway_secs: 0,
                jwt_expiration_secs: 60 * 60,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_header: "Authorization".to_string(),
                jwt_prefix: "Bearer".to_string(),
                jwt_leeway_secs: 0,
                jwt_expiration_secs: 60 * 60,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_header: "Authorization".to_string(),
                jwt_prefix: "Bearer".to_string(),
                jwt_leeway_secs: 0,
                jwt_expiration_secs: 60 * 60,
            },
        }
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.security.jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must be set to the secret shared with the token issuer");
        }
        if self.database.backend == StorageBackend::Postgres && self.database.url.is_none() {
            anyhow::bail!("DATABASE_URL is required when STORAGE=postgres");
        }
        Ok(())
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
