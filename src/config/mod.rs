use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub store: StoreConfig,
    pub query: QueryConfig,
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
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Workbook to open; when unset the persisted SPREADSHEET_ID property is used
    pub spreadsheet_id: Option<String>,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    /// Highest addressable row position in any sheet
    pub max_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_page_size: usize,
    pub max_page_size: Option<usize>,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub bootstrap_on_start: bool,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Store overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.store.database_url = Some(v);
                self.store.backend = StoreBackend::Postgres;
            }
        }
        match env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => self.store.backend = StoreBackend::Memory,
            Ok("postgres") | Ok("pg") => self.store.backend = StoreBackend::Postgres,
            _ => {}
        }
        if let Ok(v) = env::var("SPREADSHEET_ID") {
            self.store.spreadsheet_id = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.store.max_connections = v.parse().unwrap_or(self.store.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.store.connection_timeout = v.parse().unwrap_or(self.store.connection_timeout);
        }

        if let Ok(v) = env::var("STORE_MAX_ROWS") {
            self.store.max_rows = v.parse().unwrap_or(self.store.max_rows);
        }

        // Query overrides
        if let Ok(v) = env::var("QUERY_DEFAULT_PAGE_SIZE") {
            self.query.default_page_size = v.parse().unwrap_or(self.query.default_page_size);
        }
        if let Ok(v) = env::var("QUERY_MAX_PAGE_SIZE") {
            self.query.max_page_size = v.parse().ok();
        }
        if let Ok(v) = env::var("QUERY_DEBUG_LOGGING") {
            self.query.debug_logging = v.parse().unwrap_or(self.query.debug_logging);
        }

        // API overrides
        if let Some(v) = env::var("BK_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("BOOTSTRAP_ON_START") {
            self.api.bootstrap_on_start = v.parse().unwrap_or(self.api.bootstrap_on_start);
        }
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
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            store: StoreConfig {
                backend: StoreBackend::Memory,
                spreadsheet_id: None,
                database_url: None,
                max_connections: 5,
                connection_timeout: 30,
                max_rows: 100_000,
            },
            query: QueryConfig {
                default_page_size: 10,
                max_page_size: Some(1000),
                debug_logging: true,
            },
            api: ApiConfig {
                port: 3000,
                bootstrap_on_start: true,
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            store: StoreConfig {
                backend: StoreBackend::Memory,
                spreadsheet_id: None,
                database_url: None,
                max_connections: 10,
                connection_timeout: 10,
                max_rows: 250_000,
            },
            query: QueryConfig {
                default_page_size: 10,
                max_page_size: Some(500),
                debug_logging: false,
            },
            api: ApiConfig {
                port: 3000,
                bootstrap_on_start: false,
                enable_request_logging: true,
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            store: StoreConfig {
                backend: StoreBackend::Memory,
                spreadsheet_id: None,
                database_url: None,
                max_connections: 20,
                connection_timeout: 5,
                max_rows: 500_000,
            },
            query: QueryConfig {
                default_page_size: 10,
                max_page_size: Some(100),
                debug_logging: false,
            },
            api: ApiConfig {
                port: 3000,
                bootstrap_on_start: false,
                enable_request_logging: false,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
