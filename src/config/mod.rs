use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::products::{SortDirection, SortOptions};

const DEVELOPMENT_SIGNUP_SECRET: &str = "scopegrid-dev-signup-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub products: ProductsConfig,
    pub signup: SignupConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsConfig {
    pub default_sort_key: String,
    pub default_sort_direction: SortDirection,
    /// Largest product list a single view request may carry
    pub max_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupConfig {
    #[serde(skip_serializing)]
    pub token_secret: String,
    /// Freshness window for verification; `None` accepts any issue time
    pub token_max_age_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl ProductsConfig {
    pub fn default_sort(&self) -> SortOptions {
        SortOptions::new(self.default_sort_key.clone(), self.default_sort_direction)
    }
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
        // Products overrides
        if let Ok(v) = env::var("PRODUCTS_DEFAULT_SORT_KEY") {
            if !v.trim().is_empty() {
                self.products.default_sort_key = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("PRODUCTS_DEFAULT_SORT_DIRECTION") {
            self.products.default_sort_direction = v.parse().unwrap_or(self.products.default_sort_direction);
        }
        if let Ok(v) = env::var("PRODUCTS_MAX_ITEMS") {
            self.products.max_items = v.parse().unwrap_or(self.products.max_items);
        }

        // Signup overrides
        if let Ok(v) = env::var("SIGNUP_TOKEN_SECRET") {
            self.signup.token_secret = v;
        }
        if let Ok(v) = env::var("SIGNUP_TOKEN_MAX_AGE_SECS") {
            self.signup.token_max_age_secs = v.parse().ok().filter(|secs| *secs > 0);
        }

        // API overrides
        if let Some(port) = env::var("API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
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
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            products: ProductsConfig {
                default_sort_key: "name".to_string(),
                default_sort_direction: SortDirection::Asc,
                max_items: 50_000,
            },
            signup: SignupConfig {
                token_secret: DEVELOPMENT_SIGNUP_SECRET.to_string(),
                token_max_age_secs: None,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            products: ProductsConfig {
                default_sort_key: "name".to_string(),
                default_sort_direction: SortDirection::Asc,
                max_items: 20_000,
            },
            signup: SignupConfig {
                token_secret: String::new(),
                token_max_age_secs: Some(24 * 60 * 60),
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.scopegrid.app".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            products: ProductsConfig {
                default_sort_key: "name".to_string(),
                default_sort_direction: SortDirection::Asc,
                max_items: 10_000,
            },
            signup: SignupConfig {
                token_secret: String::new(),
                token_max_age_secs: Some(24 * 60 * 60),
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.scopegrid.app".to_string()],
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

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
