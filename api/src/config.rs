use std::env;

use axum::http::HeaderValue;

use crate::error::AppError;

mod defaults {
    pub const API_HOST: &str = "0.0.0.0";
    pub const PORT: &str = "5000";
    pub const APP_ENV: &str = "development";
    pub const ALLOWED_ORIGINS: &str = "http://localhost:5173";
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub app_env: String,
    pub allowed_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port_raw = get("PORT", defaults::PORT);
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::InvalidPort(port_raw.clone()))?;

        let allowed_origins = get("ALLOWED_ORIGINS", defaults::ALLOWED_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| AppError::InvalidOrigin(origin.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // NODE_ENV is accepted as a fallback name
        let app_env = get("APP_ENV", &get("NODE_ENV", defaults::APP_ENV));

        Ok(Self {
            host: get("API_HOST", defaults::API_HOST),
            port,
            app_env,
            allowed_origins,
        })
    }

    /// Per-request access logging is only enabled in development
    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }
}
