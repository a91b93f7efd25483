use std::env;

use crate::error::AppError;

pub const DEFAULT_FALLBACK_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub fallback_category: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            port,
            database_url,
            host,
            fallback_category: fallback_category(),
        })
    }
}

/// Name of the category that receives products when their category is deleted.
pub fn fallback_category() -> String {
    env::var("FALLBACK_CATEGORY")
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FALLBACK_CATEGORY.to_string())
}

pub fn jwt_secret() -> Result<String, AppError> {
    env::var("JWT_SECRET").map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))
}
