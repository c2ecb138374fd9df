use anyhow::{Context, Result};
use platform_db::DatabaseSettings;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub version: String,
    pub database: DatabaseSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Payroll Service".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            database: DatabaseSettings::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment. A `.env` file, when
    /// present, is expected to have been loaded already.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        let title = env_or("APP_TITLE", defaults.title);
        let version = env_or("APP_VERSION", defaults.version);
        let database = DatabaseSettings::from_env().context("invalid database settings")?;
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            title,
            version,
            database,
            cors_allowed_origins,
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or(default)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
