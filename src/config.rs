use anyhow::Context;
use serde::Deserialize;

/// Number of organic results requested from, and returned for, a provider search.
pub const SEARCH_RESULT_COUNT: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: u64,
    pub result_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub search: SearchConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let search = SearchConfig::from_lookup(&lookup)?;
        Ok(Self {
            database_url,
            db_max_connections,
            search,
        })
    }
}

impl SearchConfig {
    fn from_lookup<F>(lookup: &F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("SEARCH_API_KEY").filter(|v| !v.trim().is_empty());
        let api_url = lookup("SEARCH_API_URL").filter(|v| !v.trim().is_empty());
        if api_key.is_some() && api_url.is_none() {
            anyhow::bail!("SEARCH_API_URL must be set when SEARCH_API_KEY is configured");
        }
        Ok(Self {
            api_key,
            api_url,
            timeout_secs: lookup("SEARCH_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
            result_count: SEARCH_RESULT_COUNT,
        })
    }

    /// Key and endpoint of the external provider, when one is configured.
    pub fn provider(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.api_url) {
            (Some(key), Some(url)) => Some((key.as_str(), url.as_str())),
            _ => None,
        }
    }
}
