use serde::Deserialize;
use std::env::vars;
use thiserror::Error;
use ustr::Ustr;
use usuarios_states::QueryOptions;

use crate::NextPagePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] serde_env::Error),
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Freshness window of a fetched page, in milliseconds.
    pub stale_time_ms: u64,
    /// How long an unused page stays cached, in milliseconds.
    pub gc_time_ms: u64,
    pub next_page_policy: NextPagePolicy,
}

/// Optional overrides read from `USUARIOS_*` environment variables.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    usuarios_api_base_url: Option<String>,
    usuarios_stale_time_ms: Option<u64>,
    usuarios_gc_time_ms: Option<u64>,
    usuarios_next_page_policy: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
            ..Self::default()
        }
    }

    pub fn api_url(&self) -> Ustr {
        let base = self.api_base_url.trim_end_matches('/');
        if base.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{base}/api"))
        }
    }

    pub fn users_url(&self) -> Ustr {
        Ustr::from(&format!("{}/users", self.api_url()))
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            stale_time: millis(self.stale_time_ms),
            gc_time: millis(self.gc_time_ms),
        }
    }

    /// Defaults overlaid with `USUARIOS_API_BASE_URL`, `USUARIOS_STALE_TIME_MS`,
    /// `USUARIOS_GC_TIME_MS` and `USUARIOS_NEXT_PAGE_POLICY` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_iter(vars())
    }

    pub fn from_env_iter<I, S>(iter: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let raw: RawConfig = serde_env::from_iter(iter)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            usuarios_api_base_url,
            usuarios_stale_time_ms,
            usuarios_gc_time_ms,
            usuarios_next_page_policy,
        } = raw;

        let mut config = Self::default();
        if let Some(url) = usuarios_api_base_url {
            config.api_base_url = url;
        }
        if let Some(ms) = usuarios_stale_time_ms {
            config.stale_time_ms = ms;
        }
        if let Some(ms) = usuarios_gc_time_ms {
            config.gc_time_ms = ms;
        }
        if let Some(policy) = usuarios_next_page_policy {
            config.next_page_policy =
                NextPagePolicy::parse(&policy).ok_or(ConfigError::InvalidValue {
                    key: "USUARIOS_NEXT_PAGE_POLICY",
                    value: policy,
                })?;
        }
        Ok(config)
    }
}

fn millis(ms: u64) -> chrono::Duration {
    i64::try_from(ms)
        .ok()
        .and_then(chrono::Duration::try_milliseconds)
        .unwrap_or(chrono::Duration::MAX)
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            // wasm builds are served next to the API, so requests stay relative.
            api_base_url: if cfg!(target_arch = "wasm32") {
                "".to_string()
            } else {
                "http://localhost:8000".to_string()
            },
            stale_time_ms: 5_000,
            gc_time_ms: 300_000,
            next_page_policy: NextPagePolicy::default(),
        }
    }
}
