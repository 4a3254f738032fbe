use crate::error::ConfigError;
use crate::model::PAGE_SIZE;
use reqwest::Url;

pub const BASE_URL_VAR: &str = "INCIDENT_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub page_size: usize,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                value: base_url.to_string(),
                reason: "expected an http(s) url".into(),
            });
        }
        Ok(Self {
            base_url: parsed,
            page_size: PAGE_SIZE,
        })
    }

    /// Reads the base url from the process environment, loading `.env`
    /// first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(&base_url)
    }

    /// Base url baked in at compile time, for bundles that have no process
    /// environment at runtime.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::new(option_env!("INCIDENT_API_BASE_URL").unwrap_or(DEFAULT_BASE_URL))
    }

    /// Absolute url for `path` under the configured base.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
