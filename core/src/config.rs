//! Client configuration resolved from the process environment.

use crate::http::{HttpMethod, UnknownMethod};

/// Resource URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1200/articles";

/// Environment variable overriding the articles resource URL.
pub const BASE_URL_ENV_VAR: &str = "ARTICLES_BACKEND_URL";

/// Environment variable selecting the verb used for updates (`PUT` or `PATCH`).
pub const UPDATE_METHOD_ENV_VAR: &str = "ARTICLES_UPDATE_METHOD";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    InvalidMethod {
        var: &'static str,
        #[source]
        source: UnknownMethod,
    },
    #[error("{var}: {method} is not an update verb (expected PUT or PATCH)")]
    UnsupportedUpdateMethod { var: &'static str, method: HttpMethod },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub update_method: HttpMethod,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            update_method: HttpMethod::Put,
        }
    }
}

impl ClientConfig {
    /// Read the configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            std::env::var_os(key).and_then(|val| val.into_string().ok())
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV_VAR).filter(|url| !url.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(UPDATE_METHOD_ENV_VAR) {
            config.update_method = parse_update_method(&raw)?;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn parse_update_method(raw: &str) -> Result<HttpMethod, ConfigError> {
    let method = raw.parse::<HttpMethod>().map_err(|source| ConfigError::InvalidMethod {
        var: UPDATE_METHOD_ENV_VAR,
        source,
    })?;
    match method {
        HttpMethod::Put | HttpMethod::Patch => Ok(method),
        HttpMethod::Get | HttpMethod::Post | HttpMethod::Delete => {
            Err(ConfigError::UnsupportedUpdateMethod {
                var: UPDATE_METHOD_ENV_VAR,
                method,
            })
        }
    }
}
