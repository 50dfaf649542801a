// ABOUTME: Endpoint configuration for the hosted backend, read from the environment

use std::env;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

/// Where the hosted backend lives and the key that opens it.
///
/// One base URL serves both planes: `{api_url}/rest/v1` for data and
/// `{api_url}/auth/v1` for identity. The key is the public anon key, sent
/// as `apikey` on every request and as the bearer fallback when nobody is
/// signed in.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    pub api_url: String,
    pub api_key: String,
}

impl CloudConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_url = api_url.into();
        CloudConfig {
            // request paths are joined with a slash, so drop any trailing one
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Reads `MILEMAP_API_URL` and `MILEMAP_API_KEY`; unset or blank
    /// variables are an error rather than a silent default.
    pub fn from_env() -> ConfigResult<Self> {
        let api_url = require_var("MILEMAP_API_URL")?;
        let api_key = require_var("MILEMAP_API_KEY")?;
        Ok(CloudConfig::new(api_url, api_key))
    }
}

fn require_var(name: &'static str) -> ConfigResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_slash_is_normalized() {
        let config = CloudConfig::new("https://db.example.com/", "anon-key");
        assert_eq!(config.api_url, "https://db.example.com");
        assert_eq!(config.api_key, "anon-key");
    }

    // the only test touching these variables, so no cross-test interference
    #[test]
    fn from_env_requires_both_variables() {
        env::set_var("MILEMAP_API_URL", "https://db.example.com");
        env::set_var("MILEMAP_API_KEY", "anon-key");
        let config = CloudConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://db.example.com");

        env::remove_var("MILEMAP_API_KEY");
        let err = CloudConfig::from_env().unwrap_err();
        assert_eq!(
            err.to_string(),
            "environment variable MILEMAP_API_KEY is not set"
        );

        env::set_var("MILEMAP_API_KEY", "   ");
        assert!(CloudConfig::from_env().is_err());

        env::remove_var("MILEMAP_API_URL");
        env::remove_var("MILEMAP_API_KEY");
    }
}
