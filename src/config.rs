// Copyright 2025 Velixar (https://github.com/velixar)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Client configuration.
//!
//! Resolved once at construction and immutable for the client's lifetime.
//! Explicit arguments take precedence over the `VELIXAR_API_KEY` and
//! `VELIXAR_BASE_URL` environment variables.

use crate::error::{Result, VelixarError};
use std::env;
use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.velixarai.com/v1";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default bound on retry attempts for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Environment variable consulted when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "VELIXAR_API_KEY";
/// Environment variable overriding the default endpoint.
pub const BASE_URL_ENV: &str = "VELIXAR_BASE_URL";

const API_KEY_PREFIX: &str = "vlx_";

/// Velixar client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key credential, format `vlx_<opaque>`.
    pub api_key: String,
    /// Base URL of the Velixar API, without trailing slash.
    pub base_url: String,
    /// Per-request timeout (default: 30 seconds).
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures (default: 3). The
    /// initial attempt is not counted.
    pub max_retries: u32,
}

impl ClientConfig {
    /// Create a configuration with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::build(Some(api_key.into()))
    }

    /// Create a configuration from `VELIXAR_API_KEY` / `VELIXAR_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::build(None)
    }

    fn build(api_key: Option<String>) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                VelixarError::Authentication(format!(
                    "API key required: set {} or pass one to ClientConfig::new",
                    API_KEY_ENV
                ))
            })?,
        };
        validate_api_key(&api_key)?;

        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Override the API endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry bound for transient failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

fn validate_api_key(api_key: &str) -> Result<()> {
    if !api_key.starts_with(API_KEY_PREFIX) || api_key.len() <= API_KEY_PREFIX.len() {
        return Err(VelixarError::Validation(format!(
            "malformed API key: expected format {}<opaque>",
            API_KEY_PREFIX
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment mutation is process-wide; serialize the tests that touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn explicit_key_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(BASE_URL_ENV);

        let config = ClientConfig::new("vlx_test_key").unwrap();
        assert_eq!(config.api_key, "vlx_test_key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn env_fallback_and_precedence() {
        let _guard = ENV_LOCK.lock().unwrap();

        env::set_var(API_KEY_ENV, "vlx_from_env");
        env::set_var(BASE_URL_ENV, "https://staging.velixarai.com/v1/");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key, "vlx_from_env");
        // Trailing slash trimmed.
        assert_eq!(config.base_url, "https://staging.velixarai.com/v1");

        // Explicit argument wins over the environment.
        let config = ClientConfig::new("vlx_explicit")
            .unwrap()
            .with_base_url("http://localhost:9090");
        assert_eq!(config.api_key, "vlx_explicit");
        assert_eq!(config.base_url, "http://localhost:9090");

        env::remove_var(API_KEY_ENV);
        env::remove_var(BASE_URL_ENV);
    }

    #[test]
    fn missing_key_is_an_authentication_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(API_KEY_ENV);

        assert!(matches!(
            ClientConfig::from_env(),
            Err(VelixarError::Authentication(_))
        ));
    }

    #[test]
    fn malformed_key_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        assert!(matches!(
            ClientConfig::new("sk-wrong-vendor"),
            Err(VelixarError::Validation(_))
        ));
        assert!(matches!(
            ClientConfig::new("vlx_"),
            Err(VelixarError::Validation(_))
        ));
    }

    #[test]
    fn builder_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        let config = ClientConfig::new("vlx_test_key")
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 0);
    }
}
