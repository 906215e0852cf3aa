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

//! Velixar SDK errors.
//!
//! A closed taxonomy shared by the async and blocking clients. Validation
//! failures are raised before any request is constructed; transient kinds
//! (rate limit, timeout, 5xx) are retried internally before surfacing.

use std::time::Duration;
use thiserror::Error;

/// Velixar SDK errors.
#[derive(Error, Debug)]
pub enum VelixarError {
    /// Credential missing or rejected by the backend. Never retried.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// API key is valid but lacks the scope required for this operation.
    #[error("Insufficient scope for this operation")]
    InsufficientScope,

    /// Requested resource does not exist.
    #[error("Resource not found")]
    NotFound,

    /// Backend signaled throttling. `retry_after` carries the server-provided
    /// backoff when the `Retry-After` header was present.
    #[error("Rate limit exceeded")]
    RateLimit { retry_after: Option<Duration> },

    /// Local timeout or connection failure.
    #[error("Request timed out")]
    Timeout,

    /// Malformed input, detected client-side before any network call, or a
    /// 400 reported by the backend.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Other backend-reported failure.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for Velixar operations.
pub type Result<T> = std::result::Result<T, VelixarError>;

impl VelixarError {
    /// Whether a retry of the failed request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            VelixarError::RateLimit { .. } | VelixarError::Timeout => true,
            VelixarError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Classify a non-success HTTP response into an SDK error.
    pub(crate) fn from_status(status: u16, retry_after: Option<Duration>, body: String) -> Self {
        match status {
            401 => VelixarError::Authentication("Invalid or missing API key".into()),
            403 => VelixarError::InsufficientScope,
            404 => VelixarError::NotFound,
            429 => VelixarError::RateLimit { retry_after },
            400 => VelixarError::Validation(extract_error_message(&body, status)),
            _ => VelixarError::Api {
                status,
                message: extract_error_message(&body, status),
            },
        }
    }

    /// Normalize transport failures. Connect failures and local timeouts
    /// collapse into the retryable `Timeout` kind; everything else is
    /// terminal.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            VelixarError::Timeout
        } else {
            VelixarError::Request(err)
        }
    }
}

/// Parse a `Retry-After: <seconds>` header if present and well-formed.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Pull the `error` field out of a JSON error body, falling back to the raw
/// body or the bare status code.
fn extract_error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            VelixarError::from_status(401, None, String::new()),
            VelixarError::Authentication(_)
        ));
        assert!(matches!(
            VelixarError::from_status(403, None, String::new()),
            VelixarError::InsufficientScope
        ));
        assert!(matches!(
            VelixarError::from_status(404, None, String::new()),
            VelixarError::NotFound
        ));
        assert!(matches!(
            VelixarError::from_status(429, Some(Duration::from_secs(2)), String::new()),
            VelixarError::RateLimit {
                retry_after: Some(d)
            } if d == Duration::from_secs(2)
        ));
        assert!(matches!(
            VelixarError::from_status(400, None, r#"{"error":"bad tier"}"#.into()),
            VelixarError::Validation(msg) if msg == "bad tier"
        ));
        assert!(matches!(
            VelixarError::from_status(503, None, String::new()),
            VelixarError::Api { status: 503, .. }
        ));
    }

    #[test]
    fn retryability_table() {
        assert!(VelixarError::RateLimit { retry_after: None }.is_retryable());
        assert!(VelixarError::Timeout.is_retryable());
        assert!(VelixarError::Api {
            status: 500,
            message: String::new()
        }
        .is_retryable());
        assert!(!VelixarError::Api {
            status: 422,
            message: String::new()
        }
        .is_retryable());
        assert!(!VelixarError::Authentication("nope".into()).is_retryable());
        assert!(!VelixarError::Validation("empty content".into()).is_retryable());
        assert!(!VelixarError::NotFound.is_retryable());
    }

    #[test]
    fn error_message_extraction() {
        assert!(matches!(
            VelixarError::from_status(500, None, "upstream exploded".into()),
            VelixarError::Api { message, .. } if message == "upstream exploded"
        ));
        assert!(matches!(
            VelixarError::from_status(502, None, String::new()),
            VelixarError::Api { message, .. } if message == "HTTP 502"
        ));
    }
}
