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

//! Blocking Velixar client.
//!
//! Same validation, request construction and error semantics as the async
//! [`VelixarClient`](crate::VelixarClient); each operation blocks the calling
//! thread until the response arrives or the configured timeout elapses.
//! Must not be used from within an async runtime; use the async client there.

use crate::client::{unwrap_memory, USER_AGENT};
use crate::config::ClientConfig;
use crate::error::{parse_retry_after, Result, VelixarError};
use crate::retry::RetryPolicy;
use crate::types::*;
use reqwest::blocking::Client as HttpClient;
use reqwest::Method;
use tracing::{debug, warn};

/// Blocking client for the Velixar persistent memory API.
///
/// # Example
///
/// ```no_run
/// use velixar::blocking::VelixarClient;
/// use velixar::{ClientConfig, StoreRequest};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = VelixarClient::new(ClientConfig::from_env()?)?;
///     let id = client.store(StoreRequest::new("User works in UTC+2"))?;
///     println!("Stored memory: {}", id);
///     Ok(())
/// }
/// ```
pub struct VelixarClient {
    config: ClientConfig,
    retry: RetryPolicy,
    http: HttpClient,
}

impl VelixarClient {
    /// Create a new blocking client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(50)
            .build()?;

        Ok(Self {
            retry: RetryPolicy::new(config.max_retries),
            config,
            http,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        params: Option<&[(&str, String)]>,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut attempt = 0u32;

        loop {
            debug!(%method, %url, attempt, "sending request");
            match self.execute(&method, &url, body, params) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !self.retry.should_retry(attempt, &err) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for(attempt, &err);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.retry.max_retries,
                        ?delay,
                        error = %err,
                        "transient failure, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    fn execute<T: serde::de::DeserializeOwned>(
        &self,
        method: &Method,
        url: &str,
        body: Option<&serde_json::Value>,
        params: Option<&[(&str, String)]>,
    ) -> Result<T> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::USER_AGENT, USER_AGENT);

        if let Some(params) = params {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(VelixarError::from_transport)?;
        let status = response.status();

        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let message = response.text().unwrap_or_default();
            return Err(VelixarError::from_status(
                status.as_u16(),
                retry_after,
                message,
            ));
        }

        response.json().map_err(VelixarError::from_transport)
    }

    // ========== Memory Operations ==========

    /// Store a memory. Returns the backend-assigned memory ID.
    pub fn store(&self, request: impl Into<StoreRequest>) -> Result<String> {
        let request = request.into();
        request.validate()?;
        let body = serde_json::to_value(&request)?;
        let response: StoreResponse = self.request(Method::POST, "/memory", Some(&body), None)?;
        Ok(response.id)
    }

    /// Store multiple memories in one request, with per-item outcomes in
    /// input order. See [`VelixarClient::store_many`](crate::VelixarClient::store_many)
    /// for the partial-failure semantics.
    pub fn store_many(&self, requests: Vec<StoreRequest>) -> Result<BatchResult> {
        let plan = plan_batch(&requests);
        if plan.to_send.is_empty() {
            return Ok(plan.merge(Vec::new()));
        }

        let body = serde_json::json!({ "memories": plan.to_send });
        let response: BatchResponse =
            self.request(Method::POST, "/memory/batch", Some(&body), None)?;
        Ok(plan.merge(response.results))
    }

    /// Search memories by semantic similarity.
    pub fn search(&self, query: &str, opts: SearchOptions) -> Result<SearchResult> {
        validate_query(query)?;
        validate_limit(opts.limit)?;

        let params = opts.to_params(query);
        let response: SearchResponse =
            self.request(Method::GET, "/memory/search", None, Some(&params))?;
        Ok(SearchResult {
            memories: response.memories,
            count: response.count,
            query: query.to_string(),
        })
    }

    /// Get a specific memory by ID.
    pub fn get(&self, memory_id: &str) -> Result<Memory> {
        if memory_id.trim().is_empty() {
            return Err(VelixarError::Validation("memory id must not be empty".into()));
        }
        let value: serde_json::Value =
            self.request(Method::GET, &format!("/memory/{}", memory_id), None, None)?;
        unwrap_memory(value)
    }

    /// Get a prompt-ready context string for a query. The token budget is
    /// honored server-side.
    pub fn get_context(&self, query: &str, opts: ContextOptions) -> Result<String> {
        validate_query(query)?;
        validate_max_tokens(opts.max_tokens)?;

        let params = opts.to_params(query);
        let response: ContextResponse =
            self.request(Method::GET, "/memory/context", None, Some(&params))?;
        Ok(response.context)
    }
}
