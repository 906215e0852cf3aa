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

//! Retry policy for transient failures.
//!
//! Exponential backoff with jitter, overridden by the server's `Retry-After`
//! duration for rate limits. Both clients drive the same policy; only the
//! sleep primitive differs.

use crate::error::VelixarError;
use rand::random;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retry attempts after the initial one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: f64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }

    /// Whether the error is worth another attempt. `attempt` counts retries
    /// already made (0 before the first retry).
    pub fn should_retry(&self, attempt: u32, error: &VelixarError) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }

    /// Backoff delay before retry number `attempt`. A server-provided
    /// `Retry-After` wins over the computed backoff.
    pub fn delay_for(&self, attempt: u32, error: &VelixarError) -> Duration {
        if let VelixarError::RateLimit {
            retry_after: Some(retry_after),
        } = error
        {
            return *retry_after;
        }

        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let jitter_factor = 1.0 + (random::<f64>() - 0.5) * 2.0 * self.jitter;
        let jittered = base * jitter_factor;
        Duration::from_secs_f64(jittered.min(self.max_delay.as_secs_f64()))
    }
}
