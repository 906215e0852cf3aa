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

//! # Velixar SDK for Rust
//!
//! Persistent memory for AI applications. The client turns typed calls into
//! HTTPS requests against the Velixar API, validates inputs before any
//! network traffic, and retries transient failures (timeouts, rate limits,
//! 5xx) with bounded exponential backoff.
//!
//! ## Quick Start
//!
//! ```no_run
//! use velixar::{ClientConfig, MemoryTier, SearchOptions, StoreRequest, VelixarClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads VELIXAR_API_KEY (and optionally VELIXAR_BASE_URL).
//!     let client = VelixarClient::new(ClientConfig::from_env()?)?;
//!
//!     // Store a memory
//!     let id = client
//!         .store(
//!             StoreRequest::new("User prefers metric units")
//!                 .with_tier(MemoryTier::Pinned)
//!                 .with_user_id("user-42"),
//!         )
//!         .await?;
//!     println!("Stored: {}", id);
//!
//!     // Search memories, most relevant first
//!     let results = client
//!         .search("user preferences", SearchOptions::default())
//!         .await?;
//!     for memory in &results.memories {
//!         println!("{:?}: {}", memory.score, memory.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Prompt context
//!
//! ```no_run
//! use velixar::{ClientConfig, ContextOptions, VelixarClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = VelixarClient::new(ClientConfig::from_env()?)?;
//!
//! // A single string, assembled and token-bounded server-side, ready to
//! // inject into an LLM prompt.
//! let context = client
//!     .get_context("what does the user like?", ContextOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Blocking
//!
//! Every operation also exists on [`blocking::VelixarClient`] with identical
//! validation and error semantics, for callers without an async runtime.

mod adapter;
mod client;
mod config;
mod error;
mod retry;
mod types;

pub mod blocking;

pub use adapter::MemoryStore;
pub use client::VelixarClient;
pub use config::{
    ClientConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT,
};
pub use error::{Result, VelixarError};
pub use retry::RetryPolicy;
pub use types::{
    BatchOutcome, BatchResult, ContextOptions, Memory, MemoryTier, SearchOptions, SearchResult,
    StoreRequest,
};
