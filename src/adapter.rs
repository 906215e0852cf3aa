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

//! Capability trait for integration adapters.
//!
//! Framework-specific memory wrappers (LangChain-style conversation memory,
//! retriever plugins and the like) live outside this crate; they adapt onto
//! this minimal store/search surface so they never depend on the concrete
//! client type.

use crate::error::Result;
use crate::types::{Memory, MemoryTier, SearchOptions, StoreRequest};
use crate::VelixarClient;
use async_trait::async_trait;

/// Minimal memory capability: store a piece of content, search for relevant
/// memories ordered by descending relevance.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Store `content`, returning the backend-assigned memory ID.
    async fn store(
        &self,
        content: &str,
        tier: MemoryTier,
        user_id: Option<&str>,
        tags: &[String],
    ) -> Result<String>;

    /// Search for memories relevant to `query`, at most `limit` of them.
    async fn search(
        &self,
        query: &str,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<Memory>>;
}

#[async_trait]
impl MemoryStore for VelixarClient {
    async fn store(
        &self,
        content: &str,
        tier: MemoryTier,
        user_id: Option<&str>,
        tags: &[String],
    ) -> Result<String> {
        let mut request = StoreRequest::new(content).with_tier(tier);
        if let Some(user_id) = user_id {
            request = request.with_user_id(user_id);
        }
        if !tags.is_empty() {
            request = request.with_tags(tags.iter().cloned());
        }
        VelixarClient::store(self, request).await
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<Memory>> {
        let opts = SearchOptions {
            limit,
            user_id: user_id.map(str::to_string),
            ..Default::default()
        };
        VelixarClient::search(self, query, opts)
            .await
            .map(|result| result.memories)
    }
}
