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

//! Velixar SDK types.
//!
//! Core type definitions for the Velixar persistent memory service.

use crate::error::{Result, VelixarError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Memory storage tiers - governs retention and expiry policy, enforced
/// server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MemoryTier {
    /// Critical facts, never expire
    Pinned = 0,
    /// Current session context
    Session = 1,
    /// Long-term semantic memories
    #[default]
    Semantic = 2,
    /// Organization-wide knowledge
    Organization = 3,
}

impl MemoryTier {
    /// Get the string representation of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryTier::Pinned => "Pinned",
            MemoryTier::Session => "Session",
            MemoryTier::Semantic => "Semantic",
            MemoryTier::Organization => "Organization",
        }
    }
}

impl std::fmt::Display for MemoryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<u8> for MemoryTier {
    type Error = VelixarError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(MemoryTier::Pinned),
            1 => Ok(MemoryTier::Session),
            2 => Ok(MemoryTier::Semantic),
            3 => Ok(MemoryTier::Organization),
            other => Err(VelixarError::Validation(format!(
                "invalid memory tier {}: must be 0 (pinned), 1 (session), 2 (semantic) or 3 (organization)",
                other
            ))),
        }
    }
}

// Tiers travel as their integer value on the wire.
impl Serialize for MemoryTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for MemoryTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        MemoryTier::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// A stored memory as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// Backend-assigned identifier.
    pub id: String,
    /// Text payload.
    pub content: String,
    /// Retention tier.
    #[serde(default)]
    pub tier: MemoryTier,
    /// Scoping key; absent means the default/anonymous scope.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    /// Short labels used for filtering.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Relevance in 0.0-1.0, higher is more relevant. Only populated on
    /// search results.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request to store a single memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreRequest {
    pub content: String,
    #[serde(default)]
    pub tier: MemoryTier,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl StoreRequest {
    /// Create a request storing `content` in the default semantic tier.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Set the retention tier.
    pub fn with_tier(mut self, tier: MemoryTier) -> Self {
        self.tier = tier;
        self
    }

    /// Scope the memory to a user.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attach filter tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Attach arbitrary metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(VelixarError::Validation(
                "memory content must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl From<&str> for StoreRequest {
    fn from(content: &str) -> Self {
        StoreRequest::new(content)
    }
}

impl From<String> for StoreRequest {
    fn from(content: String) -> Self {
        StoreRequest::new(content)
    }
}

/// Options for [`search`](crate::VelixarClient::search).
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of results (default: 10).
    pub limit: usize,
    /// Restrict results to a user scope.
    pub user_id: Option<String>,
    /// Restrict results to specific tiers.
    pub tiers: Option<Vec<MemoryTier>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            user_id: None,
            tiers: None,
        }
    }
}

impl SearchOptions {
    pub(crate) fn to_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", query.to_string()), ("limit", self.limit.to_string())];
        if let Some(user_id) = &self.user_id {
            params.push(("user_id", user_id.clone()));
        }
        if let Some(tiers) = &self.tiers {
            let joined = tiers
                .iter()
                .map(|tier| (*tier as u8).to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("tiers", joined));
        }
        params
    }
}

/// Options for [`get_context`](crate::VelixarClient::get_context).
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Token budget for the assembled context, honored server-side
    /// (default: 2000).
    pub max_tokens: u32,
    /// Restrict the underlying search to a user scope.
    pub user_id: Option<String>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            user_id: None,
        }
    }
}

impl ContextOptions {
    pub(crate) fn to_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_string()),
            ("max_tokens", self.max_tokens.to_string()),
        ];
        if let Some(user_id) = &self.user_id {
            params.push(("user_id", user_id.clone()));
        }
        params
    }
}

/// Search results, ordered by non-increasing score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub memories: Vec<Memory>,
    pub count: usize,
    pub query: String,
}

/// Per-item outcome of a batch store, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The item was stored under the given id.
    Stored { id: String },
    /// The item was rejected, client-side or by the backend.
    Failed { error: String },
}

impl BatchOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, BatchOutcome::Stored { .. })
    }
}

/// Result of a [`store_many`](crate::VelixarClient::store_many) call.
///
/// A batch never fails atomically for one bad item: `outcomes` preserves the
/// input order and reports each item independently.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Number of items successfully stored.
    pub stored: usize,
    /// Number of items that failed.
    pub failed: usize,
    /// Per-item outcomes, in input order.
    pub outcomes: Vec<BatchOutcome>,
}

// ========== Wire payloads ==========

#[derive(Debug, Deserialize)]
pub(crate) struct StoreResponse {
    pub id: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub stored: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub memories: Vec<Memory>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchItemResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BatchItemResponse {
    pub(crate) fn into_outcome(self) -> BatchOutcome {
        match (self.id, self.error) {
            (Some(id), None) => BatchOutcome::Stored { id },
            (_, Some(error)) => BatchOutcome::Failed { error },
            (None, None) => BatchOutcome::Failed {
                error: "backend reported no outcome for item".into(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchResponse {
    #[serde(default)]
    pub results: Vec<BatchItemResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContextResponse {
    #[serde(default)]
    pub context: String,
}

// ========== Batch planning ==========

/// Client-side half of a batch store: invalid items are settled locally,
/// valid ones are collected for a single wire request with their original
/// positions remembered.
pub(crate) struct BatchPlan {
    outcomes: Vec<Option<BatchOutcome>>,
    slots: Vec<usize>,
    pub to_send: Vec<StoreRequest>,
}

pub(crate) fn plan_batch(requests: &[StoreRequest]) -> BatchPlan {
    let mut outcomes = vec![None; requests.len()];
    let mut slots = Vec::new();
    let mut to_send = Vec::new();
    for (index, request) in requests.iter().enumerate() {
        match request.validate() {
            Ok(()) => {
                slots.push(index);
                to_send.push(request.clone());
            }
            Err(err) => {
                outcomes[index] = Some(BatchOutcome::Failed {
                    error: err.to_string(),
                });
            }
        }
    }
    BatchPlan {
        outcomes,
        slots,
        to_send,
    }
}

impl BatchPlan {
    /// Merge backend results (in sent order) back into input order.
    pub(crate) fn merge(mut self, results: Vec<BatchItemResponse>) -> BatchResult {
        for (slot, item) in self.slots.iter().zip(results) {
            self.outcomes[*slot] = Some(item.into_outcome());
        }
        let outcomes: Vec<BatchOutcome> = self
            .outcomes
            .into_iter()
            .map(|outcome| {
                outcome.unwrap_or(BatchOutcome::Failed {
                    error: "backend reported no outcome for item".into(),
                })
            })
            .collect();
        let stored = outcomes.iter().filter(|o| o.is_stored()).count();
        BatchResult {
            stored,
            failed: outcomes.len() - stored,
            outcomes,
        }
    }
}

// ========== Shared input validation ==========

pub(crate) fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(VelixarError::Validation(
            "search query must not be empty".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(VelixarError::Validation(
            "search limit must be a positive integer".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_max_tokens(max_tokens: u32) -> Result<()> {
    if max_tokens == 0 {
        return Err(VelixarError::Validation(
            "max_tokens must be a positive integer".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_round_trips_valid_values() {
        for raw in 0..=3u8 {
            let tier = MemoryTier::try_from(raw).unwrap();
            assert_eq!(tier as u8, raw);
        }
    }

    #[test]
    fn tier_rejects_out_of_range() {
        for raw in [4u8, 7, 255] {
            assert!(matches!(
                MemoryTier::try_from(raw),
                Err(VelixarError::Validation(_))
            ));
        }
    }

    #[test]
    fn tier_default_is_semantic() {
        assert_eq!(MemoryTier::default(), MemoryTier::Semantic);
    }

    #[test]
    fn tier_serializes_as_integer() {
        let json = serde_json::to_string(&MemoryTier::Organization).unwrap();
        assert_eq!(json, "3");
        let tier: MemoryTier = serde_json::from_str("1").unwrap();
        assert_eq!(tier, MemoryTier::Session);
        assert!(serde_json::from_str::<MemoryTier>("9").is_err());
    }

    #[test]
    fn store_request_rejects_empty_content() {
        assert!(StoreRequest::new("").validate().is_err());
        assert!(StoreRequest::new("   ").validate().is_err());
        assert!(StoreRequest::new("remember this").validate().is_ok());
    }

    #[test]
    fn store_request_builder() {
        let request = StoreRequest::new("user prefers dark mode")
            .with_tier(MemoryTier::Pinned)
            .with_user_id("user-42")
            .with_tags(["preference", "ui"]);

        assert_eq!(request.tier, MemoryTier::Pinned);
        assert_eq!(request.user_id.as_deref(), Some("user-42"));
        assert_eq!(request.tags, vec!["preference", "ui"]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tier"], 0);
        assert_eq!(json["content"], "user prefers dark mode");
        // Unset metadata stays off the wire.
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn memory_deserializes_with_defaults() {
        let memory: Memory = serde_json::from_str(
            r#"{"id": "mem_1", "content": "hello", "tier": 2, "score": 0.91}"#,
        )
        .unwrap();
        assert_eq!(memory.tier, MemoryTier::Semantic);
        assert!(memory.tags.is_empty());
        assert!(memory.user_id.is_none());
        assert_eq!(memory.score, Some(0.91));
    }

    #[test]
    fn batch_item_outcome_mapping() {
        let stored = BatchItemResponse {
            id: Some("mem_1".into()),
            error: None,
        };
        assert_eq!(
            stored.into_outcome(),
            BatchOutcome::Stored { id: "mem_1".into() }
        );

        let failed = BatchItemResponse {
            id: None,
            error: Some("quota exceeded".into()),
        };
        assert!(!failed.into_outcome().is_stored());
    }

    #[test]
    fn batch_plan_preserves_input_order() {
        let requests = vec![
            StoreRequest::new("first"),
            StoreRequest::new(""),
            StoreRequest::new("third"),
        ];
        let plan = plan_batch(&requests);
        assert_eq!(plan.to_send.len(), 2);

        let result = plan.merge(vec![
            BatchItemResponse {
                id: Some("mem_a".into()),
                error: None,
            },
            BatchItemResponse {
                id: Some("mem_b".into()),
                error: None,
            },
        ]);

        assert_eq!(result.stored, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.outcomes.len(), 3);
        assert!(result.outcomes[0].is_stored());
        assert!(!result.outcomes[1].is_stored());
        assert!(result.outcomes[2].is_stored());
    }

    #[test]
    fn batch_plan_flags_missing_backend_results() {
        let requests = vec![StoreRequest::new("only")];
        let result = plan_batch(&requests).merge(Vec::new());
        assert_eq!(result.stored, 0);
        assert_eq!(result.failed, 1);
    }

    #[test]
    fn query_validation() {
        assert!(validate_query("what does the user like?").is_ok());
        assert!(validate_query("").is_err());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(10).is_ok());
        assert!(validate_max_tokens(0).is_err());
        assert!(validate_max_tokens(2000).is_ok());
    }
}
