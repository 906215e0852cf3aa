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

//! Velixar SDK Basic Example
//!
//! Demonstrates store, batch store, search and prompt-context retrieval.
//! Requires VELIXAR_API_KEY in the environment.

use velixar::{
    ClientConfig, ContextOptions, MemoryTier, SearchOptions, StoreRequest, VelixarClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = VelixarClient::new(ClientConfig::from_env()?)?;

    println!("Velixar Rust SDK Example\n");

    // 1. Store a single memory
    println!("1. Storing a memory...");
    let id = client
        .store(
            StoreRequest::new("User prefers concise, technical answers")
                .with_tier(MemoryTier::Pinned)
                .with_user_id("user-42")
                .with_tags(["preference", "style"]),
        )
        .await?;
    println!("   Stored: {}\n", id);

    // 2. Store a batch, tolerating per-item failures
    println!("2. Storing a batch...");
    let batch = client
        .store_many(vec![
            StoreRequest::new("Project deadline is March 15").with_tier(MemoryTier::Session),
            StoreRequest::new("Team uses Rust for backend services"),
        ])
        .await?;
    println!("   Stored {} of {} items\n", batch.stored, batch.outcomes.len());

    // 3. Search, most relevant first
    println!("3. Searching...");
    let results = client
        .search(
            "how does the user like answers?",
            SearchOptions {
                limit: 5,
                user_id: Some("user-42".into()),
                ..Default::default()
            },
        )
        .await?;
    for memory in &results.memories {
        println!("   [{:.2}] {}", memory.score.unwrap_or_default(), memory.content);
    }

    // 4. Prompt-ready context, token-bounded server-side
    println!("\n4. Building prompt context...");
    let context = client
        .get_context("user preferences", ContextOptions::default())
        .await?;
    println!("   {} chars of context ready for the prompt", context.len());

    Ok(())
}
