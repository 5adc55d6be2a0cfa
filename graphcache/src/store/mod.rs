// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache entry storage
//!
//! The core consumes storage through [`CacheStore`]. Persistence and TTL
//! pruning belong to the store implementation, never to the core, which only
//! ever upserts.

pub mod entry;
pub mod memory;

pub use entry::CacheEntry;
pub use memory::MemoryCacheStore;

use crate::analysis::Sensitivities;
use crate::error::StoreError;
use crate::query::{QueryKind, Uid};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// Keyed store of cache entries
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Insert or replace the entry keyed by `entry.uid`. Every successful upsert
    /// must be visible to subscribers of that uid.
    async fn upsert(&self, entry: CacheEntry) -> Result<(), StoreError>;

    async fn find_by_uid(&self, uid: &Uid) -> Result<Option<CacheEntry>, StoreError>;

    /// Entries of `kind` whose sensitivities contain any of `tokens`
    async fn find_by_kind_and_sensitivities(
        &self,
        kind: QueryKind,
        tokens: &Sensitivities,
    ) -> Result<Vec<CacheEntry>, StoreError>;

    /// Observe the entry stored under `uid`; `None` until the first upsert
    fn subscribe(&self, uid: &Uid) -> watch::Receiver<Option<CacheEntry>>;
}

/// Notification emitted for every upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheChange {
    pub uid: Uid,
    pub kind: QueryKind,
    pub created_at: DateTime<Utc>,
}
