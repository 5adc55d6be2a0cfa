// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Read handles bound to a cache uid

use crate::query::Uid;
use crate::store::CacheEntry;
use serde_json::Value;
use tokio::sync::watch;

/// Live view of one cache entry.
///
/// Always resolves to the entry's current state; refreshes triggered by
/// invalidation are visible without re-issuing the query.
#[derive(Debug, Clone)]
pub struct CacheHandle {
    uid: Uid,
    receiver: watch::Receiver<Option<CacheEntry>>,
}

impl CacheHandle {
    pub fn new(uid: Uid, receiver: watch::Receiver<Option<CacheEntry>>) -> Self {
        Self { uid, receiver }
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// Current projected data, `None` if absent or empty
    pub fn data(&self) -> Option<Value> {
        self.receiver
            .borrow()
            .as_ref()
            .and_then(|entry| entry.data.clone())
    }

    /// Current full entry
    pub fn entry(&self) -> Option<CacheEntry> {
        self.receiver.borrow().clone()
    }

    /// Whether an update arrived since the last `changed()` or read via `mark_seen()`
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    pub fn mark_seen(&mut self) {
        self.receiver.borrow_and_update();
    }

    /// Wait for the next update. Returns `false` once the store drops the entry's channel.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}
