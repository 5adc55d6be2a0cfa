// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory cache store

use super::{CacheChange, CacheEntry, CacheStore};
use crate::analysis::Sensitivities;
use crate::error::StoreError;
use crate::query::{QueryKind, Uid};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::{broadcast, watch};

const CHANGE_FEED_CAPACITY: usize = 1024;

#[derive(Default)]
struct Inner {
    /// One watch channel per uid; the channel value is the stored entry
    slots: HashMap<Uid, watch::Sender<Option<CacheEntry>>>,
    /// Reverse index: sensitivity token -> uids whose entry carries it
    by_token: HashMap<String, HashSet<Uid>>,
    /// Slots opened by `subscribe` that have never held an entry
    unfilled: HashSet<Uid>,
    populated: usize,
}

impl Inner {
    /// Drop unfilled slots whose last receiver has gone away
    fn prune_unfilled(&mut self) {
        let slots = &mut self.slots;
        self.unfilled.retain(|uid| {
            let live = slots.get(uid).is_some_and(|slot| slot.receiver_count() > 0);
            if !live {
                slots.remove(uid);
            }
            live
        });
    }

    fn unindex(&mut self, uid: &Uid, tokens: &Sensitivities) {
        for token in tokens {
            if let Some(uids) = self.by_token.get_mut(token) {
                uids.remove(uid);
                if uids.is_empty() {
                    self.by_token.remove(token);
                }
            }
        }
    }

    fn index(&mut self, uid: &Uid, tokens: &Sensitivities) {
        for token in tokens {
            self.by_token
                .entry(token.clone())
                .or_default()
                .insert(uid.clone());
        }
    }
}

/// Process-local [`CacheStore`] with per-uid watch channels and a change feed
pub struct MemoryCacheStore {
    inner: RwLock<Inner>,
    max_entries: Option<usize>,
    changes: broadcast::Sender<CacheChange>,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::with_capacity_limit(None)
    }

    /// Store that rejects new uids once `max_entries` entries exist
    pub fn with_capacity_limit(max_entries: Option<usize>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            inner: RwLock::new(Inner::default()),
            max_entries,
            changes,
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.inner.read().populated
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all stored entries
    pub fn entries(&self) -> Vec<CacheEntry> {
        let inner = self.inner.read();
        let mut entries: Vec<CacheEntry> = inner
            .slots
            .values()
            .filter_map(|slot| slot.borrow().clone())
            .collect();
        entries.sort_by(|a, b| a.uid.cmp(&b.uid));
        entries
    }

    /// Feed of every upsert, for transport layers
    pub fn change_feed(&self) -> broadcast::Receiver<CacheChange> {
        self.changes.subscribe()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn upsert(&self, entry: CacheEntry) -> Result<(), StoreError> {
        let change = CacheChange {
            uid: entry.uid.clone(),
            kind: entry.kind,
            created_at: entry.created_at,
        };

        {
            let mut inner = self.inner.write();
            let previous = inner
                .slots
                .get(&entry.uid)
                .and_then(|slot| slot.borrow().clone());

            match &previous {
                Some(previous) => inner.unindex(&previous.uid, &previous.sensitivities),
                None => {
                    if let Some(max_entries) = self.max_entries {
                        if inner.populated >= max_entries {
                            return Err(StoreError::CapacityExceeded { max_entries });
                        }
                    }
                    inner.populated += 1;
                    inner.unfilled.remove(&entry.uid);
                }
            }

            inner.index(&entry.uid, &entry.sensitivities);
            let uid = entry.uid.clone();
            inner
                .slots
                .entry(uid)
                .or_insert_with(|| watch::channel(None).0)
                .send_replace(Some(entry));
        }

        // No subscribers is not an error
        let _ = self.changes.send(change);
        Ok(())
    }

    async fn find_by_uid(&self, uid: &Uid) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self
            .inner
            .read()
            .slots
            .get(uid)
            .and_then(|slot| slot.borrow().clone()))
    }

    async fn find_by_kind_and_sensitivities(
        &self,
        kind: QueryKind,
        tokens: &Sensitivities,
    ) -> Result<Vec<CacheEntry>, StoreError> {
        let inner = self.inner.read();
        let uids: BTreeSet<&Uid> = tokens
            .iter()
            .filter_map(|token| inner.by_token.get(token))
            .flatten()
            .collect();

        Ok(uids
            .into_iter()
            .filter_map(|uid| inner.slots.get(uid))
            .filter_map(|slot| slot.borrow().clone())
            .filter(|entry| entry.kind == kind)
            .collect())
    }

    fn subscribe(&self, uid: &Uid) -> watch::Receiver<Option<CacheEntry>> {
        if let Some(slot) = self.inner.read().slots.get(uid) {
            return slot.subscribe();
        }
        let mut inner = self.inner.write();
        if !inner.slots.contains_key(uid) {
            inner.prune_unfilled();
            inner.unfilled.insert(uid.clone());
        }
        inner
            .slots
            .entry(uid.clone())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }
}
