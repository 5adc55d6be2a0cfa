// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache coordinator

use super::{CacheHandle, CacheStats, RemoteQueryEndpoint};
use crate::analysis::{QueryClassifier, QueryTokenizer, RegexTokenizer, SensitivityExtractor};
use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::exec::{ExecutionPipeline, QueryExecutor};
use crate::invalidation::{InvalidationFailure, InvalidationPropagator, PropagationReport};
use crate::projection::ResultProjector;
use crate::query::{Parameters, Query, QueryKind, Uid};
use crate::rules::RuleGate;
use crate::store::{CacheEntry, CacheStore, MemoryCacheStore};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Cached, write-invalidated query execution.
///
/// There is no per-uid lock: concurrent misses on the same query both execute
/// and the last upsert to complete wins.
pub struct CacheCoordinator {
    config: CacheConfig,
    gate: Arc<RuleGate>,
    pipeline: Arc<ExecutionPipeline>,
    propagator: Arc<InvalidationPropagator>,
    stats: Arc<RwLock<CacheStats>>,
}

impl CacheCoordinator {
    /// Create a coordinator with the default regex tokenizer
    pub fn new(
        config: CacheConfig,
        executor: Arc<dyn QueryExecutor>,
        store: Arc<dyn CacheStore>,
    ) -> CacheResult<Self> {
        Self::with_tokenizer(config, executor, store, Arc::new(RegexTokenizer::new()))
    }

    /// Create a coordinator backed by a fresh [`MemoryCacheStore`] sized from `config`
    pub fn with_memory_store(
        config: CacheConfig,
        executor: Arc<dyn QueryExecutor>,
    ) -> CacheResult<(Self, Arc<MemoryCacheStore>)> {
        let store = Arc::new(MemoryCacheStore::with_capacity_limit(config.max_entries));
        let coordinator = Self::new(config, executor, store.clone())?;
        Ok((coordinator, store))
    }

    /// Create a coordinator with a custom tokenizer
    pub fn with_tokenizer(
        config: CacheConfig,
        executor: Arc<dyn QueryExecutor>,
        store: Arc<dyn CacheStore>,
        tokenizer: Arc<dyn QueryTokenizer>,
    ) -> CacheResult<Self> {
        config.validate()?;

        let rules = config.rule_set();
        let classifier = QueryClassifier::from_rules(&rules, tokenizer.clone());
        let gate = Arc::new(RuleGate::new(rules, tokenizer.clone()));

        let pipeline = Arc::new(ExecutionPipeline::new(
            gate.clone(),
            classifier,
            SensitivityExtractor::new(tokenizer.clone()),
            ResultProjector::new(tokenizer),
            executor,
            store,
        ));

        let stats = Arc::new(RwLock::new(CacheStats::default()));
        let propagator = Arc::new(InvalidationPropagator::new(
            pipeline.clone(),
            stats.clone(),
            config.history_size,
            config.failure_channel_capacity,
        ));

        Ok(Self {
            config,
            gate,
            pipeline,
            propagator,
            stats,
        })
    }

    /// Execute a query through the cache.
    ///
    /// Reads are served from the cache when an entry exists. Writes always
    /// execute and then trigger invalidation of overlapping cached reads.
    pub async fn execute_query(
        &self,
        text: &str,
        parameters: Parameters,
    ) -> CacheResult<CacheHandle> {
        self.execute(Query::with_parameters(text, parameters)).await
    }

    pub async fn execute(&self, query: Query) -> CacheResult<CacheHandle> {
        let uid = query.uid();
        self.submit(&uid, &query).await?;
        Ok(self.handle(&uid))
    }

    /// Gate, classify, then serve or execute `query` under `uid`
    pub(crate) async fn submit(&self, uid: &Uid, query: &Query) -> CacheResult<()> {
        self.stats.write().total_requests += 1;

        if let Err(e) = self.gate.check(&query.text) {
            self.stats.write().denied += 1;
            return Err(e);
        }

        let kind = self.pipeline.classifier().classify(&query.text);
        log::debug!("Query {} classified as {}", uid, kind);

        if kind == QueryKind::Read {
            let cached = self
                .pipeline
                .store()
                .find_by_uid(uid)
                .await
                .map_err(CacheError::CacheRead)?;
            if cached.is_some() {
                self.stats.write().hits += 1;
                log::debug!("Cache hit for {}", uid);
                return Ok(());
            }
            self.stats.write().misses += 1;
            log::debug!("Cache miss for {}", uid);
        }

        let entry = match self.pipeline.execute(uid, query).await {
            Ok(entry) => entry,
            Err(e) => {
                self.stats.write().execution_failures += 1;
                log::debug!("Query {} failed: {}", uid, e);
                return Err(e);
            }
        };

        {
            let mut stats = self.stats.write();
            stats.executions += 1;
            if kind.is_write() {
                stats.write_executions += 1;
            }
        }

        if kind.is_write() {
            self.propagate(entry).await;
        }
        Ok(())
    }

    async fn propagate(&self, write: CacheEntry) {
        log::info!(
            "Write {} committed, propagating {} sensitivities",
            write.uid,
            write.sensitivities.len()
        );

        if self.config.await_invalidation {
            self.propagator
                .propagate(&write.uid, &write.sensitivities)
                .await;
        } else {
            let propagator = Arc::clone(&self.propagator);
            tokio::spawn(async move {
                propagator
                    .propagate(&write.uid, &write.sensitivities)
                    .await;
            });
        }
    }

    /// Handle for `uid`, whether or not an entry exists yet
    pub fn handle(&self, uid: &Uid) -> CacheHandle {
        CacheHandle::new(uid.clone(), self.pipeline.store().subscribe(uid))
    }

    /// Current entry for `uid`
    pub async fn lookup(&self, uid: &Uid) -> CacheResult<Option<CacheEntry>> {
        self.pipeline
            .store()
            .find_by_uid(uid)
            .await
            .map_err(CacheError::CacheRead)
    }

    /// Classify query text without executing it
    pub fn classify(&self, text: &str) -> QueryKind {
        self.pipeline.classifier().classify(text)
    }

    /// Keyword rules; allow/deny changes apply to all later executions, refreshes included
    pub fn rules(&self) -> &RuleGate {
        &self.gate
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    /// Error channel for invalidation-triggered refresh failures
    pub fn subscribe_failures(&self) -> broadcast::Receiver<InvalidationFailure> {
        self.propagator.subscribe_failures()
    }

    /// Most recent propagation reports first
    pub fn recent_propagations(&self, limit: usize) -> Vec<PropagationReport> {
        self.propagator.recent_reports(limit)
    }

    /// RPC entrypoint for remote callers
    pub fn remote_endpoint(self: &Arc<Self>) -> RemoteQueryEndpoint {
        RemoteQueryEndpoint::new(Arc::clone(self))
    }
}
