// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execute, project, extract and upsert
//!
//! Shared by direct queries and invalidation refreshes so both paths produce
//! identical cache entries.

use super::QueryExecutor;
use crate::analysis::{QueryClassifier, SensitivityExtractor};
use crate::error::{CacheError, CacheResult};
use crate::projection::ResultProjector;
use crate::query::{Query, Uid};
use crate::rules::RuleGate;
use crate::store::{CacheEntry, CacheStore};
use chrono::Utc;
use std::sync::Arc;

pub struct ExecutionPipeline {
    gate: Arc<RuleGate>,
    classifier: QueryClassifier,
    extractor: SensitivityExtractor,
    projector: ResultProjector,
    executor: Arc<dyn QueryExecutor>,
    store: Arc<dyn CacheStore>,
}

impl ExecutionPipeline {
    pub fn new(
        gate: Arc<RuleGate>,
        classifier: QueryClassifier,
        extractor: SensitivityExtractor,
        projector: ResultProjector,
        executor: Arc<dyn QueryExecutor>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            gate,
            classifier,
            extractor,
            projector,
            executor,
            store,
        }
    }

    pub fn gate(&self) -> &Arc<RuleGate> {
        &self.gate
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Run `query` and upsert the resulting entry under `uid`.
    ///
    /// The rule gate is not consulted here. An execution failure leaves the
    /// stored entry untouched.
    pub async fn execute(&self, uid: &Uid, query: &Query) -> CacheResult<CacheEntry> {
        let kind = self.classifier.classify(&query.text);

        let rows = self
            .executor
            .run(&query.text, &query.parameters)
            .await
            .map_err(|source| CacheError::Execution {
                uid: uid.clone(),
                source,
            })?;

        let entry = CacheEntry {
            uid: uid.clone(),
            query: query.text.clone(),
            parameters: query.parameters.clone(),
            data: self.projector.project(&rows, &query.text),
            sensitivities: self.extractor.extract(&query.text, &query.parameters),
            kind,
            created_at: Utc::now(),
        };

        self.store
            .upsert(entry.clone())
            .await
            .map_err(CacheError::CacheWrite)?;

        log::debug!(
            "Cached {} query {} ({} rows, {} sensitivities)",
            entry.kind,
            uid,
            rows.len(),
            entry.sensitivities.len()
        );
        Ok(entry)
    }

    /// Gate check followed by [`execute`](Self::execute); used for refreshes
    pub async fn refresh(&self, uid: &Uid, query: &Query) -> CacheResult<CacheEntry> {
        self.gate.check(&query.text)?;
        self.execute(uid, query).await
    }
}
