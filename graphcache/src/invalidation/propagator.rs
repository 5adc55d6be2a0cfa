// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Invalidation propagation

use crate::analysis::{overlaps, Sensitivities};
use crate::coordinator::CacheStats;
use crate::error::CacheError;
use crate::exec::ExecutionPipeline;
use crate::query::{QueryKind, Uid};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinSet;

/// A refresh that failed during propagation
#[derive(Debug, Clone)]
pub struct InvalidationFailure {
    /// Entry whose refresh failed, or the write itself when the lookup failed
    pub uid: Uid,
    pub error: Arc<CacheError>,
    pub occurred_at: DateTime<Utc>,
}

/// Outcome of one propagation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationReport {
    pub write_uid: Uid,
    /// READ entries whose footprint intersected the write's
    pub matched: usize,
    pub refreshed: Vec<Uid>,
    pub failed: Vec<Uid>,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

impl PropagationReport {
    fn new(write_uid: Uid) -> Self {
        Self {
            write_uid,
            matched: 0,
            refreshed: Vec::new(),
            failed: Vec::new(),
            duration: Duration::ZERO,
            completed_at: Utc::now(),
        }
    }
}

/// Re-executes cached reads affected by a committed write
pub struct InvalidationPropagator {
    pipeline: Arc<ExecutionPipeline>,
    failures: broadcast::Sender<InvalidationFailure>,

    history: RwLock<VecDeque<PropagationReport>>,
    max_history_size: usize,

    stats: Arc<RwLock<CacheStats>>,
}

impl InvalidationPropagator {
    pub fn new(
        pipeline: Arc<ExecutionPipeline>,
        stats: Arc<RwLock<CacheStats>>,
        max_history_size: usize,
        failure_channel_capacity: usize,
    ) -> Self {
        let (failures, _) = broadcast::channel(failure_channel_capacity.max(1));
        Self {
            pipeline,
            failures,
            history: RwLock::new(VecDeque::new()),
            max_history_size,
            stats,
        }
    }

    /// Error channel for refresh failures; there is no caller waiting on them
    pub fn subscribe_failures(&self) -> broadcast::Receiver<InvalidationFailure> {
        self.failures.subscribe()
    }

    /// Most recent reports first
    pub fn recent_reports(&self, limit: usize) -> Vec<PropagationReport> {
        self.history.read().iter().rev().take(limit).cloned().collect()
    }

    /// Refresh every cached READ entry sharing a token with `write_sensitivities`.
    ///
    /// Refreshes run concurrently, one task per entry. A failed refresh leaves
    /// that entry's previous data in place, is published on the failure
    /// channel and does not stop the others.
    pub async fn propagate(&self, write_uid: &Uid, write_sensitivities: &Sensitivities) -> PropagationReport {
        let started = Instant::now();
        let mut report = PropagationReport::new(write_uid.clone());

        if write_sensitivities.is_empty() {
            log::debug!("Write {} has no sensitivities, nothing to invalidate", write_uid);
            return self.finish(report, started);
        }

        let candidates = match self
            .pipeline
            .store()
            .find_by_kind_and_sensitivities(QueryKind::Read, write_sensitivities)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                self.publish_failure(write_uid.clone(), CacheError::CacheRead(e));
                return self.finish(report, started);
            }
        };

        let affected: Vec<_> = candidates
            .into_iter()
            .filter(|entry| entry.is_read() && overlaps(&entry.sensitivities, write_sensitivities))
            .collect();
        report.matched = affected.len();

        let mut tasks = JoinSet::new();
        for entry in affected {
            let pipeline = Arc::clone(&self.pipeline);
            tasks.spawn(async move {
                let result = pipeline.refresh(&entry.uid, &entry.to_query()).await;
                (entry.uid, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((uid, Ok(_))) => report.refreshed.push(uid),
                Ok((uid, Err(error))) => {
                    self.publish_failure(
                        uid.clone(),
                        CacheError::InvalidationExecution {
                            uid: uid.clone(),
                            source: Box::new(error),
                        },
                    );
                    report.failed.push(uid);
                }
                Err(join_error) => {
                    log::error!("Invalidation refresh task aborted: {}", join_error);
                }
            }
        }

        report.refreshed.sort();
        report.failed.sort();
        self.finish(report, started)
    }

    fn publish_failure(&self, uid: Uid, error: CacheError) {
        log::error!("{}", error);
        self.stats.write().refresh_failures += 1;
        // Sending only fails when nobody subscribes
        let _ = self.failures.send(InvalidationFailure {
            uid,
            error: Arc::new(error),
            occurred_at: Utc::now(),
        });
    }

    fn finish(&self, mut report: PropagationReport, started: Instant) -> PropagationReport {
        report.duration = started.elapsed();
        report.completed_at = Utc::now();

        log::info!(
            "Invalidation for write {}: {} matched, {} refreshed, {} failed in {:?}",
            report.write_uid,
            report.matched,
            report.refreshed.len(),
            report.failed.len(),
            report.duration
        );

        {
            let mut stats = self.stats.write();
            stats.propagations += 1;
            stats.refreshes += report.refreshed.len() as u64;
        }

        if self.max_history_size > 0 {
            let mut history = self.history.write();
            if history.len() >= self.max_history_size {
                history.pop_front();
            }
            history.push_back(report.clone());
        }

        report
    }
}
