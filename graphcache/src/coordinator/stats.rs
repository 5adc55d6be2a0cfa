// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Coordinator statistics

/// Counters for cache traffic, executions and invalidation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub denied: u64,
    pub executions: u64,
    pub write_executions: u64,
    pub execution_failures: u64,
    pub propagations: u64,
    pub refreshes: u64,
    pub refresh_failures: u64,
}

impl CacheStats {
    /// Fraction of read lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
