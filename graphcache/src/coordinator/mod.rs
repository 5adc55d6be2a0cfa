// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache Coordinator - the public entry point
//!
//! Orchestrates the rule gate, classifier, executor, projector, extractor,
//! store and invalidation propagator behind `execute_query`.

pub mod cache_coordinator;
pub mod handle;
pub mod remote;
pub mod stats;

pub use cache_coordinator::CacheCoordinator;
pub use handle::CacheHandle;
pub use remote::RemoteQueryEndpoint;
pub use stats::CacheStats;
