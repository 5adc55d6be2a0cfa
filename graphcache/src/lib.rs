// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphCache - a reactive query result cache for graph databases
//!
//! GraphCache sits in front of a graph query engine and gives callers a cached,
//! reactively refreshed view of query results.
//!
//! # Features
//!
//! - **Rule Gate**: keyword allow/deny lists checked before any execution
//! - **Read/Write Classification**: coarse keyword-based labelling of queries
//! - **Result Projection**: raw engine rows reshaped per return target
//! - **Write Invalidation**: cached reads sharing literal or parameter tokens
//!   with a committed write are re-executed
//! - **Live Handles**: every query returns a handle that follows its cache entry
//!
//! # Usage
//!
//! ```ignore
//! use graphcache::{CacheConfig, CacheCoordinator, Parameters};
//!
//! let (coordinator, _store) = CacheCoordinator::with_memory_store(CacheConfig::default(), executor)?;
//! coordinator.rules().set_deny(["DROP"]);
//!
//! let users = coordinator
//!     .execute_query("MATCH (a:User {name: 'Joe'}) RETURN a", Parameters::new())
//!     .await?;
//! coordinator
//!     .execute_query("MATCH (a:User {name: {name}}) SET a.age = 42", Parameters::new().with("name", "Joe"))
//!     .await?;
//! // `users` now reflects the refreshed result
//! println!("{:?}", users.data());
//! ```

pub mod analysis;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod exec;
pub mod invalidation;
pub mod projection;
pub mod query;
pub mod rules;
pub mod store;

pub use analysis::{QueryClassifier, QueryTokenizer, RegexTokenizer, SensitivityExtractor, Sensitivities};
pub use config::{CacheConfig, RuleConfig};
pub use coordinator::{CacheCoordinator, CacheHandle, CacheStats, RemoteQueryEndpoint};
pub use error::{CacheError, CacheResult, ConfigError, StoreError};
pub use exec::{ExecutorError, QueryExecutor, RawRow};
pub use invalidation::{InvalidationFailure, InvalidationPropagator, PropagationReport};
pub use projection::ResultProjector;
pub use query::{Parameters, Query, QueryKind, Uid};
pub use rules::{KeywordSelection, RuleGate, RuleSet};
pub use store::{CacheChange, CacheEntry, CacheStore, MemoryCacheStore};

/// GraphCache version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GraphCache crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
