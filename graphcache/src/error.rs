// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for cache coordination, storage and configuration

use crate::exec::ExecutorError;
use crate::query::Uid;
use thiserror::Error;

/// Errors surfaced by the cache coordinator and its collaborators
#[derive(Error, Debug)]
pub enum CacheError {
    /// The rule gate found a denied keyword; nothing was executed
    #[error("Operator denied: \"{keyword}\" is not allowed")]
    OperatorDenied { keyword: String },

    /// The graph engine rejected or failed the query
    #[error("Execution of query {uid} failed: {source}")]
    Execution {
        uid: Uid,
        #[source]
        source: ExecutorError,
    },

    /// A refresh triggered by write invalidation failed
    #[error("Invalidation refresh of query {uid} failed: {source}")]
    InvalidationExecution {
        uid: Uid,
        #[source]
        source: Box<CacheError>,
    },

    /// The cache store rejected an upsert
    #[error("Cache write failed: {0}")]
    CacheWrite(StoreError),

    /// The cache store failed a lookup
    #[error("Cache read failed: {0}")]
    CacheRead(StoreError),

    /// Remote execution is disabled
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CacheError {
    /// Denied keyword, if this is an `OperatorDenied` error
    pub fn denied_keyword(&self) -> Option<&str> {
        match self {
            CacheError::OperatorDenied { keyword } => Some(keyword),
            _ => None,
        }
    }
}

/// Cache store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Cache capacity of {max_entries} entries exceeded")]
    CapacityExceeded { max_entries: usize },

    #[error("Upsert rejected: {0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
