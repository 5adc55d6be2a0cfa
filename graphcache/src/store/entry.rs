// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The unit of caching and invalidation

use crate::analysis::Sensitivities;
use crate::query::{Parameters, Query, QueryKind, Uid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cached result of one (query text, parameters) pair.
///
/// The query text and parameters are retained so the entry can be re-executed
/// without its original caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub uid: Uid,
    pub query: String,
    #[serde(default)]
    pub parameters: Parameters,
    /// Projected result, `None` when the query produced nothing
    pub data: Option<Value>,
    #[serde(default)]
    pub sensitivities: Sensitivities,
    #[serde(rename = "type")]
    pub kind: QueryKind,
    /// Time of the last (re)execution
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn to_query(&self) -> Query {
        Query::with_parameters(self.query.clone(), self.parameters.clone())
    }

    pub fn is_read(&self) -> bool {
        self.kind == QueryKind::Read
    }
}
