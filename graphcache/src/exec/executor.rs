// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph engine driver seam

use super::ExecutorError;
use crate::query::Parameters;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One result row keyed by return-target name as emitted by the engine
pub type RawRow = Map<String, Value>;

/// Runs query text with parameters against the graph engine.
///
/// Implementations must not block the calling task while waiting on the
/// engine, and report timeouts as [`ExecutorError::Timeout`].
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn run(&self, text: &str, parameters: &Parameters) -> Result<Vec<RawRow>, ExecutorError>;
}
