// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query execution against the graph engine

pub mod error;
pub mod executor;
pub mod pipeline;

pub use error::ExecutorError;
pub use executor::{QueryExecutor, RawRow};
pub use pipeline::ExecutionPipeline;
