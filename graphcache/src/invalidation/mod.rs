// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Write-triggered invalidation
//!
//! There is no dependency graph between queries. After a write commits, every
//! cached READ whose sensitivity set intersects the write's is re-executed.
//! Reads with disjoint footprints are never touched; reads related to the write
//! only through values that are neither quoted literals nor parameters are
//! missed, and coincidental token collisions cause extra refreshes.

pub mod propagator;

pub use propagator::{InvalidationFailure, InvalidationPropagator, PropagationReport};
