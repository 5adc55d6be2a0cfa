// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Reshaping of raw engine rows into per-return-target results

pub mod projector;
pub mod target;

pub use projector::ResultProjector;
pub use target::{ReturnTarget, TargetShape};
