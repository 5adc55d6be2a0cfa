// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lexical query inspection
//!
//! Classification and sensitivity extraction work on the raw query text through
//! the [`QueryTokenizer`] seam. The default tokenizer is deliberately loose
//! (substring and regex based); a parser-backed implementation can replace it
//! without touching the cache or invalidation logic.

pub mod classifier;
pub mod sensitivity;
pub mod tokenizer;

pub use classifier::QueryClassifier;
pub use sensitivity::{overlaps, SensitivityExtractor, Sensitivities};
pub use tokenizer::{QueryTokenizer, RegexTokenizer};
