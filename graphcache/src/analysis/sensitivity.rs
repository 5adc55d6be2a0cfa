// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sensitivity extraction
//!
//! A query's sensitivities are the concrete values it is considered to touch:
//! the contents of its quoted literals plus every parameter key and value. Two
//! queries are possibly related iff their sensitivity sets intersect.

use super::QueryTokenizer;
use crate::query::Parameters;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Set of opaque sensitivity tokens
pub type Sensitivities = BTreeSet<String>;

#[derive(Debug, Clone)]
pub struct SensitivityExtractor {
    tokenizer: Arc<dyn QueryTokenizer>,
}

impl SensitivityExtractor {
    pub fn new(tokenizer: Arc<dyn QueryTokenizer>) -> Self {
        Self { tokenizer }
    }

    pub fn extract(&self, text: &str, parameters: &Parameters) -> Sensitivities {
        let mut tokens: Sensitivities = self.tokenizer.quoted_literals(text).into_iter().collect();

        for (key, value) in parameters.iter() {
            tokens.insert(key.clone());
            tokens.insert(Parameters::stringify(value));
        }

        tokens
    }
}

/// True when the two footprints share at least one token
pub fn overlaps(a: &Sensitivities, b: &Sensitivities) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().any(|token| large.contains(token))
}
