// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Read/write classification

use super::QueryTokenizer;
use crate::query::QueryKind;
use crate::rules::RuleSet;
use std::sync::Arc;

/// Labels a query READ or WRITE from the write keyword list.
///
/// A query is a write iff its text contains any write keyword as a
/// case-insensitive substring. There is no word-boundary anchoring, so an
/// identifier such as `dataset` classifies as a write because it contains `SET`.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    write_keywords: Vec<String>,
    tokenizer: Arc<dyn QueryTokenizer>,
}

impl QueryClassifier {
    pub fn new<I, S>(write_keywords: I, tokenizer: Arc<dyn QueryTokenizer>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            write_keywords: write_keywords
                .into_iter()
                .map(|k| k.into().to_ascii_uppercase())
                .collect(),
            tokenizer,
        }
    }

    /// Build from the `write` list of a rule set
    pub fn from_rules(rules: &RuleSet, tokenizer: Arc<dyn QueryTokenizer>) -> Self {
        Self::new(rules.write().iter().cloned(), tokenizer)
    }

    pub fn is_write(&self, text: &str) -> bool {
        self.write_keywords
            .iter()
            .any(|keyword| self.tokenizer.contains_fragment(text, keyword))
    }

    pub fn is_read(&self, text: &str) -> bool {
        !self.is_write(text)
    }

    pub fn classify(&self, text: &str) -> QueryKind {
        if self.is_write(text) {
            QueryKind::Write
        } else {
            QueryKind::Read
        }
    }
}
