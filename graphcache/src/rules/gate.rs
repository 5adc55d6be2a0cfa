// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pre-execution keyword gate

use super::{KeywordSelection, RuleSet};
use crate::analysis::QueryTokenizer;
use crate::error::{CacheError, CacheResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// Validates query text against the deny list before anything is executed.
///
/// A keyword matches when it occurs case-insensitively and is immediately
/// followed by whitespace. No leading word boundary is required.
#[derive(Debug)]
pub struct RuleGate {
    rules: RwLock<RuleSet>,
    tokenizer: Arc<dyn QueryTokenizer>,
}

impl RuleGate {
    pub fn new(rules: RuleSet, tokenizer: Arc<dyn QueryTokenizer>) -> Self {
        Self {
            rules: RwLock::new(rules),
            tokenizer,
        }
    }

    /// Fail with `OperatorDenied` on the first denied keyword found in `text`
    pub fn check(&self, text: &str) -> CacheResult<()> {
        let rules = self.rules.read();
        for keyword in rules.deny() {
            if self.tokenizer.keyword_followed_by_whitespace(text, keyword) {
                log::warn!("Rejected query: \"{}\" is not allowed", keyword);
                return Err(CacheError::OperatorDenied {
                    keyword: keyword.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn set_allow(&self, selection: impl Into<KeywordSelection>) {
        self.rules.write().set_allow(selection);
    }

    pub fn set_deny(&self, selection: impl Into<KeywordSelection>) {
        self.rules.write().set_deny(selection);
    }

    /// Snapshot of the current rules
    pub fn rules(&self) -> RuleSet {
        self.rules.read().clone()
    }
}
