// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache configuration

use crate::error::ConfigError;
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Keyword rule overrides applied on top of the default rule set.
///
/// A `"*"` element selects every keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub rules: RuleConfig,

    /// Accept queries from remote callers through the RPC entrypoint
    pub allow_remote_execution: bool,

    /// Graph engine address, consumed by the connection bootstrap only
    pub graph_engine_address: Option<String>,

    /// Resolve write queries only after invalidation refreshes complete
    pub await_invalidation: bool,

    /// Entry limit for the in-memory store (`None` = unbounded)
    pub max_entries: Option<usize>,

    /// Number of propagation reports kept for inspection
    pub history_size: usize,

    /// Buffered invalidation failures per slow subscriber
    pub failure_channel_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            rules: RuleConfig::default(),
            allow_remote_execution: false,
            graph_engine_address: None,
            await_invalidation: false,
            max_entries: None,
            history_size: 100,
            failure_channel_capacity: 256,
        }
    }
}

impl CacheConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CacheConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == Some(0) {
            return Err(ConfigError::Invalid(
                "max_entries must be > 0 when set".to_string(),
            ));
        }

        if self.failure_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "failure_channel_capacity must be > 0".to_string(),
            ));
        }

        if let Some(keyword) = self
            .rules
            .allow
            .iter()
            .chain(self.rules.deny.iter())
            .find(|k| k.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "empty rule keyword: {:?}",
                keyword
            )));
        }

        Ok(())
    }

    /// Default rules with the configured allow list applied, then the deny list
    pub fn rule_set(&self) -> RuleSet {
        let mut rules = RuleSet::default();
        if !self.rules.allow.is_empty() {
            rules.set_allow(self.rules.allow.clone());
        }
        if !self.rules.deny.is_empty() {
            rules.set_deny(self.rules.deny.clone());
        }
        rules
    }
}
