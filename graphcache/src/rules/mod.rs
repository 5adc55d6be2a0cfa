// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Keyword allow/deny rules and the gate that enforces them

pub mod gate;
pub mod rule_set;

pub use gate::RuleGate;
pub use rule_set::{KeywordSelection, RuleSet, DEFAULT_ALLOW, DEFAULT_WRITE};
