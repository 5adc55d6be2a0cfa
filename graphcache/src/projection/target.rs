// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Return clause targets

use once_cell::sync::Lazy;
use regex::Regex;

static AS_ALIAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^(.*\S)\s+as\s+(\S+)$").expect("static regex"));

/// How a return target is projected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    /// `count(n)`, `collect(a.name)`: one scalar for the whole result
    Aggregate,
    /// `entity.property`: one raw scalar per row
    Property,
    /// A whole node or relationship: one `data` object per row
    Entity,
}

/// One comma-separated item of a return clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTarget {
    /// Expression with any alias stripped
    pub expression: String,
    /// Output key: the alias if present, otherwise the expression
    pub key: String,
    pub shape: TargetShape,
}

impl ReturnTarget {
    pub fn parse(target: &str) -> Self {
        let target = target.trim();
        let (expression, key) = match AS_ALIAS.captures(target) {
            Some(caps) => (caps[1].trim().to_string(), caps[2].to_string()),
            None => (target.to_string(), target.to_string()),
        };

        let shape = if expression.contains('(') {
            TargetShape::Aggregate
        } else if expression.contains('.') {
            TargetShape::Property
        } else {
            TargetShape::Entity
        };

        Self {
            expression,
            key,
            shape,
        }
    }

    /// Property path segments for `Property` targets
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.expression.split('.').map(str::trim)
    }
}
