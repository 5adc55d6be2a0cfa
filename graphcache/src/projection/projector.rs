// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result projector
//!
//! Maps each return target to either a single scalar (aggregate targets) or an
//! ordered sequence with one element per input row. A target with nothing to
//! show for a row is skipped for that row.

use super::{ReturnTarget, TargetShape};
use crate::analysis::QueryTokenizer;
use crate::exec::RawRow;
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ResultProjector {
    tokenizer: Arc<dyn QueryTokenizer>,
}

impl ResultProjector {
    pub fn new(tokenizer: Arc<dyn QueryTokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Shape `rows` after the return clause of `text`.
    ///
    /// Without a return clause the rows are passed through as an array, or
    /// `None` when there are none.
    pub fn project(&self, rows: &[RawRow], text: &str) -> Option<Value> {
        let Some(targets) = self.tokenizer.return_targets(text) else {
            if rows.is_empty() {
                return None;
            }
            return Some(Value::Array(
                rows.iter().cloned().map(Value::Object).collect(),
            ));
        };

        let targets: Vec<ReturnTarget> = targets.iter().map(|t| ReturnTarget::parse(t)).collect();
        let mut result = Map::new();

        for target in &targets {
            let projected = match target.shape {
                TargetShape::Aggregate => rows
                    .iter()
                    .find_map(|row| lookup(row, target))
                    .cloned()
                    .unwrap_or(Value::Null),
                TargetShape::Property => Value::Array(
                    rows.iter()
                        .filter_map(|row| lookup(row, target))
                        .cloned()
                        .collect(),
                ),
                TargetShape::Entity => Value::Array(
                    rows.iter()
                        .filter_map(|row| lookup(row, target))
                        .map(shape_entity)
                        .collect(),
                ),
            };
            result.insert(target.key.clone(), projected);
        }

        Some(Value::Object(result))
    }
}

/// Value for `target` in `row`: by output key, then by expression, then by property path
fn lookup<'r>(row: &'r RawRow, target: &ReturnTarget) -> Option<&'r Value> {
    row.get(&target.key)
        .or_else(|| row.get(&target.expression))
        .or_else(|| match target.shape {
            TargetShape::Property => walk_path(row, target),
            _ => None,
        })
        .filter(|value| !value.is_null())
}

fn walk_path<'r>(row: &'r RawRow, target: &ReturnTarget) -> Option<&'r Value> {
    let mut segments = target.path();
    let mut current = row.get(segments.next()?)?;
    for segment in segments {
        current = current
            .get(segment)
            .or_else(|| current.get("data").and_then(|data| data.get(segment)))?;
    }
    Some(current)
}

/// Unwrap a raw node/relationship into its `data` object, attaching metadata
/// and a relation descriptor when present
fn shape_entity(raw: &Value) -> Value {
    let Some(wrapper) = raw.as_object() else {
        return raw.clone();
    };
    let Some(Value::Object(data)) = wrapper.get("data") else {
        return raw.clone();
    };

    let markers = wrapper
        .get("_data")
        .and_then(Value::as_object)
        .unwrap_or(wrapper);
    let mut data = data.clone();

    if let Some(metadata) = markers.get("metadata").or_else(|| wrapper.get("metadata")) {
        data.insert("metadata".to_string(), metadata.clone());
    }

    let endpoints = (
        markers.get("start").and_then(Value::as_str),
        markers.get("end").and_then(Value::as_str),
        markers.get("type").and_then(Value::as_str),
    );
    if let (Some(start), Some(end), Some(kind)) = endpoints {
        let self_id = markers
            .get("self")
            .and_then(Value::as_str)
            .map(last_segment);
        data.insert(
            "relation".to_string(),
            json!({
                "extensions": markers.get("extensions").cloned().unwrap_or(Value::Null),
                "start": last_segment(start),
                "end": last_segment(end),
                "self": self_id,
                "type": kind,
            }),
        );
    }

    Value::Object(data)
}

fn last_segment(identifier: &str) -> &str {
    identifier.rsplit('/').next().unwrap_or(identifier)
}
