//! Scripted query executor
//!
//! Responses are keyed by exact query text. Unknown queries succeed with no rows.

use async_trait::async_trait;
use graphcache::{ExecutorError, Parameters, QueryExecutor, RawRow};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Response {
    Rows(Vec<RawRow>),
    Fail(ExecutorError),
}

#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<HashMap<String, Response>>,
    calls: Mutex<Vec<(String, Parameters)>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `text` with `rows` (a JSON array of row objects)
    pub fn respond(&self, text: &str, rows: Value) {
        self.responses
            .lock()
            .insert(text.to_string(), Response::Rows(to_rows(rows)));
    }

    /// Fail every run of `text` with `error`
    pub fn fail(&self, text: &str, error: ExecutorError) {
        self.responses
            .lock()
            .insert(text.to_string(), Response::Fail(error));
    }

    /// Delay every response, to widen race windows
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls_for(&self, text: &str) -> usize {
        self.calls.lock().iter().filter(|(t, _)| t == text).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn run(&self, text: &str, parameters: &Parameters) -> Result<Vec<RawRow>, ExecutorError> {
        self.calls
            .lock()
            .push((text.to_string(), parameters.clone()));

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.lock().get(text).cloned();
        match response {
            Some(Response::Rows(rows)) => Ok(rows),
            Some(Response::Fail(error)) => Err(error),
            None => Ok(Vec::new()),
        }
    }
}

/// Convert a JSON array of objects into raw rows
pub fn to_rows(rows: Value) -> Vec<RawRow> {
    match rows {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
