// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query values and their deterministic identity
//!
//! A [`Query`] is the immutable pair of query text and named parameters that a
//! caller submits. Its [`Uid`] is the cache's primary key.

pub mod parameters;
pub mod uid;

pub use parameters::Parameters;
pub use uid::{normalize_text, Uid};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declarative graph query submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameters(text: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            text: text.into(),
            parameters,
        }
    }

    /// Cache key for this query
    pub fn uid(&self) -> Uid {
        Uid::compute(&self.text, &self.parameters)
    }

    /// Substitute `{key}` and `{ key }` placeholders with quoted parameter values.
    ///
    /// The returned query carries no parameters; its values now appear as quoted
    /// literals in the text and therefore hash and extract as literals.
    pub fn inline_parameters(&self) -> Query {
        let mut text = self.text.clone();
        for (key, value) in self.parameters.iter() {
            let quoted = format!("\"{}\"", Parameters::stringify(value));
            text = text
                .replace(&format!("{{{}}}", key), &quoted)
                .replace(&format!("{{ {} }}", key), &quoted);
        }
        Query::new(text)
    }
}

/// Read/write label derived from the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryKind {
    Read,
    Write,
}

impl QueryKind {
    pub fn is_write(self) -> bool {
        matches!(self, QueryKind::Write)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Read => write!(f, "READ"),
            QueryKind::Write => write!(f, "WRITE"),
        }
    }
}
