// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pluggable query tokenizer

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;

/// Narrow lexical interface used by the gate, classifier, extractor and projector
pub trait QueryTokenizer: Debug + Send + Sync {
    /// Case-insensitive: `keyword` occurs somewhere in `text` immediately followed by whitespace
    fn keyword_followed_by_whitespace(&self, text: &str, keyword: &str) -> bool;

    /// Case-insensitive substring test
    fn contains_fragment(&self, text: &str, fragment: &str) -> bool;

    /// Unquoted contents of every single- or double-quoted literal, in text order
    fn quoted_literals(&self, text: &str) -> Vec<String>;

    /// Targets of the trailing return clause, or `None` when the query has no return clause
    fn return_targets(&self, text: &str) -> Option<Vec<String>>;
}

static QUOTED_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("static regex"));

static RETURN_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)return\s+").expect("static regex"));

static TRAILING_MODIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(order\s+by|skip|limit)\s").expect("static regex"));

static DISTINCT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^distinct\s+").expect("static regex"));

/// Regex and substring based tokenizer
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

impl RegexTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Byte ranges covered by quoted literals, quotes included.
    /// An unterminated literal runs to the end of `text`.
    fn quoted_spans(text: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut open: Option<(char, usize)> = None;

        for (idx, ch) in text.char_indices() {
            match open {
                Some((q, start)) if ch == q => {
                    spans.push((start, idx + ch.len_utf8()));
                    open = None;
                }
                Some(_) => {}
                None if ch == '\'' || ch == '"' => open = Some((ch, idx)),
                None => {}
            }
        }
        if let Some((_, start)) = open {
            spans.push((start, text.len()));
        }
        spans
    }

    fn is_quoted(spans: &[(usize, usize)], idx: usize) -> bool {
        spans.iter().any(|&(start, end)| start <= idx && idx < end)
    }

    /// Split on commas that are not nested in brackets or quotes
    fn split_top_level(clause: &str) -> Vec<String> {
        let mut targets = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        for ch in clause.chars() {
            match quote {
                Some(q) => {
                    if ch == q {
                        quote = None;
                    }
                    current.push(ch);
                }
                None => match ch {
                    '\'' | '"' => {
                        quote = Some(ch);
                        current.push(ch);
                    }
                    '(' | '[' | '{' => {
                        depth += 1;
                        current.push(ch);
                    }
                    ')' | ']' | '}' => {
                        depth = depth.saturating_sub(1);
                        current.push(ch);
                    }
                    ',' if depth == 0 => {
                        targets.push(std::mem::take(&mut current));
                    }
                    _ => current.push(ch),
                },
            }
        }
        targets.push(current);

        targets
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl QueryTokenizer for RegexTokenizer {
    fn keyword_followed_by_whitespace(&self, text: &str, keyword: &str) -> bool {
        if keyword.is_empty() {
            return false;
        }
        // ASCII upper-casing keeps byte offsets stable
        let haystack = text.to_ascii_uppercase();
        let needle = keyword.to_ascii_uppercase();
        haystack.match_indices(&needle).any(|(idx, _)| {
            haystack[idx + needle.len()..]
                .chars()
                .next()
                .is_some_and(char::is_whitespace)
        })
    }

    fn contains_fragment(&self, text: &str, fragment: &str) -> bool {
        !fragment.is_empty()
            && text
                .to_ascii_uppercase()
                .contains(&fragment.to_ascii_uppercase())
    }

    fn quoted_literals(&self, text: &str) -> Vec<String> {
        QUOTED_LITERAL
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str())
            .filter(|literal| !literal.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn return_targets(&self, text: &str) -> Option<Vec<String>> {
        let spans = Self::quoted_spans(text);
        let start = RETURN_KEYWORD
            .find_iter(text)
            .filter(|m| !Self::is_quoted(&spans, m.start()))
            .last()?
            .end();
        let clause = text[start..].trim();

        let spans = Self::quoted_spans(clause);
        let cut = TRAILING_MODIFIER
            .captures_iter(clause)
            .filter_map(|caps| caps.get(1))
            .find(|m| !Self::is_quoted(&spans, m.start()))
            .map(|m| m.start());
        let clause = match cut {
            Some(end) => clause[..end].trim_end(),
            None => clause,
        };
        let clause = DISTINCT_PREFIX.replace(clause, "");
        Some(Self::split_top_level(&clause))
    }
}
