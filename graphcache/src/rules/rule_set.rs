// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Allow, deny and write keyword sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Operators allowed out of the box
pub const DEFAULT_ALLOW: &[&str] = &[
    "RETURN", "MATCH", "SKIP", "LIMIT", "OPTIONAL", "ORDER BY", "WITH", "AS", "WHERE",
    "CONSTRAINT", "UNWIND", "DISTINCT", "CASE", "WHEN", "THEN", "ELSE", "END", "CREATE",
    "UNIQUE", "MERGE", "SET", "DELETE", "REMOVE", "FOREACH", "ON", "INDEX", "USING", "DROP",
];

/// Operators that mark a query as mutating
pub const DEFAULT_WRITE: &[&str] = &["CREATE", "SET", "DELETE", "REMOVE", "INDEX", "DROP", "MERGE"];

/// Keywords targeted by an allow/deny change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordSelection {
    /// Every keyword currently known to either list (`'*'`)
    All,
    Keywords(Vec<String>),
}

impl KeywordSelection {
    fn from_strings<I: IntoIterator<Item = String>>(keywords: I) -> Self {
        let keywords: Vec<String> = keywords.into_iter().collect();
        if keywords.iter().any(|k| k.trim() == "*") {
            KeywordSelection::All
        } else {
            KeywordSelection::Keywords(keywords)
        }
    }
}

impl From<&str> for KeywordSelection {
    fn from(value: &str) -> Self {
        Self::from_strings([value.to_string()])
    }
}

impl From<Vec<String>> for KeywordSelection {
    fn from(value: Vec<String>) -> Self {
        Self::from_strings(value)
    }
}

impl From<&[&str]> for KeywordSelection {
    fn from(value: &[&str]) -> Self {
        Self::from_strings(value.iter().map(|k| k.to_string()))
    }
}

impl<const N: usize> From<[&str; N]> for KeywordSelection {
    fn from(value: [&str; N]) -> Self {
        Self::from_strings(value.iter().map(|k| k.to_string()))
    }
}

/// Keyword rules.
///
/// `allow` and `deny` are kept disjoint by every mutator, deserialization
/// included. `write` is a fixed reference list used for classification only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleSetRepr")]
pub struct RuleSet {
    allow: BTreeSet<String>,
    deny: BTreeSet<String>,
    write: BTreeSet<String>,
}

/// Wire form of a [`RuleSet`], normalised on the way in
#[derive(Deserialize)]
struct RuleSetRepr {
    #[serde(default)]
    allow: Vec<String>,
    #[serde(default)]
    deny: Vec<String>,
    #[serde(default)]
    write: Vec<String>,
}

impl From<RuleSetRepr> for RuleSet {
    fn from(repr: RuleSetRepr) -> Self {
        let mut rules = RuleSet::new(repr.allow, repr.write);
        // Deny wins on overlap; a literal "*" entry is a keyword here, not a wildcard
        rules.set_deny(KeywordSelection::Keywords(repr.deny));
        rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW.iter().copied(), DEFAULT_WRITE.iter().copied())
    }
}

impl RuleSet {
    /// Rule set with the given allow and write lists and an empty deny list
    pub fn new<A, W, S, T>(allow: A, write: W) -> Self
    where
        A: IntoIterator<Item = S>,
        W: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            allow: allow.into_iter().map(|k| k.as_ref().to_ascii_uppercase()).collect(),
            deny: BTreeSet::new(),
            write: write.into_iter().map(|k| k.as_ref().to_ascii_uppercase()).collect(),
        }
    }

    pub fn allow(&self) -> &BTreeSet<String> {
        &self.allow
    }

    pub fn deny(&self) -> &BTreeSet<String> {
        &self.deny
    }

    pub fn write(&self) -> &BTreeSet<String> {
        &self.write
    }

    pub fn is_denied(&self, keyword: &str) -> bool {
        self.deny.contains(&keyword.to_ascii_uppercase())
    }

    /// Allow keywords, removing them from the deny list.
    ///
    /// `All` moves every denied keyword into the allow list and empties `deny`.
    pub fn set_allow(&mut self, selection: impl Into<KeywordSelection>) {
        match selection.into() {
            KeywordSelection::All => {
                let denied = std::mem::take(&mut self.deny);
                self.allow.extend(denied);
            }
            KeywordSelection::Keywords(keywords) => {
                for keyword in keywords.iter().map(|k| k.to_ascii_uppercase()) {
                    self.deny.remove(&keyword);
                    self.allow.insert(keyword);
                }
            }
        }
    }

    /// Deny keywords, removing them from the allow list.
    ///
    /// `All` moves every allowed keyword into the deny list and empties `allow`.
    pub fn set_deny(&mut self, selection: impl Into<KeywordSelection>) {
        match selection.into() {
            KeywordSelection::All => {
                let allowed = std::mem::take(&mut self.allow);
                self.deny.extend(allowed);
            }
            KeywordSelection::Keywords(keywords) => {
                for keyword in keywords.iter().map(|k| k.to_ascii_uppercase()) {
                    self.allow.remove(&keyword);
                    self.deny.insert(keyword);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_disjoint(rules: &RuleSet) {
        assert!(
            rules.allow().is_disjoint(rules.deny()),
            "allow and deny overlap: {:?}",
            rules.allow().intersection(rules.deny()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_defaults() {
        let rules = RuleSet::default();
        assert!(rules.allow().contains("ORDER BY"));
        assert!(rules.deny().is_empty());
        assert_eq!(rules.write().len(), 7);
        assert!(rules.write().contains("MERGE"));
    }

    #[test]
    fn test_set_deny_uppercases_and_moves_out_of_allow() {
        let mut rules = RuleSet::default();
        rules.set_deny(["create", "Delete"]);
        assert!(rules.deny().contains("CREATE"));
        assert!(rules.deny().contains("DELETE"));
        assert!(!rules.allow().contains("CREATE"));
        assert!(rules.is_denied("delete"));
        assert_disjoint(&rules);
    }

    #[test]
    fn test_set_allow_star_merges_deny_into_allow() {
        let mut rules = RuleSet::default();
        rules.set_deny(["CREATE", "LOAD CSV"]);
        let prior_union: BTreeSet<String> = rules.allow().union(rules.deny()).cloned().collect();

        rules.set_allow("*");
        assert!(rules.deny().is_empty());
        assert_eq!(rules.allow(), &prior_union);
    }

    #[test]
    fn test_set_deny_star_merges_allow_into_deny() {
        let mut rules = RuleSet::default();
        rules.set_deny(["CREATE"]);
        let prior_union: BTreeSet<String> = rules.allow().union(rules.deny()).cloned().collect();

        rules.set_deny("*");
        assert!(rules.allow().is_empty());
        assert_eq!(rules.deny(), &prior_union);
    }

    #[test]
    fn test_disjoint_after_arbitrary_sequences() {
        let keywords = ["CREATE", "match", "SET", "drop", "CALL", "*"];
        let mut rules = RuleSet::default();
        // Deterministic pseudo-random walk over allow/deny calls
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let keyword = keywords[(seed % keywords.len() as u64) as usize];
            if (seed >> 32) % 2 == 0 {
                rules.set_allow(keyword);
            } else {
                rules.set_deny(keyword);
            }
            assert_disjoint(&rules);
        }
    }

    #[test]
    fn test_write_list_is_unaffected_by_allow_deny() {
        let mut rules = RuleSet::default();
        rules.set_deny("*");
        rules.set_allow(["CREATE"]);
        assert_eq!(rules.write().len(), DEFAULT_WRITE.len());
    }

    #[test]
    fn test_deserialize_keeps_lists_disjoint() {
        let rules: RuleSet = serde_json::from_str(
            r#"{"allow":["CREATE","match"],"deny":["create"],"write":["set"]}"#,
        )
        .unwrap();

        assert_disjoint(&rules);
        assert!(rules.allow().contains("MATCH"));
        assert!(!rules.allow().contains("match"));
        assert!(rules.is_denied("CREATE"));
        assert!(rules.write().contains("SET"));
    }

    #[test]
    fn test_serialize_then_deserialize_is_stable() {
        let mut rules = RuleSet::default();
        rules.set_deny(["DROP", "LOAD CSV"]);
        let json = serde_json::to_string(&rules).unwrap();
        let restored: RuleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, rules);
    }

    #[test]
    fn test_keywords_use_ascii_case_folding() {
        let mut rules = RuleSet::default();
        rules.set_deny(["straße"]);
        // Only ASCII letters are folded
        assert!(rules.deny().contains("STRAßE"));
        assert!(rules.is_denied("Straße"));
    }

    #[test]
    fn test_selection_from_vec_with_star() {
        assert_eq!(
            KeywordSelection::from(vec!["SET".to_string(), "*".to_string()]),
            KeywordSelection::All
        );
    }
}
