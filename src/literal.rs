//! Canonical spelling dictionaries for tokens with fixed casing.
//!
//! A [`LiteralSet`] is built once from a list of canonical spellings
//! ("USA", "BluRay", "de") and then serves three purposes:
//! - an escaped alternation fragment for embedding into rule patterns,
//! - a case-insensitive lookup from any spelling to the canonical one,
//! - an anchored matcher used to gate rules on file extensions.

use crate::config::ConfigError;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// An immutable set of canonical literal spellings.
#[derive(Debug, Clone)]
pub struct LiteralSet {
    pattern: String,
    matcher: Option<Regex>,
    canonical: HashMap<String, String>,
}

impl LiteralSet {
    /// Build a set from canonical spellings.
    ///
    /// Entries are sorted and deduplicated. Each entry is keyed by its
    /// lowercase form; two distinct entries sharing a lowercase key would
    /// make canonicalization ambiguous, so that is rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateLiteral` on a lowercase key collision.
    pub fn build<I, S>(literals: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<String> = literals.into_iter().map(Into::into).collect();
        entries.sort();
        entries.dedup();

        let mut canonical = HashMap::with_capacity(entries.len());
        for entry in &entries {
            let key = entry.to_lowercase();
            if let Some(first) = canonical.insert(key.clone(), entry.clone()) {
                return Err(ConfigError::DuplicateLiteral {
                    key,
                    first,
                    second: entry.clone(),
                });
            }
        }

        let pattern = entries
            .iter()
            .map(|entry| regex::escape(entry))
            .collect::<Vec<_>>()
            .join("|");

        let matcher = if entries.is_empty() {
            None
        } else {
            let anchored = format!("^(?:{})", pattern);
            let compiled = RegexBuilder::new(&anchored)
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::InvalidRulePattern {
                    pattern: anchored,
                    reason: e.to_string(),
                })?;
            Some(compiled)
        };

        Ok(Self {
            pattern,
            matcher,
            canonical,
        })
    }

    /// Build the union of several sets.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateLiteral` if entries from different
    /// sets collide on a lowercase key.
    pub fn merged(sets: &[&LiteralSet]) -> Result<Self, ConfigError> {
        let entries: Vec<String> = sets
            .iter()
            .flat_map(|set| set.canonical.values().cloned())
            .collect();
        Self::build(entries)
    }

    /// The escaped alternation fragment ("7z|rar|zip") for embedding into
    /// a larger pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `text` starts with one of the literals, ignoring case.
    /// An empty set matches nothing.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|matcher| matcher.is_match(text))
    }

    /// The canonical spelling for `token`, or `token` itself when it is
    /// not in the set.
    pub fn canonicalize<'a>(&'a self, token: &'a str) -> &'a str {
        self.canonical
            .get(&token.to_lowercase())
            .map(String::as_str)
            .unwrap_or(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_sorted_alternation() {
        let set = LiteralSet::build(["zip", "7z", "rar"]).unwrap();
        assert_eq!(set.pattern(), "7z|rar|zip");
    }

    #[test]
    fn test_pattern_escapes_metacharacters() {
        let set = LiteralSet::build(["www.RapidMovieZ.com"]).unwrap();
        assert_eq!(set.pattern(), r"www\.RapidMovieZ\.com");
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let set = LiteralSet::build(["rar", "rar"]).unwrap();
        assert_eq!(set.pattern(), "rar");
    }

    #[test]
    fn test_case_colliding_literals_are_rejected() {
        let result = LiteralSet::build(["USA", "usa"]);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateLiteral { .. })
        ));
    }

    #[test]
    fn test_matches_is_case_insensitive_and_anchored() {
        let set = LiteralSet::build(["7z", "rar", "zip"]).unwrap();
        assert!(set.matches("rar"));
        assert!(set.matches("RAR"));
        assert!(set.matches("zip"));
        assert!(!set.matches("tar"));
        assert!(!set.matches(""));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = LiteralSet::build(Vec::<String>::new()).unwrap();
        assert!(!set.matches("anything"));
        assert_eq!(set.pattern(), "");
    }

    #[test]
    fn test_canonicalize() {
        let set = LiteralSet::build(["USA", "BluRay", "de"]).unwrap();
        assert_eq!(set.canonicalize("usa"), "USA");
        assert_eq!(set.canonicalize("BLURAY"), "BluRay");
        assert_eq!(set.canonicalize("De"), "de");
        assert_eq!(set.canonicalize("unknown"), "unknown");
    }

    #[test]
    fn test_merged_unions_sets() {
        let a = LiteralSet::build(["USA", "UK"]).unwrap();
        let b = LiteralSet::build(["BluRay"]).unwrap();
        let merged = LiteralSet::merged(&[&a, &b]).unwrap();
        assert_eq!(merged.canonicalize("uk"), "UK");
        assert_eq!(merged.canonicalize("bluray"), "BluRay");
    }

    #[test]
    fn test_merged_rejects_cross_set_collisions() {
        let a = LiteralSet::build(["USA"]).unwrap();
        let b = LiteralSet::build(["usa"]).unwrap();
        assert!(LiteralSet::merged(&[&a, &b]).is_err());
    }
}
