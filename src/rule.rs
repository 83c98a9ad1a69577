//! A single rewrite rule applied to a filename stem.
//!
//! Every rule pairs a case-insensitive pattern with a replacement. Most
//! replacements are plain templates with `${n}` group references; a few
//! need logic (uppercasing a matched run, canonicalizing a token from a
//! dictionary), which is what [`Replacement::Computed`] is for.

use crate::config::ConfigError;
use crate::literal::LiteralSet;
use crate::name_model::NameModel;
use regex::{Captures, Regex, RegexBuilder};

/// How a rule rewrites the text it matched.
pub enum Replacement {
    /// A template string with `${n}` references to capture groups.
    Literal(String),
    /// A function computing the replacement from the captures.
    Computed(Box<dyn Fn(&Captures) -> String + Send + Sync>),
}

impl std::fmt::Debug for Replacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Replacement::Literal(template) => f.debug_tuple("Literal").field(template).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// One rewrite rule: a compiled pattern, a replacement, and an optional
/// extension gate.
pub struct Rule {
    regex: Regex,
    replacement: Replacement,
    gate: Option<LiteralSet>,
}

impl Rule {
    /// Build a rule with a template replacement.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRulePattern` if the pattern does not
    /// compile.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            regex: compile(pattern)?,
            replacement: Replacement::Literal(replacement.to_string()),
            gate: None,
        })
    }

    /// Build a rule whose replacement is computed from the captures.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRulePattern` if the pattern does not
    /// compile.
    pub fn computed<F>(pattern: &str, replace: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Captures) -> String + Send + Sync + 'static,
    {
        Ok(Self {
            regex: compile(pattern)?,
            replacement: Replacement::Computed(Box::new(replace)),
            gate: None,
        })
    }

    /// Restrict the rule to files whose extension is in `extensions`.
    /// Gated rules never touch directories.
    pub fn gated(mut self, extensions: &LiteralSet) -> Self {
        self.gate = Some(extensions.clone());
        self
    }

    /// Apply the rule to the stem of `name`, rewriting every match.
    pub fn apply(&self, name: &mut NameModel) {
        if let Some(gate) = &self.gate {
            if !gate.matches(name.extension_name()) {
                return;
            }
        }

        let rewritten = match &self.replacement {
            Replacement::Literal(template) => self
                .regex
                .replace_all(name.stem(), template.as_str())
                .into_owned(),
            Replacement::Computed(replace) => self
                .regex
                .replace_all(name.stem(), |caps: &Captures| replace(caps))
                .into_owned(),
        };

        if rewritten != name.stem() {
            name.set_stem(&rewritten);
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.regex.as_str())
            .field("replacement", &self.replacement)
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

/// All rules match case-insensitively; casing is decided by replacements
/// and the title-casing pass, never by the input.
fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidRulePattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}
