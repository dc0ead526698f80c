//! Exclusion rules for shim symbols.
//!
//! A symbol exported by the SWIG shim is hidden from the public facade when
//! any one of three rules matches it:
//! - it equals an entry of the exact-match set,
//! - it contains one of the substring patterns,
//! - it starts with an underscore.

use std::collections::BTreeSet;
use std::fmt;

/// Names that are always rejected.
///
/// The empty name guards against blank manifest lines and placeholder entries.
pub const DEFAULT_EXACT: &[&str] = &["FFData", ""];

/// Substrings marking SWIG registration helpers, low-level stream, position,
/// time and header implementation classes, and initializer helpers.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "swigregister",
    "gpstk_pylib",
    "ObsIDInitializer",
    "Stream",
    "EngNav_",
    "OrbElem_",
    "Position",
    "TimeTag_",
    "RinexObsHeader_",
    "VectorBase",
];

/// The rule that rejected a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Equal to an exact-match entry
    Exact,
    /// Contains the given substring pattern
    Pattern(String),
    /// Starts with `_`
    Underscore,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Exact => write!(f, "exact match"),
            Rule::Pattern(p) => write!(f, "pattern `{}`", p),
            Rule::Underscore => write!(f, "leading underscore"),
        }
    }
}

/// The static exclusion policy.
///
/// Coverage is extended by adding entries; the matching algorithm is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRuleSet {
    exact: BTreeSet<String>,
    patterns: Vec<String>,
}

impl Default for ExclusionRuleSet {
    fn default() -> Self {
        ExclusionRuleSet::empty()
            .extend(
                DEFAULT_EXACT.iter().map(|s| s.to_string()),
                DEFAULT_PATTERNS.iter().map(|s| s.to_string()),
            )
    }
}

impl ExclusionRuleSet {
    /// A rule set with only the leading-underscore rule active.
    pub fn empty() -> Self {
        ExclusionRuleSet {
            exact: BTreeSet::new(),
            patterns: Vec::new(),
        }
    }

    /// Add an exact-match name.
    pub fn with_exact(mut self, name: impl Into<String>) -> Self {
        self.exact.insert(name.into());
        self
    }

    /// Add a substring pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        self
    }

    /// Add many exact names and patterns at once.
    pub fn extend<E, P>(mut self, exact: E, patterns: P) -> Self
    where
        E: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        for name in exact {
            self = self.with_exact(name);
        }
        for pattern in patterns {
            self = self.with_pattern(pattern);
        }
        self
    }

    /// Exact-match entries.
    pub fn exact(&self) -> impl Iterator<Item = &str> {
        self.exact.iter().map(String::as_str)
    }

    /// Substring patterns, in insertion order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Return the first rule that rejects `name`, if any.
    ///
    /// Rules are consulted in a fixed order: exact, pattern, underscore.
    pub fn matching_rule(&self, name: &str) -> Option<Rule> {
        if self.exact.contains(name) {
            return Some(Rule::Exact);
        }
        if let Some(pattern) = self.patterns.iter().find(|p| name.contains(p.as_str())) {
            return Some(Rule::Pattern(pattern.clone()));
        }
        if name.starts_with('_') {
            return Some(Rule::Underscore);
        }
        None
    }
}
