//! Symbol filtering.
//!
//! Splits a shim namespace into the names re-exported by the facade and the
//! names hidden by the exclusion rules.

use crate::core::rules::{ExclusionRuleSet, Rule};

/// Applies an [`ExclusionRuleSet`] to symbol names.
#[derive(Debug, Clone, Default)]
pub struct SymbolFilter {
    rules: ExclusionRuleSet,
}

/// Outcome of filtering a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Accepted names, in source order
    pub accepted: Vec<String>,

    /// Rejected names with the rule that rejected them, in source order
    pub rejected: Vec<(String, Rule)>,
}

impl SymbolFilter {
    /// Create a filter for the given rules.
    pub fn new(rules: ExclusionRuleSet) -> Self {
        SymbolFilter { rules }
    }

    /// The rules this filter applies.
    pub fn rules(&self) -> &ExclusionRuleSet {
        &self.rules
    }

    /// Whether `name` survives every rule.
    pub fn accept(&self, name: &str) -> bool {
        self.rules.matching_rule(name).is_none()
    }

    /// Accepted subset of `names`, preserving order.
    pub fn filter_namespace<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let mut accepted = Vec::new();
        for name in names {
            let name: &str = name.as_ref();
            if self.accept(name) {
                accepted.push(name.to_string());
            }
        }
        accepted
    }

    /// Split `names` into accepted and rejected, preserving order.
    pub fn partition<S: AsRef<str>>(&self, names: &[S]) -> FilterReport {
        let mut report = FilterReport::default();
        for name in names {
            let name: &str = name.as_ref();
            match self.rules.matching_rule(name) {
                None => report.accepted.push(name.to_string()),
                Some(rule) => {
                    tracing::debug!("hiding `{}` ({})", name, rule);
                    report.rejected.push((name.to_string(), rule));
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<&'static str> {
        vec![
            "Position",
            "Position_swigregister",
            "_internal",
            "FFData",
            "ComputeStats",
        ]
    }

    #[test]
    fn test_documented_scenario() {
        let filter = SymbolFilter::default();
        assert_eq!(filter.filter_namespace(&sample()), vec!["ComputeStats"]);
    }

    #[test]
    fn test_partition_reports_rules() {
        let report = SymbolFilter::default().partition(&sample());

        assert_eq!(report.accepted, vec!["ComputeStats"]);
        assert_eq!(
            report.rejected,
            vec![
                ("Position".to_string(), Rule::Pattern("Position".to_string())),
                (
                    "Position_swigregister".to_string(),
                    Rule::Pattern("swigregister".to_string())
                ),
                ("_internal".to_string(), Rule::Underscore),
                ("FFData".to_string(), Rule::Exact),
            ]
        );
    }

    #[test]
    fn test_preserves_order_and_never_grows() {
        let names = vec![
            "Zeta", "__doc__", "Alpha", "RinexObsStream", "Mid", "CommonTime", "_x",
        ];
        let accepted = SymbolFilter::default().filter_namespace(&names);

        assert_eq!(accepted, vec!["Zeta", "Alpha", "Mid", "CommonTime"]);
        assert!(accepted.len() <= names.len());
    }

    #[test]
    fn test_output_honours_every_rule() {
        let filter = SymbolFilter::default();
        let names: Vec<String> = [
            "", "FFData", "EngNav_x", "OrbElem_y", "TimeTag_z", "VectorBase_double",
            "ObsIDInitializer", "gpstk_pylib", "SatID", "__name__", "Triple",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let accepted = filter.filter_namespace(&names);
        for name in &accepted {
            assert!(!filter.rules().exact().any(|e| e == name.as_str()));
            assert!(!filter.rules().patterns().iter().any(|p| name.contains(p.as_str())));
            assert!(!name.starts_with('_'));
        }
        assert_eq!(accepted, vec!["SatID", "Triple"]);
    }

    #[test]
    fn test_accept_is_pure() {
        let filter = SymbolFilter::default();
        for name in sample() {
            assert_eq!(filter.accept(name), filter.accept(name));
        }
        let once = filter.filter_namespace(&sample());
        assert_eq!(filter.filter_namespace(&once), once);
    }

    #[test]
    fn test_empty_namespace() {
        let names: Vec<String> = Vec::new();
        assert!(SymbolFilter::default().filter_namespace(&names).is_empty());
    }

    #[test]
    fn test_custom_rules() {
        let filter = SymbolFilter::new(ExclusionRuleSet::empty().with_pattern("Legacy"));
        assert!(filter.accept("Position"));
        assert!(!filter.accept("LegacyTime"));
        assert!(!filter.accept("_hidden"));
    }
}
