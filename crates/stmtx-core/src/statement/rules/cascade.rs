//! Ordered rule cascades.
//!
//! A [`Cascade`] is a list of tiers, each holding an ordered list of
//! [`Rule`]s. Rules are evaluated left to right and the first rule whose
//! pattern matches and whose captures are accepted by the caller wins.
//! Matches are never combined across rules.

use regex::{Captures, Regex, RegexBuilder};
use tracing::trace;

use super::overrides::{override_rules, Precedence};
use super::{ExtractionMatch, Provenance, Tier};
use crate::models::statement::{Field, Issuer};

/// A named, compiled pattern.
#[derive(Debug, Clone)]
pub struct Rule {
    label: &'static str,
    pattern: Regex,
}

impl Rule {
    /// Compile a rule. Matching is case-insensitive and `.` spans newlines.
    ///
    /// Rules are built from static patterns, so an invalid pattern is a
    /// programming error.
    pub fn new(label: &'static str, pattern: &str) -> Self {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .expect("invalid rule pattern");

        Self { label, pattern }
    }

    /// Name used in provenance and logs.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Captures of the first occurrence of the pattern in `text`.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.pattern.captures(text)
    }
}

/// Trimmed text of capture group `index`, if it participated and is non-empty.
pub fn group<'t>(caps: &Captures<'t>, index: usize) -> Option<&'t str> {
    caps.get(index)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// An ordered sequence of rule tiers.
#[derive(Debug, Default)]
pub struct Cascade<'r> {
    tiers: Vec<(Tier, &'r [Rule])>,
}

impl<'r> Cascade<'r> {
    /// Create an empty cascade.
    pub fn new() -> Self {
        Self { tiers: Vec::new() }
    }

    /// The standard plan for a field: preferred issuer overrides, generic
    /// rules, filling issuer overrides, then generic fallbacks.
    pub fn for_field(
        field: Field,
        issuer: Option<Issuer>,
        generic: &'r [Rule],
        fallback: &'r [Rule],
    ) -> Self {
        Self::new()
            .tier(Tier::Override, override_rules(issuer, field, Precedence::Prefer))
            .tier(Tier::Generic, generic)
            .tier(Tier::Override, override_rules(issuer, field, Precedence::Fill))
            .tier(Tier::Fallback, fallback)
    }

    /// Append a tier.
    pub fn tier(mut self, tier: Tier, rules: &'r [Rule]) -> Self {
        if !rules.is_empty() {
            self.tiers.push((tier, rules));
        }
        self
    }

    /// Number of rules across all tiers.
    pub fn len(&self) -> usize {
        self.tiers.iter().map(|(_, rules)| rules.len()).sum()
    }

    /// Check if the cascade holds no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the cascade against `text`.
    ///
    /// Each rule looks at the first occurrence of its pattern only. `accept`
    /// turns those captures into a value; returning `None` rejects the rule
    /// and evaluation continues with the next rule.
    pub fn run<T>(
        &self,
        text: &str,
        mut accept: impl FnMut(&Captures<'_>) -> Option<T>,
    ) -> Option<ExtractionMatch<T>> {
        for (tier, rules) in &self.tiers {
            for rule in rules.iter() {
                let Some(caps) = rule.captures(text) else {
                    continue;
                };
                let Some(full_match) = caps.get(0) else {
                    continue;
                };
                let Some(value) = accept(&caps) else {
                    trace!("rule '{}' matched {:?} but was rejected", rule.label, full_match.as_str());
                    continue;
                };

                return Some(
                    ExtractionMatch::new(
                        value,
                        Provenance::new(*tier, rule.label),
                        full_match.as_str(),
                    )
                    .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_value(cascade: &Cascade<'_>, text: &str) -> Option<ExtractionMatch<u32>> {
        cascade.run(text, |caps| group(caps, 1)?.parse::<u32>().ok())
    }

    #[test]
    fn test_rule_order_beats_text_order() {
        let rules = vec![
            Rule::new("second word", r"beta (\d+)"),
            Rule::new("first word", r"alpha (\d+)"),
        ];
        let cascade = Cascade::new().tier(Tier::Generic, &rules);

        let found = first_value(&cascade, "alpha 1 beta 2").unwrap();
        assert_eq!(found.value, 2);
        assert_eq!(found.provenance.rule, "second word");
    }

    #[test]
    fn test_rules_are_case_insensitive_and_span_lines() {
        let rule = Rule::new("label", r"total:.(\d+)");
        let caps = rule.captures("TOTAL:\n42").unwrap();
        assert_eq!(&caps[1], "42");
    }

    #[test]
    fn test_rejected_capture_moves_to_next_rule() {
        let first = vec![Rule::new("value", r"value: (\w+)")];
        let fallback = vec![Rule::new("number", r"number (\d+)")];
        let cascade = Cascade::new()
            .tier(Tier::Generic, &first)
            .tier(Tier::Fallback, &fallback);

        let found = first_value(&cascade, "value: abc\nvalue: 17\nnumber 99").unwrap();

        assert_eq!(found.value, 99);
        assert_eq!(found.provenance, Provenance::new(Tier::Fallback, "number"));
        assert_eq!(found.source, "number 99");
    }

    #[test]
    fn test_later_occurrences_are_ignored() {
        let rules = vec![Rule::new("value", r"value: (\w+)")];
        let cascade = Cascade::new().tier(Tier::Generic, &rules);
        assert!(first_value(&cascade, "value: abc\nvalue: 17").is_none());
    }

    #[test]
    fn test_empty_tiers_are_skipped() {
        let generic = vec![Rule::new("x", r"x")];
        let cascade = Cascade::new()
            .tier(Tier::Override, &[])
            .tier(Tier::Generic, &generic);

        assert_eq!(cascade.len(), 1);
        assert!(cascade.run("nothing here", |_| Some(())).is_none());
    }

    #[test]
    fn test_group_trims_and_drops_empty() {
        let rule = Rule::new("pad", r"a(\s*)b(\s*\w+\s*)");
        let caps = rule.captures("a  b  cd  ").unwrap();
        assert_eq!(group(&caps, 1), None);
        assert_eq!(group(&caps, 2), Some("cd"));
        assert_eq!(group(&caps, 5), None);
    }
}
