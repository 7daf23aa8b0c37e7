//! Canonical company names.
//!
//! Ratings and the stock registry spell company names differently ("Acme
//! Corp." vs "Acme Corporation"). Both sides are reduced to a
//! [`CanonicalName`] before they are joined.
//!
//! The reduction is lossy. Two distinct legal entities can reduce to the same
//! key, so a join on this key may fan out. The merge stage reports such keys
//! but does not try to disambiguate them.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Characters removed before any suffix rule runs.
const STRIPPED_CHARS: [char; 2] = ['.', ','];

/// Pattern character matching any single character other than a newline.
pub const WILDCARD: char = '.';

/// Ordered removals applied after lowercasing.
///
/// Every rule is a case-sensitive, global, left-to-right replacement of the
/// pattern with the empty string. Patterns are literal except for
/// [`WILDCARD`], so `"n.v"` removes `n`, any character, `v` ("novartis"
/// becomes "artis"). The entries containing uppercase letters (`" (The)"`,
/// `"The"`, `"LLC"`) can never match an already-lowercased string; they stay
/// in the table so the rule list reads the same as the one that produced
/// earlier datasets. See `dead_rules_are_inert` in the tests.
pub const NAME_RULES: &[(&str, &str)] = &[
    ("corporation", ""),
    (" corp", ""),
    (" co", ""),
    ("inc", ""),
    ("limited", ""),
    ("ltd", ""),
    ("holdings", ""),
    (" holding", ""),
    ("plc", ""),
    ("group", ""),
    (" ag", ""),
    (" sa", ""),
    (" pty", ""),
    (" international", ""),
    (" incorporated", ""),
    (" spa", ""),
    (" se", ""),
    (" lp", ""),
    (" (The)", ""),
    ("The", ""),
    ("LLC", ""),
    ("n.v", ""),
];

fn matches_at(haystack: &[char], pattern: &[char]) -> bool {
    haystack.len() >= pattern.len()
        && pattern
            .iter()
            .zip(haystack)
            .all(|(p, h)| p == h || (*p == WILDCARD && *h != '\n'))
}

/// Replace every non-overlapping match of `pattern`, scanning left to right.
///
/// `pattern` is literal apart from [`WILDCARD`].
#[must_use]
pub fn replace_pattern(input: &str, pattern: &str, replacement: &str) -> String {
    if pattern.is_empty() || !pattern.contains(WILDCARD) {
        return input.replace(pattern, replacement);
    }

    let pattern: Vec<char> = pattern.chars().collect();
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < chars.len() {
        if matches_at(&chars[i..], &pattern) {
            out.push_str(replacement);
            i += pattern.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Apply an ordered list of `(pattern, replacement)` rules.
#[must_use]
pub fn apply_rules(input: &str, rules: &[(&str, &str)]) -> String {
    rules
        .iter()
        .fold(input.to_string(), |acc, (pattern, replacement)| {
            replace_pattern(&acc, pattern, replacement)
        })
}

/// Normalized company name used as the ratings/registry join key.
///
/// The only way to build one is [`CanonicalName::new`], which runs the full
/// normalization. Keys coming from different tables are therefore always
/// comparable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub struct CanonicalName(String);

impl CanonicalName {
    /// Normalize a raw company name.
    ///
    /// Lowercases, strips `.` and `,`, removes the legal-entity fragments in
    /// [`NAME_RULES`] and trims surrounding whitespace.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let lowered: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| !STRIPPED_CHARS.contains(c))
            .collect();
        Self(apply_rules(&lowered, NAME_RULES).trim().to_string())
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization removed everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_variants_collapse() {
        assert_eq!(CanonicalName::new("Acme Corp.").as_str(), "acme");
        assert_eq!(CanonicalName::new("Acme Corporation").as_str(), "acme");
        assert_eq!(CanonicalName::new("ACME, Inc.").as_str(), "acme");
        assert_eq!(CanonicalName::new("Acme Holdings PLC").as_str(), "acme");
        assert_eq!(CanonicalName::new("Acme Group Ltd").as_str(), "acme");
    }

    #[test]
    fn test_removals_are_substring_based() {
        // "inc" is removed anywhere, not only as a trailing word.
        assert_eq!(CanonicalName::new("Lincoln National").as_str(), "loln national");
        // " co" eats the start of any word beginning with "co".
        assert_eq!(CanonicalName::new("Acme Consulting").as_str(), "acmensulting");
    }

    #[test]
    fn dead_rules_are_inert() {
        // Uppercase rules run after lowercasing and never fire.
        assert_eq!(CanonicalName::new("Acme LLC").as_str(), "acme llc");
        assert_eq!(CanonicalName::new("The Acme").as_str(), "the acme");
        // Once dots are stripped "nv" is too short for "n.v".
        assert_eq!(CanonicalName::new("Acme N.V.").as_str(), "acme nv");
    }

    #[test]
    fn test_nv_rule_matches_any_middle_character() {
        assert_eq!(CanonicalName::new("Novartis AG").as_str(), "artis");
        assert_eq!(CanonicalName::new("Navient Corp").as_str(), "ient");
        assert_eq!(CanonicalName::new("Nevada Power Co").as_str(), "ada power");
        assert_eq!(CanonicalName::new("Philips N V").as_str(), "philips");
    }

    #[test]
    fn test_replace_pattern() {
        assert_eq!(replace_pattern("novanav", "n.v", ""), "aa");
        assert_eq!(replace_pattern("nnvv", "n.v", "_"), "_v");
        assert_eq!(replace_pattern("n\nv", "n.v", ""), "n\nv");
        assert_eq!(replace_pattern("a.b", ".", "-"), "---");
        assert_eq!(replace_pattern("acme co", " co", ""), "acme");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "Acme Corp.",
            "Acme Corporation",
            "Lincoln National",
            "Acme LLC",
            "Deutsche Bank AG",
            "  Padded Name  ",
            "",
        ] {
            let once = CanonicalName::new(raw);
            let twice = CanonicalName::new(once.as_str());
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_apply_rules_order_matters() {
        let rules = [("ab", ""), ("b", "x")];
        assert_eq!(apply_rules("abb", &rules), "x");
        let reversed = [("b", "x"), ("ab", "")];
        assert_eq!(apply_rules("abb", &reversed), "axx");
    }

    #[test]
    fn test_display_and_empty() {
        let key = CanonicalName::new("Inc.");
        assert!(key.is_empty());
        assert_eq!(CanonicalName::new("Acme Corp").to_string(), "acme");
    }
}
