//! Orthographic variant table.
//!
//! Colloquial Sinhala spellings that the transliterator and the hand-written
//! expectations disagree on are folded onto one form before comparison. The
//! table is plain data: an ordered list of [`VariantRule`] records compiled once
//! into a [`VariantTable`]. Extra rules can be loaded from YAML:
//!
//! ```yaml
//! variants:
//!   - pattern: "කොහොමද"
//!     replacement: "කොහොම ද"
//!   - pattern: "නෑ"
//!     replacement: "නැහැ"
//!     whole_word: true
//! ```

use std::path::Path;
use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::canonical::{self, DIGIT_SUFFIX};
use crate::result::{OracleError, OracleResult};

/// Built-in variants as `(pattern, replacement, whole_word)`, applied in order.
///
/// Longer patterns come before their prefixes (`පුලුවන්ද` before `පුලුවන්`).
pub const DEFAULT_VARIANTS: &[(&str, &str, bool)] = &[
    ("පුලුවන්ද", "පුළුවන්ද", false),
    ("පුලුවන්", "පුළුවන්", false),
    ("පුලුවන", "පුළුවන", false),
    ("ඔයාගෙ", "ඔයාගේ", false),
    ("ඔයාලගෙ", "ඔයාලගේ", false),
    ("ඊයෙ", "ඊයේ", false),
    ("හොද", "හොඳ", false),
    ("නෑ", "නැහැ", true),
    ("නැ", "නැහැ", true),
];

/// A single find/replace record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRule {
    /// Exact text to look for
    pub pattern: String,
    /// Text that replaces every occurrence
    pub replacement: String,
    /// Only match on word boundaries
    #[serde(default)]
    pub whole_word: bool,
}

impl VariantRule {
    /// Rule that rewrites every occurrence, including inside longer words
    #[must_use]
    pub fn substring(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            whole_word: false,
        }
    }

    /// Rule that only rewrites standalone words
    #[must_use]
    pub fn whole_word(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            whole_word: true,
        }
    }
}

/// The built-in rules as owned records
#[must_use]
pub fn default_rules() -> Vec<VariantRule> {
    DEFAULT_VARIANTS
        .iter()
        .map(|&(pattern, replacement, whole_word)| VariantRule {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            whole_word,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct VariantFile {
    #[serde(default)]
    variants: Vec<VariantRule>,
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal,
    Word(Regex),
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: VariantRule,
    matcher: Matcher,
}

impl CompiledRule {
    fn compile(rule: VariantRule) -> OracleResult<Self> {
        // Text reaching the table is already NFC, so the table must be too.
        let rule = VariantRule {
            pattern: rule.pattern.nfc().collect(),
            replacement: rule.replacement.nfc().collect(),
            whole_word: rule.whole_word,
        };

        if rule.pattern.is_empty() {
            return Err(OracleError::InvalidVariant {
                pattern: rule.pattern,
                message: "pattern must not be empty".into(),
            });
        }

        if let Some(message) = replacement_problem(&rule.replacement) {
            return Err(OracleError::InvalidVariant {
                pattern: rule.pattern,
                message: message.into(),
            });
        }

        let matcher = if rule.whole_word {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(&rule.pattern))).map_err(
                |e| OracleError::InvalidVariant {
                    pattern: rule.pattern.clone(),
                    message: e.to_string(),
                },
            )?;
            Matcher::Word(re)
        } else {
            Matcher::Literal
        };

        let compiled = Self { rule, matcher };
        if compiled.matches(&compiled.rule.replacement) {
            return Err(OracleError::InvalidVariant {
                pattern: compiled.rule.pattern,
                message: "replacement contains the pattern, rewriting would not settle".into(),
            });
        }
        Ok(compiled)
    }

    fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Literal => text.contains(&self.rule.pattern),
            Matcher::Word(re) => re.is_match(text),
        }
    }

    fn apply(&self, text: String) -> String {
        match &self.matcher {
            Matcher::Literal if text.contains(&self.rule.pattern) => {
                text.replace(&self.rule.pattern, &self.rule.replacement)
            }
            Matcher::Literal => text,
            Matcher::Word(re) => re
                .replace_all(&text, NoExpand(&self.rule.replacement))
                .into_owned(),
        }
    }
}

/// Why `replacement` could be changed by a later normalization pass, if it could
fn replacement_problem(replacement: &str) -> Option<&'static str> {
    if replacement.is_empty() {
        // Deleting a word can expose trailing punctuation or join a digit to its suffix
        return Some("replacement must not be empty");
    }
    if !canonical::is_fixed_point(replacement) {
        return Some("replacement is not in canonical form");
    }
    if replacement.starts_with(['.', '?', '!', ',', ';', ':']) {
        return Some("replacement must not start with punctuation");
    }
    if replacement.starts_with(DIGIT_SUFFIX) {
        return Some("replacement must not start with the digit suffix");
    }
    if replacement.ends_with(|c: char| c.is_ascii_digit()) {
        return Some("replacement must not end in a digit");
    }
    None
}

/// Inputs where `rule` rewrites text that touches or overlaps an occurrence of `pattern`
fn neighbour_seeds(rule: &VariantRule, pattern: &str) -> Vec<String> {
    let (from, to) = (rule.pattern.as_str(), rule.replacement.as_str());
    let mut seeds = vec![format!("{from}{pattern}"), format!("{pattern}{from}")];

    // replacement begins inside the pattern
    for (at, _) in pattern.char_indices() {
        let rest = &pattern[at..];
        if let Some(after) = rest.strip_prefix(to) {
            seeds.push(format!("{}{from}{after}", &pattern[..at]));
        } else if to.starts_with(rest) {
            seeds.push(format!("{}{from}", &pattern[..at]));
        }
    }

    // pattern begins inside the replacement
    for (at, _) in to.char_indices().skip(1) {
        if let Some(after) = pattern.strip_prefix(&to[at..]) {
            seeds.push(format!("{from}{after}"));
        }
    }
    seeds
}

/// Compiled, ordered variant table.
#[derive(Debug, Clone, Default)]
pub struct VariantTable {
    rules: Vec<CompiledRule>,
}

impl VariantTable {
    /// Compile rules in the given order
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidVariant`] for an empty pattern, a
    /// replacement that is not already canonical, or any rule whose output a
    /// second pass over the table would rewrite again.
    pub fn compile(rules: impl IntoIterator<Item = VariantRule>) -> OracleResult<Self> {
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<OracleResult<Vec<_>>>()?;
        let table = Self { rules };
        table.check_settles()?;
        Ok(table)
    }

    // Applying the table to its own output must change nothing.
    fn check_settles(&self) -> OracleResult<()> {
        if let Some(produced) = self
            .rules
            .iter()
            .find(|c| self.apply(&c.rule.replacement) != c.rule.replacement)
        {
            return Err(OracleError::InvalidVariant {
                pattern: produced.rule.pattern.clone(),
                message: "replacement is rewritten by another rule".into(),
            });
        }

        for produced in &self.rules {
            for target in &self.rules {
                let unsettled = neighbour_seeds(&produced.rule, &target.rule.pattern)
                    .into_iter()
                    .find(|seed| {
                        let once = self.apply(seed);
                        self.apply(&once) != once
                    });
                if let Some(seed) = unsettled {
                    return Err(OracleError::InvalidVariant {
                        pattern: produced.rule.pattern.clone(),
                        message: format!(
                            "rules do not settle on `{seed}` next to `{}`",
                            target.rule.pattern
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// The built-in table, compiled on first use
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<VariantTable> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::compile(default_rules()).unwrap_or_default())
    }

    /// Built-in rules followed by `extra`
    pub fn with_extra(extra: impl IntoIterator<Item = VariantRule>) -> OracleResult<Self> {
        Self::compile(default_rules().into_iter().chain(extra))
    }

    /// Parse a YAML document with a top-level `variants` list
    pub fn rules_from_yaml_str(yaml: &str) -> OracleResult<Vec<VariantRule>> {
        let file: VariantFile = serde_yaml_ng::from_str(yaml)?;
        Ok(file.variants)
    }

    /// Load extra rules from a YAML file
    pub fn load_rules(path: &Path) -> OracleResult<Vec<VariantRule>> {
        let yaml = std::fs::read_to_string(path)?;
        Self::rules_from_yaml_str(&yaml)
    }

    /// Apply every rule in order
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(acc))
    }

    /// Rules in application order (NFC-normalized)
    pub fn rules(&self) -> impl Iterator<Item = &VariantRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod builtin_tests {
        use super::*;

        #[test]
        fn test_builtin_has_every_default() {
            let table = VariantTable::builtin();
            assert_eq!(table.len(), DEFAULT_VARIANTS.len());
            assert!(!table.is_empty());
        }

        #[test]
        fn test_builtin_order_preserved() {
            let patterns: Vec<_> = VariantTable::builtin()
                .rules()
                .map(|r| r.pattern.clone())
                .collect();
            assert_eq!(patterns[0], "පුලුවන්ද");
            assert_eq!(patterns[patterns.len() - 1], "නැ");
        }

        #[test]
        fn test_puluwan_forms() {
            let table = VariantTable::builtin();
            assert_eq!(table.apply("පුලුවන්ද"), "පුළුවන්ද");
            assert_eq!(table.apply("පුලුවන්"), "පුළුවන්");
            assert_eq!(table.apply("පුලුවනි"), "පුළුවනි");
        }

        #[test]
        fn test_oyage_forms() {
            let table = VariantTable::builtin();
            assert_eq!(table.apply("ඔයාගෙ පොත"), "ඔයාගේ පොත");
            assert_eq!(table.apply("ඔයාලගෙ ගෙදර"), "ඔයාලගේ ගෙදර");
        }

        #[test]
        fn test_yesterday_and_good() {
            let table = VariantTable::builtin();
            assert_eq!(table.apply("ඊයෙ"), "ඊයේ");
            assert_eq!(table.apply("හොද දවසක්"), "හොඳ දවසක්");
        }

        #[test]
        fn test_nae_whole_word_only() {
            let table = VariantTable::builtin();
            assert_eq!(table.apply("sure නෑ"), "sure නැහැ");
            assert_eq!(table.apply("එන්න නැ"), "එන්න නැහැ");
            // Inside a longer word the short forms stay untouched
            assert_eq!(table.apply("නැත්නම්"), "නැත්නම්");
            assert_eq!(table.apply("නැහැ"), "නැහැ");
        }

        #[test]
        fn test_apply_is_stable() {
            let table = VariantTable::builtin();
            for &(pattern, _, _) in DEFAULT_VARIANTS {
                let once = table.apply(pattern);
                assert_eq!(table.apply(&once), once, "rule for {pattern} does not settle");
            }
        }
    }

    mod compile_tests {
        use super::*;

        #[test]
        fn test_empty_pattern_rejected() {
            let err = VariantTable::compile([VariantRule::substring("", "x")]).unwrap_err();
            assert!(matches!(err, OracleError::InvalidVariant { .. }));
        }

        #[test]
        fn test_self_feeding_replacement_rejected() {
            let err = VariantTable::compile([VariantRule::substring("ab", "abc")]).unwrap_err();
            assert!(err.to_string().contains("would not settle"));
        }

        #[test]
        fn test_non_canonical_replacement_rejected() {
            let err = VariantTable::with_extra([VariantRule::substring("ඕකෙ", "OK.")]).unwrap_err();
            assert!(err.to_string().contains("not in canonical form"));

            for replacement in ["x .", "a  b", " x", "x\u{200B}y"] {
                let result = VariantTable::compile([VariantRule::substring("q", replacement)]);
                assert!(result.is_err(), "{replacement:?} should be rejected");
            }
        }

        #[test]
        fn test_replacements_that_merge_with_neighbours_rejected() {
            for replacement in ["", ".x", "ක්ම", "v6"] {
                let err = VariantTable::compile([VariantRule::substring("q", replacement)])
                    .unwrap_err();
                assert!(matches!(err, OracleError::InvalidVariant { .. }));
            }
        }

        #[test]
        fn test_chained_rules_rejected() {
            let err = VariantTable::compile([
                VariantRule::substring("x", "y"),
                VariantRule::substring("z", "x"),
            ])
            .unwrap_err();
            assert!(err.to_string().contains("rewritten by another rule"));
        }

        #[test]
        fn test_replacement_completing_a_pattern_rejected() {
            // "ඕකෙෙ" becomes "ඕකෙ" on the first pass and "ඕක" on the second
            let err = VariantTable::compile([VariantRule::substring("ඕකෙ", "ඕක")]).unwrap_err();
            assert!(err.to_string().contains("do not settle"));
        }

        #[test]
        fn test_replacement_opening_a_word_boundary_rejected() {
            // "yනැ" becomes "x,නැ", where "නැ" now stands alone
            let err = VariantTable::compile([
                VariantRule::whole_word("නැ", "නැහැ"),
                VariantRule::substring("y", "x,"),
            ])
            .unwrap_err();
            assert!(err.to_string().contains("do not settle"));
        }

        #[test]
        fn test_whole_word_regex_is_escaped() {
            let table = VariantTable::compile([VariantRule::whole_word("a.b", "x")]).unwrap();
            assert_eq!(table.apply("a.b axb"), "x axb");
        }

        #[test]
        fn test_replacement_is_not_expanded() {
            let table = VariantTable::compile([VariantRule::whole_word("cost", "$x")]).unwrap();
            assert_eq!(table.apply("cost"), "$x");
        }

        #[test]
        fn test_patterns_are_nfc_normalized() {
            // U+0DD9 U+0DCA decomposes ේ; the compiled rule must use U+0DDA
            let table =
                VariantTable::compile([VariantRule::substring("ඊය\u{0DD9}\u{0DCA}", "x")])
                    .unwrap();
            let rule = table.rules().next().unwrap();
            assert_eq!(rule.pattern, "ඊය\u{0DDA}");
        }

        #[test]
        fn test_with_extra_appends() {
            let table = VariantTable::with_extra([VariantRule::substring("කොහොමද", "කොහොම ද")])
                .unwrap();
            assert_eq!(table.len(), DEFAULT_VARIANTS.len() + 1);
            assert_eq!(table.apply("කොහොමද"), "කොහොම ද");
        }
    }

    mod yaml_tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_rules_from_yaml() {
            let yaml = r#"
variants:
  - pattern: "මොකද"
    replacement: "මොකක්ද"
  - pattern: "නෑ"
    replacement: "නැහැ"
    whole_word: true
"#;
            let rules = VariantTable::rules_from_yaml_str(yaml).unwrap();
            assert_eq!(rules.len(), 2);
            assert!(!rules[0].whole_word);
            assert!(rules[1].whole_word);
        }

        #[test]
        fn test_empty_document_has_no_rules() {
            let rules = VariantTable::rules_from_yaml_str("{}").unwrap();
            assert!(rules.is_empty());
        }

        #[test]
        fn test_load_rules_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "variants:\n  - pattern: \"හොදයි\"\n    replacement: \"හොඳයි\"")
                .unwrap();
            let rules = VariantTable::load_rules(file.path()).unwrap();
            assert_eq!(rules, vec![VariantRule::substring("හොදයි", "හොඳයි")]);
        }

        #[test]
        fn test_load_missing_file_is_io_error() {
            let err = VariantTable::load_rules(Path::new("/nonexistent/variants.yaml")).unwrap_err();
            assert!(matches!(err, OracleError::Io(_)));
        }
    }
}
