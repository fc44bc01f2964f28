//! Canonical text for equivalence comparison.
//!
//! The transliterator renders its output through a UI layer whose exact
//! whitespace, punctuation and spelling are incidental. [`normalize`] maps two
//! strings that mean the same thing onto the same [`CanonicalText`], so test
//! assertions compare meaning instead of rendering noise.
//!
//! ## Pipeline
//!
//! Stages run in a fixed order; later stages rely on earlier ones.
//!
//! | # | Stage | Effect |
//! |---|-------|--------|
//! | 1 | [`Stage::Unicode`] | drop ZWSP/ZWNJ/ZWJ/BOM, then NFC |
//! | 2 | [`Stage::LineEndings`] | CRLF and CR become LF |
//! | 3 | [`Stage::HorizontalWhitespace`] | tab/space/VT/FF runs become one space, no space next to LF |
//! | 4 | [`Stage::BlankLines`] | 3+ LF become exactly 2 |
//! | 5 | [`Stage::PunctuationSpacing`] | `"word ."` becomes `"word."` |
//! | 6 | [`Stage::DigitSuffix`] | `"6000 ක්"` becomes `"6000ක්"` |
//! | 7 | [`Stage::CaseFold`] | ASCII letters lowercased |
//! | 8 | [`Stage::TrailingPunctuation`] | trim, strip trailing `.`/`!`/`?` |
//! | 9 | [`Stage::Variants`] | orthographic variant table, then NFC |
//! | 10 | [`Stage::FinalCollapse`] | 2+ spaces become one, trim |
//!
//! Stage 4 keeps one blank line on purpose: it is a readability policy, not a
//! minimal-diff rule.
//!
//! ## Guarantees
//!
//! - Total: every input, including `None`, yields a value; nothing panics.
//! - Pure: no I/O, no clock, no locale.
//! - Idempotent: `normalize(normalize(x)) == normalize(x)`.

use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::variants::VariantTable;

/// Invisible characters removed before composition
pub const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Sinhala suffix fused onto a preceding number (`6000 ක්`)
pub const DIGIT_SUFFIX: &str = "ක්";

/// Normalized text. Only ever compared by exact codepoint equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalText(String);

impl CanonicalText {
    /// Borrow the canonical string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the canonical string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for CanonicalText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for CanonicalText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<CanonicalText> for String {
    fn from(text: CanonicalText) -> Self {
        text.0
    }
}

/// One step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Zero-width removal and NFC
    Unicode,
    /// CRLF/CR to LF
    LineEndings,
    /// Horizontal whitespace runs and padding around newlines
    HorizontalWhitespace,
    /// At most one blank line
    BlankLines,
    /// No space before `. ? ! , ; :`
    PunctuationSpacing,
    /// Number followed by `ක්`
    DigitSuffix,
    /// ASCII lowercase
    CaseFold,
    /// Trailing `.`, `!`, `?`
    TrailingPunctuation,
    /// Orthographic variants
    Variants,
    /// Remaining double spaces and edges
    FinalCollapse,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Self; 10] = [
        Self::Unicode,
        Self::LineEndings,
        Self::HorizontalWhitespace,
        Self::BlankLines,
        Self::PunctuationSpacing,
        Self::DigitSuffix,
        Self::CaseFold,
        Self::TrailingPunctuation,
        Self::Variants,
        Self::FinalCollapse,
    ];

    /// Short kebab-case name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unicode => "unicode",
            Self::LineEndings => "line-endings",
            Self::HorizontalWhitespace => "horizontal-whitespace",
            Self::BlankLines => "blank-lines",
            Self::PunctuationSpacing => "punctuation-spacing",
            Self::DigitSuffix => "digit-suffix",
            Self::CaseFold => "case-fold",
            Self::TrailingPunctuation => "trailing-punctuation",
            Self::Variants => "variants",
            Self::FinalCollapse => "final-collapse",
        }
    }

    /// Run this stage alone
    #[must_use]
    pub fn apply(self, text: &str, variants: &VariantTable) -> String {
        let p = patterns();
        match self {
            Self::Unicode => text
                .chars()
                .filter(|c| !ZERO_WIDTH.contains(c))
                .nfc()
                .collect(),
            Self::LineEndings => text.replace("\r\n", "\n").replace('\r', "\n"),
            Self::HorizontalWhitespace => {
                let collapsed = p.horizontal_ws.replace_all(text, " ");
                p.newline_padding.replace_all(&collapsed, "\n").into_owned()
            }
            Self::BlankLines => p.blank_lines.replace_all(text, "\n\n").into_owned(),
            Self::PunctuationSpacing => p.space_before_punct.replace_all(text, "$1").into_owned(),
            Self::DigitSuffix => p
                .digit_suffix
                .replace_all(text, format!("${{1}}{DIGIT_SUFFIX}").as_str())
                .into_owned(),
            // Recompose: a folded letter may combine with a following mark.
            Self::CaseFold => text.chars().map(|c| c.to_ascii_lowercase()).nfc().collect(),
            Self::TrailingPunctuation => text
                .trim()
                .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '!' | '?'))
                .to_string(),
            // A replacement may compose with a mark that followed its pattern.
            Self::Variants => variants.apply(text).nfc().collect(),
            Self::FinalCollapse => p.interior_spaces.replace_all(text, " ").trim().to_string(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct Patterns {
    horizontal_ws: Regex,
    newline_padding: Regex,
    blank_lines: Regex,
    space_before_punct: Regex,
    digit_suffix: Regex,
    interior_spaces: Regex,
}

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in canonicalization pattern compiles")
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        horizontal_ws: compile(r"[\t\x0B\x0C ]+"),
        newline_padding: compile(r" *\n *"),
        blank_lines: compile(r"\n{3,}"),
        space_before_punct: compile(r" ([.?!,;:])"),
        digit_suffix: compile(&format!(r"([0-9])\s*{DIGIT_SUFFIX}")),
        interior_spaces: compile(r" {2,}"),
    })
}

/// Output of one stage, for diagnosing a mismatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTrace {
    /// Stage that ran
    pub stage: Stage,
    /// Text after the stage
    pub output: String,
}

/// Canonicalizer bound to a variant table.
///
/// [`normalize`] uses the built-in table; construct one of these to add
/// project-specific variants.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    variants: VariantTable,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            variants: VariantTable::builtin().clone(),
        }
    }
}

impl Canonicalizer {
    /// Canonicalizer with the built-in variant table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalizer with a custom variant table
    #[must_use]
    pub const fn with_variants(variants: VariantTable) -> Self {
        Self { variants }
    }

    /// The variant table in use
    #[must_use]
    pub const fn variants(&self) -> &VariantTable {
        &self.variants
    }

    /// Canonicalize `input`; `None` becomes the empty canonical text
    #[must_use]
    pub fn normalize<'a>(&self, input: impl Into<Option<&'a str>>) -> CanonicalText {
        run(input.into().unwrap_or_default(), &self.variants)
    }

    /// Canonicalize while recording the text after every stage
    #[must_use]
    pub fn explain(&self, input: &str) -> Vec<StageTrace> {
        let mut text = input.to_string();
        Stage::ALL
            .iter()
            .map(|&stage| {
                text = stage.apply(&text, &self.variants);
                StageTrace {
                    stage,
                    output: text.clone(),
                }
            })
            .collect()
    }
}

fn run(input: &str, variants: &VariantTable) -> CanonicalText {
    let text = Stage::ALL
        .iter()
        .fold(input.to_string(), |text, stage| stage.apply(&text, variants));
    CanonicalText(text)
}

/// Whether `text` comes through every stage unchanged when no variant applies
pub(crate) fn is_fixed_point(text: &str) -> bool {
    run(text, &VariantTable::default()) == text
}

/// Canonicalize with the built-in variant table.
///
/// ```
/// use oracle::normalize;
///
/// assert_eq!(normalize("සුබ  සතියක් ."), normalize("සුබ සතියක්"));
/// assert_eq!(normalize(None), "");
/// ```
#[must_use]
pub fn normalize<'a>(input: impl Into<Option<&'a str>>) -> CanonicalText {
    run(input.into().unwrap_or_default(), VariantTable::builtin())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::variants::VariantRule;
    use proptest::prelude::*;

    fn stage(stage: Stage, text: &str) -> String {
        stage.apply(text, VariantTable::builtin())
    }

    // =========================================================================
    // Individual stages
    // =========================================================================

    mod stage_tests {
        use super::*;

        #[test]
        fn test_zero_width_removed() {
            assert_eq!(stage(Stage::Unicode, "a\u{200B}b\u{200C}c\u{200D}d\u{FEFF}"), "abcd");
        }

        #[test]
        fn test_nfc_composition() {
            // ෙ + ් composes to ේ
            assert_eq!(stage(Stage::Unicode, "ඊය\u{0DD9}\u{0DCA}"), "ඊය\u{0DDA}");
            assert_eq!(stage(Stage::Unicode, "Cafe\u{0301}"), "Caf\u{00E9}");
        }

        #[test]
        fn test_zero_width_between_marks_recomposes() {
            assert_eq!(
                stage(Stage::Unicode, "ක\u{0DD9}\u{200B}\u{0DCF}"),
                "ක\u{0DDC}"
            );
        }

        #[test]
        fn test_line_endings() {
            assert_eq!(stage(Stage::LineEndings, "a\r\nb\rc\n"), "a\nb\nc\n");
        }

        #[test]
        fn test_horizontal_whitespace() {
            assert_eq!(stage(Stage::HorizontalWhitespace, "a \t\x0B\x0C b"), "a b");
            assert_eq!(stage(Stage::HorizontalWhitespace, "a  \n  b"), "a\nb");
        }

        #[test]
        fn test_blank_lines_keep_one() {
            assert_eq!(stage(Stage::BlankLines, "a\n\n\n\n\nb"), "a\n\nb");
            assert_eq!(stage(Stage::BlankLines, "a\n\nb"), "a\n\nb");
        }

        #[test]
        fn test_punctuation_spacing() {
            assert_eq!(
                stage(Stage::PunctuationSpacing, "a . b ? c ! d , e ; f :"),
                "a. b? c! d, e; f:"
            );
        }

        #[test]
        fn test_digit_suffix() {
            assert_eq!(stage(Stage::DigitSuffix, "Rs. 6000 ක්"), "Rs. 6000ක්");
            assert_eq!(stage(Stage::DigitSuffix, "6000\t\nක්"), "6000ක්");
            assert_eq!(stage(Stage::DigitSuffix, "අපි ක්"), "අපි ක්");
        }

        #[test]
        fn test_case_fold_ascii_only() {
            assert_eq!(stage(Stage::CaseFold, "WiFi NIC Zoom"), "wifi nic zoom");
            assert_eq!(stage(Stage::CaseFold, "ÀÉ"), "ÀÉ");
        }

        #[test]
        fn test_case_fold_recomposes() {
            // No precomposed J-caron exists, but j-caron (U+01F0) does
            assert_eq!(stage(Stage::CaseFold, "J\u{030C}"), "\u{01F0}");
        }

        #[test]
        fn test_trailing_punctuation() {
            assert_eq!(stage(Stage::TrailingPunctuation, "  hello?!  "), "hello");
            assert_eq!(stage(Stage::TrailingPunctuation, "a.\n!"), "a");
            assert_eq!(stage(Stage::TrailingPunctuation, "7.30 am"), "7.30 am");
        }

        #[test]
        fn test_final_collapse() {
            assert_eq!(stage(Stage::FinalCollapse, " a    b "), "a b");
        }

        #[test]
        fn test_stage_names_unique() {
            let mut names: Vec<_> = Stage::ALL.iter().map(Stage::name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), Stage::ALL.len());
        }

        #[test]
        fn test_stage_display() {
            assert_eq!(Stage::DigitSuffix.to_string(), "digit-suffix");
        }
    }

    // =========================================================================
    // Whole pipeline
    // =========================================================================

    mod normalize_tests {
        use super::*;

        #[test]
        fn test_absent_and_empty() {
            assert_eq!(normalize(None), "");
            assert_eq!(normalize(""), "");
            assert_eq!(normalize("   \n\t "), "");
        }

        #[test]
        fn test_case_insensitive() {
            assert_eq!(normalize("Zoom"), normalize("zoom"));
            assert_eq!(normalize("ZOOM"), normalize("zoom"));
        }

        #[test]
        fn test_whitespace_insensitive() {
            assert_eq!(normalize("a   b"), normalize("a b"));
            assert_eq!(normalize("a \n\n\n\n b"), normalize("a\n\nb"));
        }

        #[test]
        fn test_punctuation_spacing_equivalent() {
            assert_eq!(normalize("word ."), normalize("word."));
        }

        #[test]
        fn test_trailing_punctuation_insensitive() {
            assert_eq!(normalize("hello!"), normalize("hello"));
            assert_eq!(normalize("hello?!"), normalize("hello"));
        }

        #[test]
        fn test_digit_suffix_fusion() {
            assert_eq!(normalize("6000 ක්"), normalize("6000ක්"));
        }

        #[test]
        fn test_variant_folding() {
            assert_eq!(normalize("පුලුවන්ද"), normalize("පුළුවන්ද"));
            assert_eq!(normalize("ඔයාගෙ"), normalize("ඔයාගේ"));
        }

        #[test]
        fn test_rendered_output_scenario() {
            assert_eq!(normalize("සුබ  සතියක් ."), normalize("සුබ සතියක්"));
            assert_eq!(normalize("සුබ  සතියක් ."), "සුබ සතියක්");
        }

        #[test]
        fn test_zwj_conjunct_matches_plain() {
            // Rendered rakaransaya carries a ZWJ the expectation may lack
            assert_eq!(normalize("චිත්\u{200D}ර"), normalize("චිත්ර"));
        }

        #[test]
        fn test_mixed_sentence() {
            let raw = "  අද WiFi connection නෑ ,\r\n\r\n\r\nrouter එක  restart කරල බලන්න !! ";
            assert_eq!(
                normalize(raw),
                "අද wifi connection නැහැ,\n\nrouter එක restart කරල බලන්න"
            );
        }

        #[test]
        fn test_explain_ends_at_normalized() {
            let canon = Canonicalizer::new();
            let input = "Rs. 6000 ක් දැරිය හැකිද ?";
            let trace = canon.explain(input);
            assert_eq!(trace.len(), Stage::ALL.len());
            assert_eq!(trace[0].stage, Stage::Unicode);
            assert_eq!(trace.last().unwrap().output, canon.normalize(input).as_str());
        }

        #[test]
        fn test_custom_variants() {
            let table = VariantTable::with_extra([VariantRule::substring("ඔයත්", "ඔයාත්")]).unwrap();
            let canon = Canonicalizer::with_variants(table);
            assert_eq!(canon.normalize("ඔයත් එනවද"), canon.normalize("ඔයාත් එනවද"));
            assert_ne!(normalize("ඔයත් එනවද"), normalize("ඔයාත් එනවද"));
        }

        #[test]
        fn test_replacement_composes_with_following_mark() {
            // ට + ා renders as ටා; rewriting ට to කෙ leaves ෙ + ා, which composes to ො
            let table = VariantTable::compile([VariantRule::substring("ට", "කෙ")]).unwrap();
            let canon = Canonicalizer::with_variants(table);
            let once = canon.normalize("ටා");
            assert_eq!(once, "ක\u{0DDC}");
            assert_eq!(canon.normalize(once.as_str()), once);
        }

        #[test]
        fn test_canonical_text_conversions() {
            let text = normalize("Hello World.");
            assert_eq!(text.as_str(), "hello world");
            assert_eq!(text.len(), 11);
            assert_eq!(text.to_string(), "hello world");
            assert_eq!(String::from(text.clone()), "hello world");
            assert_eq!(text.into_string(), "hello world");
        }

        #[test]
        fn test_canonical_text_serializes_as_string() {
            let json = serde_json::to_string(&normalize("A b")).unwrap();
            assert_eq!(json, "\"a b\"");
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    const ALPHABET: &str =
        "[a-zA-Z0-9 \t\r\n\u{000B}\u{000C}.!?,;:\u{00A0}\u{0D82}-\u{0DF4}\u{200B}-\u{200D}\u{FEFF}]{0,48}";

    const TOKENS: &[&str] = &[
        "කොහොමද", "ඔයත්", "පුලුවන්", "නෑ", "නැ", "ද", "්", "ා", " ", "  ", ".", "?", ",", " ක්", "6",
        "A", "\n", "\u{200D}",
    ];

    fn custom_canonicalizer() -> Canonicalizer {
        let table = VariantTable::with_extra([
            VariantRule::substring("කොහොමද", "කොහොම ද"),
            VariantRule::substring("ඔයත්", "ඔයාත්"),
            VariantRule::whole_word("නැද්ද", "නැත්ද"),
        ])
        .unwrap();
        Canonicalizer::with_variants(table)
    }

    proptest! {
        #[test]
        fn prop_idempotent_with_custom_variants(
            parts in prop::collection::vec(prop::sample::select(TOKENS), 0..12)
        ) {
            let canon = custom_canonicalizer();
            let once = canon.normalize(parts.concat().as_str());
            let twice = canon.normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_idempotent(s in ALPHABET) {
            let once = normalize(s.as_str());
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_ascii_case_insensitive(s in "[a-zA-Z ක්පුලුවන්ද]{0,32}") {
            prop_assert_eq!(
                normalize(s.to_ascii_uppercase().as_str()),
                normalize(s.to_ascii_lowercase().as_str())
            );
        }

        #[test]
        fn prop_space_runs_insensitive(words in prop::collection::vec("[a-zසතියක]{1,6}", 1..6), gap in 1usize..5) {
            let single = words.join(" ");
            let padded = words.join(&" ".repeat(gap));
            prop_assert_eq!(normalize(single.as_str()), normalize(padded.as_str()));
        }

        #[test]
        fn prop_no_edge_whitespace(s in ALPHABET) {
            let out = normalize(s.as_str());
            prop_assert_eq!(out.trim(), out.as_str());
            prop_assert!(!out.contains("  "));
            prop_assert!(!out.ends_with(['.', '!', '?']));
        }
    }
}
