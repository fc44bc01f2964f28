//! Cases and variants command handlers

use super::{load_suite, load_variants};
use crate::commands::ListFormat;
use crate::error::CliResult;
use crate::{CasesArgs, VariantsArgs};
use oracle::{SampleKind, SampleSuite, VariantTable};
use std::fmt::Write as _;

/// Execute the cases command
pub fn execute_cases(args: &CasesArgs) -> CliResult<()> {
    let suite = load_suite(
        args.suite.as_deref(),
        args.filter.as_deref(),
        args.kind.map(Into::into),
    )?;
    print!("{}", render_cases(&suite, args.format)?);
    Ok(())
}

/// Execute the variants command
pub fn execute_variants(args: &VariantsArgs) -> CliResult<()> {
    let table = load_variants(args.variants.as_deref())?;
    print!("{}", render_variants(&table));
    Ok(())
}

/// Sample listing: `<id>  <kind>  <input>` lines with a count footer, or JSON
pub fn render_cases(suite: &SampleSuite, format: ListFormat) -> CliResult<String> {
    match format {
        ListFormat::Json => {
            let samples: Vec<_> = suite.iter().collect();
            Ok(serde_json::to_string_pretty(&samples)? + "\n")
        }
        ListFormat::Text => {
            let mut out = String::new();
            for sample in suite {
                let _ = writeln!(
                    out,
                    "{:<13} {:<8} {}",
                    sample.id,
                    sample.kind.as_str(),
                    sample.input.replace('\n', "\\n")
                );
            }
            let _ = writeln!(
                out,
                "\n{} samples ({} positive, {} negative, {} ui)",
                suite.len(),
                suite.count(SampleKind::Positive),
                suite.count(SampleKind::Negative),
                suite.count(SampleKind::Ui)
            );
            Ok(out)
        }
    }
}

/// Rules in application order, `whole-word` marked
#[must_use]
pub fn render_variants(table: &VariantTable) -> String {
    let mut out = String::new();
    for (i, rule) in table.rules().enumerate() {
        let scope = if rule.whole_word { "word" } else { "substring" };
        let _ = writeln!(
            out,
            "{:>2}. {} -> {} ({scope})",
            i + 1,
            rule.pattern,
            rule.replacement
        );
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod cases_tests {
        use super::*;

        #[test]
        fn test_text_listing_has_every_sample() {
            let suite = SampleSuite::builtin();
            let text = render_cases(&suite, ListFormat::Text).unwrap();
            assert!(text.lines().any(|l| l.starts_with("Pos_Fun_0001")));
            assert!(text.lines().any(|l| l.starts_with("Pos_UI_0035")));
            assert!(text.trim_end().ends_with("ui)"));
            assert!(text.contains(&format!("{} samples", suite.len())));
        }

        #[test]
        fn test_text_listing_escapes_newlines() {
            let suite = SampleSuite::new(vec![oracle::Sample::new(
                "Neg_Fun_0100",
                "mama\ngedhara",
                "මම\nගෙදර",
            )
            .unwrap()]);
            let text = render_cases(&suite, ListFormat::Text).unwrap();
            assert!(text.contains("mama\\ngedhara"));
        }

        #[test]
        fn test_json_listing() {
            let suite = SampleSuite::builtin().filter(None, Some(SampleKind::Ui));
            let json = render_cases(&suite, ListFormat::Json).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.as_array().unwrap().len(), 1);
            assert_eq!(parsed[0]["id"], "Pos_UI_0035");
            assert_eq!(parsed[0]["kind"], "ui");
        }
    }

    mod variants_tests {
        use super::*;

        #[test]
        fn test_builtin_table_rendering() {
            let text = render_variants(VariantTable::builtin());
            assert_eq!(text.lines().count(), VariantTable::builtin().len());
            assert!(text.lines().next().unwrap().starts_with(" 1. පුලුවන්ද -> පුළුවන්ද"));
            assert!(text.contains("නෑ -> නැහැ (word)"));
        }
    }
}
