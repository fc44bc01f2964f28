//! Normalize and compare command handlers

use super::load_variants;
use crate::error::{CliError, CliResult};
use crate::{CompareArgs, NormalizeArgs};
use oracle::{Canonicalizer, Comparison, StageTrace};
use std::fmt::Write as _;

/// Execute the normalize command
pub fn execute_normalize(args: &NormalizeArgs) -> CliResult<()> {
    let canonicalizer = Canonicalizer::with_variants(load_variants(args.variants.as_deref())?);
    if args.explain {
        print!("{}", render_explain(&args.text, &canonicalizer.explain(&args.text)));
    } else {
        println!("{}", canonicalizer.normalize(args.text.as_str()));
    }
    Ok(())
}

/// Execute the compare command; a mismatch is an error so the exit code reflects it
pub fn execute_compare(args: &CompareArgs) -> CliResult<()> {
    let canonicalizer = Canonicalizer::with_variants(load_variants(args.variants.as_deref())?);
    let comparison = canonicalizer.compare(&args.actual, &args.expected);
    print!("{}", render_comparison(&comparison));
    if comparison.is_match() {
        Ok(())
    } else {
        Err(CliError::Mismatch)
    }
}

/// One line per stage; stages that left the text unchanged are marked `=`
#[must_use]
pub fn render_explain(input: &str, traces: &[StageTrace]) -> String {
    let width = traces
        .iter()
        .map(|t| t.stage.name().len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}   \"{}\"", "input", visible(input));
    let mut previous = input;
    for trace in traces {
        let marker = if trace.output == previous { '=' } else { '>' };
        let _ = writeln!(
            out,
            "{:<width$} {marker} \"{}\"",
            trace.stage.name(),
            visible(&trace.output)
        );
        previous = &trace.output;
    }
    out
}

// Control characters and invisible joiners shown as escapes, Sinhala left as is
fn visible(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' => "\\n".to_string(),
            '\r' => "\\r".to_string(),
            '\t' => "\\t".to_string(),
            '\u{200B}'..='\u{200D}' | '\u{FEFF}' => format!("\\u{{{:04X}}}", u32::from(c)),
            c => c.to_string(),
        })
        .collect()
}

/// Raw and canonical forms of both sides, then the verdict
#[must_use]
pub fn render_comparison(comparison: &Comparison) -> String {
    format!(
        "raw actual   : {}\nraw expected : {}\n{comparison}\n",
        comparison.actual_raw, comparison.expected_raw
    )
}
