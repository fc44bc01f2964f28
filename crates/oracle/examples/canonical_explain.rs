//! Canonicalization Example
//!
//! Shows how the oracle decides that two renderings mean the same text:
//! - `normalize` for the canonical form
//! - `compare` for a verdict with both sides
//! - `Canonicalizer::explain` for the text after every stage
//! - extra variant rules on top of the built-in table
//!
//! # Running
//!
//! ```bash
//! cargo run --example canonical_explain -p singlish-oracle
//! ```

use oracle::{compare, normalize, Canonicalizer, OracleResult, VariantRule, VariantTable};

fn main() -> OracleResult<()> {
    println!("=== Singlish Oracle Canonicalization Example ===\n");

    demo_normalize();
    demo_compare();
    demo_explain();
    demo_extra_variants()?;

    println!("\n=== Example Complete ===");
    Ok(())
}

fn demo_normalize() {
    println!("--- normalize ---");
    for text in ["සුබ  සතියක් .", "6000 ක්", "ඔයාගෙ පොත!", "Hello   WORLD ?"] {
        println!("  {text:<20} -> {}", normalize(text));
    }
}

fn demo_compare() {
    println!("\n--- compare ---");
    let pairs = [
        ("ඔයාගෙ  පොත .", "ඔයාගේ පොත"),
        ("මම ගෙදර යනවා", "මම පාසල් යනවා"),
    ];
    for (actual, expected) in pairs {
        let comparison = compare(actual, expected);
        println!("{comparison}\n");
    }
}

fn demo_explain() {
    println!("--- explain ---");
    let input = "රුපියල් 6000 ක්   ලැබුණා !";
    for trace in Canonicalizer::new().explain(input) {
        println!("  {:<22} {}", trace.stage.name(), trace.output);
    }
}

fn demo_extra_variants() -> OracleResult<()> {
    println!("\n--- extra variants ---");
    let table = VariantTable::with_extra([VariantRule::substring("කොහොමද", "කොහොම ද")])?;
    let canonicalizer = Canonicalizer::with_variants(table);
    let comparison = canonicalizer.compare("ඔයාට කොහොමද?", "ඔයාට කොහොම ද");
    let verdict = if comparison.is_match() { "MATCH" } else { "MISMATCH" };
    println!("  {} rules, verdict: {verdict}", canonicalizer.variants().len());
    Ok(())
}
