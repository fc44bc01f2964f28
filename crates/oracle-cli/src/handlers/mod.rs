//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains the execution logic for one command, pure
//! rendering helpers that return strings, and tests for those helpers.

pub mod cases;
pub mod config;
pub mod normalize;
pub mod run;

use crate::error::CliResult;
use oracle::{OracleConfig, SampleKind, SampleSuite, VariantTable};
use std::path::Path;

pub use cases::{execute_cases, execute_variants, render_cases, render_variants};
pub use config::{execute_config, render_config};
pub use normalize::{execute_compare, execute_normalize, render_comparison, render_explain};
pub use run::execute_run;

/// Built-in variant table, extended with rules from `path` if given
pub fn load_variants(path: Option<&Path>) -> CliResult<VariantTable> {
    Ok(match path {
        Some(path) => VariantTable::with_extra(VariantTable::load_rules(path)?)?,
        None => VariantTable::builtin().clone(),
    })
}

/// Suite from `path`, or the built-in samples, narrowed by id and kind
pub fn load_suite(
    path: Option<&Path>,
    filter: Option<&str>,
    kind: Option<SampleKind>,
) -> CliResult<SampleSuite> {
    let suite = match path {
        Some(path) => SampleSuite::load(path)?,
        None => SampleSuite::builtin(),
    };
    Ok(suite.filter(filter, kind))
}

/// Run configuration from `path`, or the defaults
pub fn load_oracle_config(path: Option<&Path>) -> CliResult<OracleConfig> {
    Ok(match path {
        Some(path) => OracleConfig::load(path)?,
        None => OracleConfig::new(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    mod loader_tests {
        use super::*;

        #[test]
        fn test_builtin_variants() {
            let table = load_variants(None).unwrap();
            assert_eq!(table.len(), VariantTable::builtin().len());
        }

        #[test]
        fn test_extra_variants_are_appended() {
            let mut file = NamedTempFile::new().unwrap();
            writeln!(file, "variants:\n  - pattern: \"කොහොමද\"\n    replacement: \"කොහොම ද\"").unwrap();
            let table = load_variants(Some(file.path())).unwrap();
            assert_eq!(table.len(), VariantTable::builtin().len() + 1);
            assert_eq!(table.rules().last().unwrap().replacement, "කොහොම ද");
        }

        #[test]
        fn test_missing_variants_file() {
            let result = load_variants(Some(Path::new("/nonexistent/variants.yaml")));
            assert!(result.is_err());
        }

        #[test]
        fn test_builtin_suite_filtered_by_kind() {
            let suite = load_suite(None, None, Some(SampleKind::Ui)).unwrap();
            assert_eq!(suite.len(), 1);
        }

        #[test]
        fn test_suite_filtered_by_id() {
            let suite = load_suite(None, Some("Neg_"), None).unwrap();
            assert!(!suite.is_empty());
            assert!(suite.iter().all(|s| s.id.starts_with("Neg_")));
        }

        #[test]
        fn test_default_oracle_config() {
            let config = load_oracle_config(None).unwrap();
            assert_eq!(config.base_url, oracle::DEFAULT_BASE_URL);
        }
    }
}
