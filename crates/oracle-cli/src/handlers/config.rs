//! Config command handler

use super::load_oracle_config;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::ConfigArgs;
use oracle::OracleConfig;

/// Execute the config command
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    let oracle_config = load_oracle_config(args.config.as_deref())?;
    oracle_config.validate()?;
    if config.verbosity.is_verbose() {
        let source = args
            .config
            .as_ref()
            .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
        eprintln!("# source: {source}");
    }
    print!("{}", render_config(&oracle_config)?);
    Ok(())
}

/// Effective run configuration as YAML
pub fn render_config(config: &OracleConfig) -> CliResult<String> {
    Ok(config.to_yaml()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let yaml = render_config(&OracleConfig::new()).unwrap();
        assert!(yaml.contains("base_url: https://www.swifttranslator.com/"));
        assert!(yaml.contains("stable_for_ms: 500"));
        assert!(!yaml.contains("variants_file"));
    }

    #[test]
    fn test_render_round_trips() {
        let config = OracleConfig::new().with_base_url("http://localhost:8080/");
        let yaml = render_config(&config).unwrap();
        assert_eq!(OracleConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
