//! Run configuration for the live transliterator page.
//!
//! Every field has a default, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! base_url: https://staging.example.com/
//! stability:
//!   stable_for_ms: 800
//! variants_file: extra-variants.yaml
//! ```

use crate::result::{OracleError, OracleResult};
use crate::variants::VariantTable;
use crate::wait::StabilityOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default page under test
pub const DEFAULT_BASE_URL: &str = "https://www.swifttranslator.com/";

/// Default input textarea
pub const DEFAULT_INPUT_SELECTOR: &str = r#"textarea[placeholder="Input Your Singlish Text Here."]"#;

/// Default output region
pub const DEFAULT_OUTPUT_SELECTOR: &str = "div.whitespace-pre-wrap.overflow-y-auto.bg-slate-50";

/// Default wait for an element to become visible
pub const DEFAULT_VISIBLE_TIMEOUT_MS: u64 = 15_000;

/// Default delay between typed keys
pub const DEFAULT_TYPE_DELAY_MS: u64 = 40;

/// Oracle run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Page under test
    pub base_url: String,
    /// CSS selector of the input textarea
    pub input_selector: String,
    /// CSS selector of the output region
    pub output_selector: String,
    /// Wait for visibility and first output, in milliseconds
    pub visible_timeout_ms: u64,
    /// Output stability polling
    pub stability: StabilityOptions,
    /// Delay between typed keys, in milliseconds
    pub type_delay_ms: u64,
    /// Run Chromium headless
    pub headless: bool,
    /// Chromium binary; auto-detected when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chromium_path: Option<PathBuf>,
    /// Disable the Chromium sandbox (containers, CI)
    pub no_sandbox: bool,
    /// Extra variant rules, relative to the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants_file: Option<PathBuf>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            input_selector: DEFAULT_INPUT_SELECTOR.to_string(),
            output_selector: DEFAULT_OUTPUT_SELECTOR.to_string(),
            visible_timeout_ms: DEFAULT_VISIBLE_TIMEOUT_MS,
            stability: StabilityOptions::default(),
            type_delay_ms: DEFAULT_TYPE_DELAY_MS,
            headless: true,
            chromium_path: None,
            no_sandbox: false,
            variants_file: None,
        }
    }
}

impl OracleConfig {
    /// Default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML and validate
    pub fn from_yaml_str(yaml: &str) -> OracleResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file; `variants_file` is resolved against its directory
    pub fn load(path: &Path) -> OracleResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&yaml)?;
        if let (Some(file), Some(dir)) = (config.variants_file.as_ref(), path.parent()) {
            if file.is_relative() {
                config.variants_file = Some(dir.join(file));
            }
        }
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> OracleResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reject values that cannot drive a run
    pub fn validate(&self) -> OracleResult<()> {
        if !(self.base_url.starts_with("http://")
            || self.base_url.starts_with("https://")
            || self.base_url.starts_with("file://"))
        {
            return Err(OracleError::config(format!(
                "base_url must be an http(s) or file URL, got '{}'",
                self.base_url
            )));
        }
        if self.input_selector.trim().is_empty() || self.output_selector.trim().is_empty() {
            return Err(OracleError::config("selectors must not be empty"));
        }
        if self.stability.poll_interval_ms == 0 {
            return Err(OracleError::config("stability.poll_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Built-in variants plus `variants_file`, if set
    pub fn variant_table(&self) -> OracleResult<VariantTable> {
        match &self.variants_file {
            Some(path) => VariantTable::with_extra(VariantTable::load_rules(path)?),
            None => Ok(VariantTable::builtin().clone()),
        }
    }

    /// Visibility wait as Duration
    #[must_use]
    pub const fn visible_timeout(&self) -> Duration {
        Duration::from_millis(self.visible_timeout_ms)
    }

    /// Key delay as Duration
    #[must_use]
    pub const fn type_delay(&self) -> Duration {
        Duration::from_millis(self.type_delay_ms)
    }

    /// Set page under test
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set input selector
    #[must_use]
    pub fn with_input_selector(mut self, selector: impl Into<String>) -> Self {
        self.input_selector = selector.into();
        self
    }

    /// Set output selector
    #[must_use]
    pub fn with_output_selector(mut self, selector: impl Into<String>) -> Self {
        self.output_selector = selector.into();
        self
    }

    /// Set visibility wait
    #[must_use]
    pub const fn with_visible_timeout(mut self, ms: u64) -> Self {
        self.visible_timeout_ms = ms;
        self
    }

    /// Set stability options
    #[must_use]
    pub const fn with_stability(mut self, stability: StabilityOptions) -> Self {
        self.stability = stability;
        self
    }

    /// Set key delay
    #[must_use]
    pub const fn with_type_delay(mut self, ms: u64) -> Self {
        self.type_delay_ms = ms;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set Chromium binary
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the Chromium sandbox
    #[must_use]
    pub const fn with_no_sandbox(mut self, no_sandbox: bool) -> Self {
        self.no_sandbox = no_sandbox;
        self
    }

    /// Set extra variants file
    #[must_use]
    pub fn with_variants_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.variants_file = Some(path.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_live_page() {
        let config = OracleConfig::default();
        assert_eq!(config.base_url, "https://www.swifttranslator.com/");
        assert_eq!(
            config.input_selector,
            "textarea[placeholder=\"Input Your Singlish Text Here.\"]"
        );
        assert_eq!(config.output_selector, "div.whitespace-pre-wrap.overflow-y-auto.bg-slate-50");
        assert_eq!(config.visible_timeout(), Duration::from_secs(15));
        assert_eq!(config.type_delay(), Duration::from_millis(40));
        assert_eq!(config.stability, StabilityOptions::default());
        assert!(config.headless);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let config = OracleConfig::from_yaml_str(
            "base_url: http://localhost:8080/\nstability:\n  stable_for_ms: 800\n",
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.stability.stable_for_ms, 800);
        assert_eq!(config.stability.poll_interval_ms, 120);
        assert_eq!(config.type_delay_ms, 40);
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let yaml = OracleConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("swifttranslator"));
        assert!(!yaml.contains("variants_file"));
        assert_eq!(OracleConfig::from_yaml_str(&yaml).unwrap(), OracleConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let err = OracleConfig::default().with_base_url("swifttranslator.com").validate();
        assert!(matches!(err, Err(OracleError::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = OracleConfig::default()
            .with_stability(StabilityOptions::default().with_poll_interval(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_selector() {
        let config = OracleConfig::default().with_output_selector("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder() {
        let config = OracleConfig::new()
            .with_input_selector("#in")
            .with_visible_timeout(1_000)
            .with_type_delay(0)
            .with_headless(false)
            .with_no_sandbox(true)
            .with_chromium_path("/usr/bin/chromium")
            .with_variants_file("v.yaml");
        assert_eq!(config.input_selector, "#in");
        assert_eq!(config.visible_timeout_ms, 1_000);
        assert_eq!(config.type_delay_ms, 0);
        assert!(!config.headless);
        assert!(config.no_sandbox);
        assert_eq!(config.chromium_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(config.variants_file, Some(PathBuf::from("v.yaml")));
    }

    #[test]
    fn test_load_resolves_variants_file() {
        let dir = tempfile::tempdir().unwrap();
        let variants = dir.path().join("extra.yaml");
        std::fs::write(
            &variants,
            "variants:\n  - pattern: ඔයත්\n    replacement: ඔයාත්\n",
        )
        .unwrap();
        let config_path = dir.path().join("oracle.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "variants_file: extra.yaml").unwrap();

        let config = OracleConfig::load(&config_path).unwrap();
        assert_eq!(config.variants_file.as_deref(), Some(variants.as_path()));

        let table = config.variant_table().unwrap();
        assert_eq!(table.len(), VariantTable::builtin().len() + 1);
    }

    #[test]
    fn test_variant_table_without_file_is_builtin() {
        let table = OracleConfig::default().variant_table().unwrap();
        assert_eq!(table.len(), VariantTable::builtin().len());
    }
}
