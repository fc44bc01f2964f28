//! Live browser driver for the transliterator page.
//!
//! With the `browser` feature this drives Chromium over the Chrome `DevTools`
//! Protocol via chromiumoxide. Without it, [`BrowserTransliterator::launch`]
//! reports [`OracleError::BrowserUnavailable`] so callers fail with a clear
//! message instead of a link error.

use crate::config::OracleConfig;
use crate::result::{OracleError, OracleResult};
use std::path::PathBuf;
use std::time::Duration;

/// Delay between visibility and first-output checks
pub const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Chromium launch options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

impl From<&OracleConfig> for BrowserConfig {
    fn from(config: &OracleConfig) -> Self {
        let mut browser = Self::default().with_headless(config.headless);
        if let Some(path) = &config.chromium_path {
            browser = browser.with_chromium_path(path.clone());
        }
        if config.no_sandbox {
            browser = browser.with_no_sandbox();
        }
        browser
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::{BrowserConfig, Duration, OracleConfig, OracleError, OracleResult, ELEMENT_POLL_INTERVAL};
    use crate::locator::{Selector, TextProbe};
    use crate::runner::Transliterator;
    use crate::sample::{InputMode, Sample};
    use crate::wait::{await_stable_async, AsyncTextReader, StableText};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use tokio::task::JoinHandle;
    use tokio::time::{sleep, Instant};

    /// Browser instance with real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        inner: CdpBrowser,
        handle: JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance with real CDP
        pub async fn launch(config: &BrowserConfig) -> OracleResult<Self> {
            let mut builder = CdpConfig::builder();

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| OracleError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                OracleError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            tracing::debug!(headless = config.headless, "browser launched");
            Ok(Self {
                inner: browser,
                handle,
            })
        }

        /// Open a blank page
        pub async fn new_page(&self) -> OracleResult<Page> {
            let inner = self
                .inner
                .new_page("about:blank")
                .await
                .map_err(|e| OracleError::page(e.to_string()))?;
            Ok(Page { inner })
        }

        /// Close the browser
        pub async fn close(mut self) -> OracleResult<()> {
            self.inner
                .close()
                .await
                .map_err(|e| OracleError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            self.handle.abort();
            Ok(())
        }
    }

    /// A browser page with real CDP connection
    #[derive(Debug)]
    pub struct Page {
        inner: CdpPage,
    }

    impl Page {
        /// Navigate and wait for the load to finish
        pub async fn goto(&self, url: &str) -> OracleResult<()> {
            self.inner
                .goto(url)
                .await
                .map_err(|e| OracleError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Evaluate a JavaScript expression and deserialize its value
        pub async fn evaluate<T: DeserializeOwned>(&self, expr: &str) -> OracleResult<T> {
            let result = self
                .inner
                .evaluate(expr)
                .await
                .map_err(|e| OracleError::page(e.to_string()))?;
            result
                .into_value()
                .map_err(|e| OracleError::page(e.to_string()))
        }

        /// Poll until the element is visible
        pub async fn wait_visible(&self, selector: &Selector, timeout: Duration) -> OracleResult<()> {
            let deadline = Instant::now() + timeout;
            loop {
                if self.evaluate::<bool>(&selector.to_visible_query()).await? {
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(OracleError::ElementNotVisible {
                        selector: selector.to_string(),
                        ms: timeout.as_millis() as u64,
                    });
                }
                sleep(ELEMENT_POLL_INTERVAL).await;
            }
        }

        /// Poll until the element shows non-blank text
        pub async fn wait_for_text(&self, selector: &Selector, timeout: Duration) -> OracleResult<()> {
            let deadline = Instant::now() + timeout;
            loop {
                let probe = self.read_text(selector).await?;
                if !probe.text.trim().is_empty() {
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(OracleError::OutputTimeout {
                        selector: selector.to_string(),
                        ms: timeout.as_millis() as u64,
                    });
                }
                sleep(ELEMENT_POLL_INTERVAL).await;
            }
        }

        /// Read `textContent` of the element
        pub async fn read_text(&self, selector: &Selector) -> OracleResult<TextProbe> {
            self.evaluate(&selector.to_text_query()).await
        }

        /// Run a value-setting script produced by [`Selector`]
        pub async fn set_value(&self, selector: &Selector, script: &str) -> OracleResult<()> {
            if self.evaluate::<bool>(script).await? {
                Ok(())
            } else {
                Err(OracleError::InputError {
                    message: format!("input element {selector} not found"),
                })
            }
        }
    }

    /// Reads the output region for the stability poller
    struct OutputReader<'a> {
        page: &'a Page,
        selector: &'a Selector,
    }

    #[async_trait]
    impl AsyncTextReader for OutputReader<'_> {
        type Error = OracleError;

        async fn read_text(&mut self) -> OracleResult<String> {
            let probe = self.page.read_text(self.selector).await?;
            if probe.found {
                Ok(probe.text)
            } else {
                Err(OracleError::ReadError {
                    selector: self.selector.to_string(),
                    message: "element detached".to_string(),
                })
            }
        }
    }

    /// Drives the live transliterator page, one navigation per sample
    #[derive(Debug)]
    pub struct BrowserTransliterator {
        browser: Browser,
        page: Page,
        config: OracleConfig,
        input: Selector,
        output: Selector,
    }

    impl BrowserTransliterator {
        /// Launch Chromium and open a page
        pub async fn launch(config: OracleConfig) -> OracleResult<Self> {
            config.validate()?;
            let browser = Browser::launch(&BrowserConfig::from(&config)).await?;
            let page = browser.new_page().await?;
            Ok(Self {
                browser,
                page,
                input: Selector::css(config.input_selector.clone()),
                output: Selector::css(config.output_selector.clone()),
                config,
            })
        }

        /// Configuration in use
        #[must_use]
        pub const fn config(&self) -> &OracleConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> OracleResult<()> {
            self.browser.close().await
        }

        async fn enter_input(&self, sample: &Sample) -> OracleResult<()> {
            self.page
                .set_value(&self.input, &self.input.to_fill_script(""))
                .await?;
            match sample.kind.input_mode() {
                InputMode::Paste => {
                    self.page
                        .set_value(&self.input, &self.input.to_fill_script(&sample.input))
                        .await
                }
                InputMode::Type => {
                    let mut buf = [0u8; 4];
                    for ch in sample.input.chars() {
                        let key = ch.encode_utf8(&mut buf);
                        self.page
                            .set_value(&self.input, &self.input.to_append_script(key))
                            .await?;
                        sleep(self.config.type_delay()).await;
                    }
                    Ok(())
                }
            }
        }
    }

    #[async_trait]
    impl Transliterator for BrowserTransliterator {
        async fn convert(&mut self, sample: &Sample) -> OracleResult<StableText> {
            let timeout = self.config.visible_timeout();

            self.page.goto(&self.config.base_url).await?;
            self.page.wait_visible(&self.input, timeout).await?;
            self.enter_input(sample).await?;
            self.page.wait_visible(&self.output, timeout).await?;
            self.page.wait_for_text(&self.output, timeout).await?;

            let mut reader = OutputReader {
                page: &self.page,
                selector: &self.output,
            };
            await_stable_async(&mut reader, &self.config.stability).await
        }
    }
}

// ============================================================================
// Mock Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{BrowserConfig, OracleConfig, OracleError, OracleResult};
    use crate::runner::Transliterator;
    use crate::sample::Sample;
    use crate::wait::StableText;
    use async_trait::async_trait;

    /// Stand-in used when browser support is compiled out
    #[derive(Debug)]
    pub struct BrowserTransliterator;

    impl BrowserTransliterator {
        /// Always fails: rebuild with `--features browser`
        pub async fn launch(config: OracleConfig) -> OracleResult<Self> {
            config.validate()?;
            let browser = BrowserConfig::from(&config);
            tracing::debug!(headless = browser.headless, "browser support not compiled in");
            Err(OracleError::BrowserUnavailable)
        }

        /// Nothing to close
        pub async fn close(self) -> OracleResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl Transliterator for BrowserTransliterator {
        async fn convert(&mut self, _sample: &Sample) -> OracleResult<StableText> {
            Err(OracleError::BrowserUnavailable)
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{Browser, BrowserTransliterator, Page};

#[cfg(not(feature = "browser"))]
pub use mock::BrowserTransliterator;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod config_tests {
        use super::*;

        #[test]
        fn test_default() {
            let config = BrowserConfig::default();
            assert!(config.headless);
            assert!(config.sandbox);
            assert!(config.chromium_path.is_none());
        }

        #[test]
        fn test_from_oracle_config() {
            let oracle = OracleConfig::default()
                .with_headless(false)
                .with_no_sandbox(true)
                .with_chromium_path("/opt/chromium");
            let config = BrowserConfig::from(&oracle);
            assert!(!config.headless);
            assert!(!config.sandbox);
            assert_eq!(config.chromium_path, Some(PathBuf::from("/opt/chromium")));
        }

        #[test]
        fn test_builder() {
            let config = BrowserConfig::default()
                .with_headless(false)
                .with_no_sandbox()
                .with_chromium_path("/usr/bin/chromium");
            assert!(!config.headless);
            assert!(!config.sandbox);
        }
    }

    #[cfg(not(feature = "browser"))]
    mod mock_tests {
        use super::*;
        use crate::runner::Transliterator;
        use crate::sample::Sample;

        #[tokio::test]
        async fn test_launch_reports_unavailable() {
            let err = BrowserTransliterator::launch(OracleConfig::default())
                .await
                .unwrap_err();
            assert!(matches!(err, OracleError::BrowserUnavailable));
        }

        #[tokio::test]
        async fn test_launch_validates_config_first() {
            let err = BrowserTransliterator::launch(OracleConfig::default().with_base_url("nope"))
                .await
                .unwrap_err();
            assert!(matches!(err, OracleError::Config { .. }));
        }

        #[tokio::test]
        async fn test_stand_in_never_converts() {
            let sample = Sample::new("Pos_Fun_0001", "mama", "මම").unwrap();
            let mut stand_in = BrowserTransliterator;
            let err = stand_in.convert(&sample).await.unwrap_err();
            assert!(matches!(err, OracleError::BrowserUnavailable));
            stand_in.close().await.unwrap();
        }
    }
}
