//! Suite configuration, loaded once at startup and immutable afterwards.
//!
//! The file is TOML (`suite.toml` by default, overridable via the
//! `SUITE_CONFIG` environment variable). A missing file falls back to the
//! defaults; a malformed file is fatal since no useful work is possible
//! without a trustworthy configuration.

use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{SuiteError, SuiteResult};

pub const CONFIG_ENV: &str = "SUITE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "suite.toml";

/// The browser backends the suite can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
}

impl Default for BrowserKind {
    fn default() -> Self {
        BrowserKind::Chrome
    }
}

impl FromStr for BrowserKind {
    type Err = SuiteError;

    fn from_str(s: &str) -> SuiteResult<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            "edge" => Ok(BrowserKind::Edge),
            other => Err(SuiteError::Config(format!("unsupported browser: {}", other))),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Edge => "edge",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Landing page every scenario starts from.
    pub base_url: String,

    pub browser: BrowserKind,

    /// Address of the WebDriver server (chromedriver, geckodriver, ...).
    pub webdriver_url: String,

    /// Locator for the cookie-consent accept button; empty disables the
    /// dismissal step.
    pub cookie_accept_xpath: String,

    pub implicit_wait_secs: u64,
    pub page_load_timeout_secs: u64,
    pub script_timeout_secs: u64,

    /// Comma-separated launch flags, one set per browser kind.
    pub chrome_options: String,
    pub firefox_options: String,
    pub edge_options: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.brighthorizons.com".to_string(),
            browser: BrowserKind::default(),
            webdriver_url: "http://localhost:4444".to_string(),
            cookie_accept_xpath: "//button[contains(@class, 'cookie')]".to_string(),
            implicit_wait_secs: 5,
            page_load_timeout_secs: 30,
            script_timeout_secs: 15,
            chrome_options: String::new(),
            firefox_options: String::new(),
            edge_options: String::new(),
        }
    }
}

impl Config {
    /// Load the configuration from disk plus environment overrides.
    pub fn load() -> SuiteResult<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> SuiteResult<Self> {
        if !path.exists() {
            log::debug!("no config file at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            SuiteError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| SuiteError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env_overrides(&mut self) -> SuiteResult<()> {
        if let Ok(browser) = env::var("SUITE_BROWSER") {
            self.browser = browser.parse()?;
        }
        if let Ok(base_url) = env::var("SUITE_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(webdriver_url) = env::var("SUITE_WEBDRIVER_URL") {
            self.webdriver_url = webdriver_url;
        }
        Ok(())
    }

    /// Launch flags for the given browser kind, split on commas with empty
    /// entries dropped.
    pub fn launch_options(&self, kind: BrowserKind) -> Vec<String> {
        let raw = match kind {
            BrowserKind::Chrome => &self.chrome_options,
            BrowserKind::Firefox => &self.firefox_options,
            BrowserKind::Edge => &self.edge_options,
        };
        raw.split(',')
            .map(str::trim)
            .filter(|opt| !opt.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.browser, BrowserKind::Chrome);
        assert_eq!(config.implicit_wait(), Duration::from_secs(5));
        assert_eq!(config.page_load_timeout(), Duration::from_secs(30));
        assert_eq!(config.script_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn parses_toml_with_partial_overrides() {
        let config = Config::from_toml(
            r#"
            browser = "firefox"
            base_url = "https://staging.example.com"
            firefox_options = "-headless, -width=1920 ,"
            "#,
        )
        .unwrap();
        assert_eq!(config.browser, BrowserKind::Firefox);
        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(
            config.launch_options(BrowserKind::Firefox),
            vec!["-headless", "-width=1920"]
        );
        // untouched keys keep their defaults
        assert_eq!(config.page_load_timeout_secs, 30);
    }

    #[test]
    fn launch_options_empty_when_unset() {
        let config = Config::default();
        assert!(config.launch_options(BrowserKind::Chrome).is_empty());
    }

    #[test]
    fn rejects_unknown_browser() {
        assert!("safari".parse::<BrowserKind>().is_err());
        assert_eq!("EDGE".parse::<BrowserKind>().unwrap(), BrowserKind::Edge);
    }
}
