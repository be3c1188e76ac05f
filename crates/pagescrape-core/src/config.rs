//! Configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PageScrapeError, Result};

/// Top-level pagescrape configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub robots: RobotsConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// What to scrape and where the rows go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Page to scrape. Required before a scrape can run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// CSV output path (default: "crawled.csv"). `~` is expanded.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: None,
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "crawled.csv".into()
}

/// Browser automation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if omitted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,

    /// Run in headless mode (default: true).
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Pass `--no-sandbox` to Chrome (default: true).
    #[serde(default = "default_true")]
    pub no_sandbox: bool,

    /// CDP request timeout in ms (default: 30000).
    #[serde(default = "default_browser_timeout")]
    pub timeout_ms: u64,

    /// Upper bound on waiting for rendered content, in ms (default: 10000).
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_ms: u64,

    /// Delay between readiness polls, in ms (default: 250).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// How long extracted content must stay unchanged to count as rendered,
    /// in ms (default: 1000).
    #[serde(default = "default_settle")]
    pub settle_ms: u64,

    /// Extra command-line arguments for Chrome.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            no_sandbox: true,
            timeout_ms: default_browser_timeout(),
            ready_timeout_ms: default_ready_timeout(),
            poll_interval_ms: default_poll_interval(),
            settle_ms: default_settle(),
            args: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_browser_timeout() -> u64 {
    30_000
}

fn default_ready_timeout() -> u64 {
    10_000
}

fn default_poll_interval() -> u64 {
    250
}

fn default_settle() -> u64 {
    1_000
}

/// robots.txt handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Check robots.txt before fetching (default: false).
    #[serde(default)]
    pub respect: bool,

    /// User agent matched against robots.txt groups (default: "*").
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            respect: false,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    "*".into()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "plain" (default) or "json".
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log level override (trace/debug/info/warn/error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Per-crate log level overrides (e.g. "pagescrape_browser=debug").
    #[serde(default)]
    pub filters: Vec<String>,

    /// Output target: "stderr" (default) or "stdout".
    #[serde(default = "default_log_output")]
    pub output: String,
}

fn default_log_format() -> String {
    "plain".into()
}

fn default_log_output() -> String {
    "stderr".into()
}

/// Substitute `${ENV_VAR}` patterns in a string with their environment variable values.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| PageScrapeError::Config(e.to_string()))?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_default()
        })
        .into_owned())
}

impl Config {
    /// Load config from a JSON5 file, substituting `${ENV_VAR}` references.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Parse config text (JSON5) after env-var substitution.
    pub fn parse(raw: &str) -> Result<Self> {
        let substituted = substitute_env_vars(raw)?;

        json5::from_str(&substituted).map_err(|e| PageScrapeError::Config(e.to_string()))
    }

    /// Default config file location.
    pub fn config_path() -> PathBuf {
        data_dir().join("config.json")
    }

    /// Target URL, if configured and non-empty.
    pub fn target_url(&self) -> Option<&str> {
        self.target.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Output path with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.target.output);
        PathBuf::from(expanded.as_ref())
    }

    /// Validate config, returning (warnings, errors).
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        match self.target_url() {
            None => errors.push("No target URL configured (target.url)".to_string()),
            Some(raw) => {
                if let Err(e) = url::Url::parse(raw) {
                    errors.push(format!("Target URL '{raw}' is invalid: {e}"));
                }
            }
        }

        if self.target.output.trim().is_empty() {
            errors.push("Output path cannot be empty".to_string());
        }

        if self.browser.poll_interval_ms == 0 {
            errors.push("browser.poll_interval_ms cannot be 0".to_string());
        }

        if self.browser.ready_timeout_ms == 0 {
            warnings.push(
                "browser.ready_timeout_ms is 0; the page is checked once without waiting"
                    .to_string(),
            );
        } else if self.browser.settle_ms >= self.browser.ready_timeout_ms {
            warnings.push(format!(
                "browser.settle_ms ({}) is not below browser.ready_timeout_ms ({}); \
                 the page never counts as rendered and is extracted at the timeout",
                self.browser.settle_ms, self.browser.ready_timeout_ms
            ));
        }

        (warnings, errors)
    }
}

/// Base directory for pagescrape data: `~/.pagescrape/`
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pagescrape")
}
