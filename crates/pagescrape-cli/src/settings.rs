//! Resolving a scrape's settings from config plus command-line overrides.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::warn;

use pagescrape_core::config::{BrowserConfig, Config, RobotsConfig};

/// Command-line overrides for a scrape. Unset flags keep the config value.
#[derive(Debug, Default, Args)]
pub struct ScrapeArgs {
    /// Page to scrape (overrides target.url)
    #[arg(long)]
    pub url: Option<String>,

    /// CSV output path (overrides target.output)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Extract from a saved HTML file instead of launching a browser
    #[arg(long, conflicts_with = "url")]
    pub html_file: Option<PathBuf>,

    /// Check robots.txt before fetching
    #[arg(long)]
    pub respect_robots: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Maximum wait for rendered content, in ms
    #[arg(long)]
    pub ready_timeout_ms: Option<u64>,
}

/// Where page content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Load the URL in a headless browser.
    Live(String),
    /// Parse a saved HTML file.
    HtmlFile(PathBuf),
}

/// Everything one scrape run needs.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub source: Source,
    /// URL reported in logs and checked against robots.txt.
    pub url: String,
    pub output: PathBuf,
    pub browser: BrowserConfig,
    pub robots: RobotsConfig,
}

impl ScrapeArgs {
    /// Fold the overrides into `config`.
    pub fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(url) = &self.url {
            config.target.url = Some(url.clone());
        }
        if let Some(path) = &self.html_file {
            let absolute = std::path::absolute(path)
                .with_context(|| format!("Cannot resolve {}", path.display()))?;
            let file_url = url::Url::from_file_path(&absolute)
                .map_err(|()| anyhow::anyhow!("Cannot express {} as a URL", absolute.display()))?;
            config.target.url = Some(file_url.to_string());
        }
        if let Some(output) = &self.output {
            config.target.output = output.clone();
        }
        if self.respect_robots {
            config.robots.respect = true;
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(ms) = self.ready_timeout_ms {
            config.browser.ready_timeout_ms = ms;
        }
        Ok(())
    }

    /// Apply overrides and validate, producing the settings for one run.
    pub fn resolve(&self, mut config: Config) -> anyhow::Result<ScrapeSettings> {
        self.apply(&mut config)?;

        let (warnings, errors) = config.validate();
        for w in &warnings {
            warn!("Config: {w}");
        }
        if !errors.is_empty() {
            anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
        }

        let url = config
            .target_url()
            .context("No target URL configured")?
            .to_string();
        let source = match &self.html_file {
            Some(path) => Source::HtmlFile(path.clone()),
            None => Source::Live(url.clone()),
        };

        Ok(ScrapeSettings {
            source,
            url,
            output: config.output_path(),
            browser: config.browser,
            robots: config.robots,
        })
    }
}
