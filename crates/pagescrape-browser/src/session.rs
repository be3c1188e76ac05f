//! Browser session — one headless Chrome/Chromium instance driven over CDP.

use std::time::Duration;

use anyhow::Context;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use pagescrape_core::config::BrowserConfig;

use crate::document::BrowserPage;

/// A launched browser plus the task driving its CDP connection.
///
/// Call [`BrowserSession::close`] when done. If the session is dropped
/// instead, the handler task is aborted and chromiumoxide kills the child
/// process.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// Translate our config into chromiumoxide's launch config.
pub fn build_config(config: &BrowserConfig) -> anyhow::Result<CdpConfig> {
    let mut builder = CdpConfig::builder()
        .request_timeout(Duration::from_millis(config.timeout_ms))
        .arg("--disable-gpu");

    if !config.headless {
        builder = builder.with_head();
    }
    if config.no_sandbox {
        builder = builder.no_sandbox();
    }
    if let Some(path) = &config.chrome_path {
        builder = builder.chrome_executable(path);
    }
    for arg in &config.args {
        builder = builder.arg(arg.as_str());
    }

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid browser config: {e}"))
}

impl BrowserSession {
    /// Launch a browser with the given config.
    pub async fn launch(config: &BrowserConfig) -> anyhow::Result<Self> {
        let cdp_config = build_config(config)?;

        info!(headless = config.headless, "Launching browser");
        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .context("Failed to launch browser")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler error");
                }
            }
            debug!("CDP handler finished");
        });

        Ok(Self { browser, handler })
    }

    /// Open a new page at `url` and wait for its navigation to finish.
    pub async fn open(&self, url: &str) -> anyhow::Result<BrowserPage> {
        info!(url, "Browser navigate");
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("Navigation to {url} failed"))?;
        page.wait_for_navigation()
            .await
            .with_context(|| format!("Navigation to {url} did not complete"))?;
        Ok(BrowserPage::new(page))
    }

    /// Shut the browser down. Failures are logged, not returned.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Waiting for browser exit failed");
        }
        self.handler.abort();
        debug!("Browser session closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
