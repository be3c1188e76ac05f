//! One scrape run: permission check, fetch, extract, persist.
//!
//! Nothing here returns an error. Failures are logged, reported on the
//! console, and summarized in the [`RunOutcome`].

use std::io::Write;
use std::path::Path;

use tracing::{error, info, warn};

use pagescrape_browser::{
    BrowserSession, DocumentSource, ReadyCondition, Readiness, StaticDocument, extract, robots,
};
use pagescrape_core::content::ExtractedContent;
use pagescrape_core::csv_store::CsvStore;

use crate::report::Report;
use crate::settings::{ScrapeSettings, Source};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Rows (possibly zero) were written to the output file.
    Saved { rows: usize },
    /// Content was extracted but the file could not be written.
    SaveFailed,
    /// The page could not be loaded or read; nothing was written.
    FetchFailed,
    /// robots.txt forbids the URL; nothing was fetched.
    Disallowed,
}

pub async fn scrape<W: Write>(settings: &ScrapeSettings, report: &mut Report<W>) -> RunOutcome {
    info!(url = %settings.url, output = %settings.output.display(), "Starting scrape");

    if settings.robots.respect {
        match permitted(settings).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(url = %settings.url, "Disallowed by robots.txt");
                report.disallowed(&settings.url);
                return RunOutcome::Disallowed;
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "robots.txt check failed");
                report.error(format_args!("{e:#}"));
                return RunOutcome::FetchFailed;
            }
        }
    }

    let content = match fetch(settings).await {
        Ok(content) => content,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Scrape failed");
            report.error(format_args!("{e:#}"));
            return RunOutcome::FetchFailed;
        }
    };

    persist(content, &settings.output, report)
}

async fn permitted(settings: &ScrapeSettings) -> anyhow::Result<bool> {
    if let Source::HtmlFile(path) = &settings.source {
        info!(path = %path.display(), "Local file, skipping robots.txt");
        return Ok(true);
    }
    let client = reqwest::Client::new();
    robots::can_crawl(&client, &settings.url, &settings.robots.user_agent).await
}

async fn fetch(settings: &ScrapeSettings) -> anyhow::Result<ExtractedContent> {
    let ready = ReadyCondition::from_config(&settings.browser);
    match &settings.source {
        Source::HtmlFile(path) => {
            let document = StaticDocument::from_file(path)?;
            collect(&document, &ready).await
        }
        Source::Live(url) => {
            let session = BrowserSession::launch(&settings.browser).await?;
            let result = fetch_page(&session, url, &ready).await;
            // Released whether or not the fetch worked.
            session.close().await;
            result
        }
    }
}

async fn fetch_page(
    session: &BrowserSession,
    url: &str,
    ready: &ReadyCondition,
) -> anyhow::Result<ExtractedContent> {
    let page = session.open(url).await?;
    if let Some(landed) = page.url().await {
        if landed != url {
            info!(url, landed = %landed, "Redirected");
        }
    }
    collect(&page, ready).await
}

/// Wait for rendered content, then extract it.
pub async fn collect<S>(source: &S, ready: &ReadyCondition) -> anyhow::Result<ExtractedContent>
where
    S: DocumentSource + ?Sized,
{
    match ready.wait(source).await? {
        Readiness::Ready { elapsed } => {
            info!(elapsed_ms = elapsed.as_millis() as u64, "Content rendered");
        }
        Readiness::TimedOut { waited } => {
            warn!(
                waited_ms = waited.as_millis() as u64,
                "Content did not settle before timeout, extracting anyway"
            );
        }
    }
    let content = extract(source).await?;
    info!(items = content.len(), "Extraction finished");
    Ok(content)
}

/// Report the content and write it out, header-only if nothing was found.
pub fn persist<W: Write>(
    content: ExtractedContent,
    output: &Path,
    report: &mut Report<W>,
) -> RunOutcome {
    if content.is_empty() {
        warn!("No titles, subtitles, or paragraphs found");
    }
    report.content(&content);

    let rows = content.into_rows();
    match CsvStore::new(output).save(&rows) {
        Ok(rows) => {
            info!(path = %output.display(), rows, "Data saved");
            report.saved(output);
            RunOutcome::Saved { rows }
        }
        Err(e) => {
            error!(path = %output.display(), error = %e, "Failed to save data");
            report.save_failed(&e);
            RunOutcome::SaveFailed
        }
    }
}
