//! Waiting for client-side rendering to produce content.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use pagescrape_core::config::BrowserConfig;
use pagescrape_core::content::Category;

use crate::document::DocumentSource;

/// Result of waiting for a page to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Target elements had text and stopped changing for the settle period.
    Ready { elapsed: Duration },
    /// The timeout passed before content appeared and settled.
    TimedOut { waited: Duration },
}

/// What one poll saw: non-blank element count per category and total text length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Snapshot {
    counts: [usize; 3],
    text_len: usize,
}

impl Snapshot {
    fn has_content(&self) -> bool {
        self.counts.iter().any(|&n| n > 0)
    }
}

/// Polls a document until its titles, subtitles, and paragraphs have text
/// and have stopped changing.
#[derive(Debug, Clone, Copy)]
pub struct ReadyCondition {
    timeout: Duration,
    poll_interval: Duration,
    settle: Duration,
}

impl ReadyCondition {
    pub fn new(timeout: Duration, poll_interval: Duration, settle: Duration) -> Self {
        Self {
            timeout,
            // A zero interval would spin.
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            settle,
        }
    }

    pub fn from_config(config: &BrowserConfig) -> Self {
        Self::new(
            Duration::from_millis(config.ready_timeout_ms),
            Duration::from_millis(config.poll_interval_ms),
            Duration::from_millis(config.settle_ms),
        )
    }

    /// Poll until content appears and holds still for the settle period,
    /// or the timeout passes.
    ///
    /// The document is always checked at least once. Timing out is not an
    /// error; source errors are.
    pub async fn wait<S>(&self, source: &S) -> anyhow::Result<Readiness>
    where
        S: DocumentSource + ?Sized,
    {
        let start = Instant::now();
        let mut polls = 0u32;
        let mut last: Option<Snapshot> = None;
        let mut unchanged_since = start;

        loop {
            polls += 1;
            let current = snapshot(source).await?;
            let now = Instant::now();

            if last != Some(current) {
                if last.is_some() {
                    debug!(polls, ?current, "Page content changed");
                }
                last = Some(current);
                unchanged_since = now;
            }

            if current.has_content() && now - unchanged_since >= self.settle {
                let elapsed = start.elapsed();
                debug!(polls, elapsed_ms = elapsed.as_millis() as u64, "Page ready");
                return Ok(Readiness::Ready { elapsed });
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                debug!(polls, ?current, "Readiness timed out");
                return Ok(Readiness::TimedOut { waited: elapsed });
            }

            tokio::time::sleep(self.poll_interval.min(self.timeout - elapsed)).await;
        }
    }
}

async fn snapshot<S>(source: &S) -> anyhow::Result<Snapshot>
where
    S: DocumentSource + ?Sized,
{
    let mut snap = Snapshot::default();
    for (i, category) in Category::ALL.into_iter().enumerate() {
        for text in source.element_texts(category.tag()).await? {
            let text = text.trim();
            if !text.is_empty() {
                snap.counts[i] += 1;
                snap.text_len += text.len();
            }
        }
    }
    Ok(snap)
}
