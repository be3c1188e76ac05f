//! Console report of a scrape run.

use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use pagescrape_core::content::ExtractedContent;

pub const NO_CONTENT: &str = "No important content found. The HTML structure might have changed.";

/// Writes the user-facing lines of a run. Write failures are logged and ignored.
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}") {
            debug!(error = %e, "Console write failed");
        }
    }

    /// List every item as `<Label> <n>: <text>`, or the notice when empty.
    pub fn content(&mut self, content: &ExtractedContent) {
        if content.is_empty() {
            self.line(NO_CONTENT);
            return;
        }
        self.line("Extracted Content:");
        for (category, index, text) in content.labeled() {
            self.line(format_args!("{} {index}: {text}", category.label()));
        }
    }

    pub fn saved(&mut self, path: &Path) {
        self.line(format_args!("Data saved to {}", path.display()));
    }

    pub fn save_failed(&mut self, err: impl Display) {
        self.line(format_args!("Failed to save data: {err}"));
    }

    pub fn error(&mut self, err: impl Display) {
        self.line(format_args!("An error occurred: {err}"));
    }

    pub fn disallowed(&mut self, url: &str) {
        self.line(format_args!("Crawling {url} is disallowed by robots.txt"));
    }
}
