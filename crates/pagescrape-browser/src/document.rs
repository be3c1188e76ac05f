//! Sources of rendered document text.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use scraper::{Html, Selector};

/// Something that can be queried for the text of elements by tag name.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Text of every element matching `tag`, in document order. Untrimmed.
    async fn element_texts(&self, tag: &str) -> anyhow::Result<Vec<String>>;
}

/// A document parsed from static HTML.
///
/// Nothing runs client-side, so what you load is what gets extracted.
/// Element text is the raw `textContent`, not the layout-aware `innerText` a
/// live page returns, so `--html-file` output can differ from a live run.
#[derive(Debug, Clone)]
pub struct StaticDocument {
    html: String,
}

impl StaticDocument {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read HTML file {}", path.display()))?;
        Ok(Self::from_html(html))
    }
}

// The parsed tree is not Send, so it lives only inside this synchronous call.
fn texts_in(html: &str, tag: &str) -> anyhow::Result<Vec<String>> {
    let selector =
        Selector::parse(tag).map_err(|e| anyhow::anyhow!("invalid selector '{tag}': {e}"))?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect())
}

#[async_trait]
impl DocumentSource for StaticDocument {
    async fn element_texts(&self, tag: &str) -> anyhow::Result<Vec<String>> {
        texts_in(&self.html, tag)
    }
}

#[cfg(feature = "browser")]
pub use live::BrowserPage;

#[cfg(feature = "browser")]
mod live {
    use anyhow::Context;
    use async_trait::async_trait;
    use chromiumoxide::Page;

    use super::DocumentSource;

    /// A page open in the live browser.
    #[derive(Debug, Clone)]
    pub struct BrowserPage {
        page: Page,
    }

    impl BrowserPage {
        pub(crate) fn new(page: Page) -> Self {
            Self { page }
        }

        /// Current URL, after any redirects.
        pub async fn url(&self) -> Option<String> {
            self.page.url().await.ok().flatten()
        }
    }

    #[async_trait]
    impl DocumentSource for BrowserPage {
        async fn element_texts(&self, tag: &str) -> anyhow::Result<Vec<String>> {
            let elements = self
                .page
                .find_elements(tag)
                .await
                .with_context(|| format!("failed to query <{tag}> elements"))?;

            let mut texts = Vec::with_capacity(elements.len());
            for element in elements {
                let text = element
                    .inner_text()
                    .await
                    .with_context(|| format!("failed to read <{tag}> text"))?;
                texts.push(text.unwrap_or_default());
            }
            Ok(texts)
        }
    }
}
