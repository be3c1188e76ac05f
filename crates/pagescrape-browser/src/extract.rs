//! Text extraction from a rendered document.

use anyhow::Context;
use tracing::debug;

use pagescrape_core::content::{Category, ExtractedContent};

use crate::document::DocumentSource;

/// Pull trimmed, non-empty text for every category, in category order.
///
/// A failed query aborts the whole extraction.
pub async fn extract<S>(source: &S) -> anyhow::Result<ExtractedContent>
where
    S: DocumentSource + ?Sized,
{
    let mut content = ExtractedContent::new();

    for category in Category::ALL {
        let tag = category.tag();
        let texts = source
            .element_texts(tag)
            .await
            .with_context(|| format!("failed to extract <{tag}> elements"))?;

        let mut kept = 0;
        for text in &texts {
            if content.push(category, text) {
                kept += 1;
            }
        }
        debug!(tag, found = texts.len(), kept, "Extracted category");
    }

    Ok(content)
}
