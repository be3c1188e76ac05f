//! Extracted page content.

use serde::{Deserialize, Serialize};

/// The element categories pulled from a page, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Title,
    Subtitle,
    Paragraph,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Title, Category::Subtitle, Category::Paragraph];

    /// HTML tag the category is read from.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Title => "h1",
            Category::Subtitle => "h2",
            Category::Paragraph => "p",
        }
    }

    /// Label used in console listings.
    pub fn label(self) -> &'static str {
        match self {
            Category::Title => "Title",
            Category::Subtitle => "Subtitle",
            Category::Paragraph => "Paragraph",
        }
    }
}

/// Text extracted from one page, grouped by category.
///
/// Every stored string is trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    titles: Vec<String>,
    subtitles: Vec<String>,
    paragraphs: Vec<String>,
}

impl ExtractedContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw element text. Returns `false` if it was blank and dropped.
    pub fn push(&mut self, category: Category, raw: &str) -> bool {
        let text = raw.trim();
        if text.is_empty() {
            return false;
        }
        self.bucket_mut(category).push(text.to_string());
        true
    }

    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Title => &self.titles,
            Category::Subtitle => &self.subtitles,
            Category::Paragraph => &self.paragraphs,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Title => &mut self.titles,
            Category::Subtitle => &mut self.subtitles,
            Category::Paragraph => &mut self.paragraphs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.subtitles.is_empty() && self.paragraphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.titles.len() + self.subtitles.len() + self.paragraphs.len()
    }

    /// `(category, 1-based index, text)` in output order.
    pub fn labeled(&self) -> impl Iterator<Item = (Category, usize, &str)> + '_ {
        Category::ALL.into_iter().flat_map(move |category| {
            self.get(category)
                .iter()
                .enumerate()
                .map(move |(i, text)| (category, i + 1, text.as_str()))
        })
    }

    /// Titles, then subtitles, then paragraphs.
    pub fn into_rows(self) -> Vec<String> {
        let mut rows = self.titles;
        rows.extend(self.subtitles);
        rows.extend(self.paragraphs);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_trims_and_drops_blank() {
        let mut content = ExtractedContent::new();
        assert!(content.push(Category::Title, "  Hello \n"));
        assert!(!content.push(Category::Title, " \t\n "));
        assert!(!content.push(Category::Paragraph, ""));
        assert_eq!(content.get(Category::Title), ["Hello"]);
        assert_eq!(content.len(), 1);
    }

    #[test]
    fn test_empty() {
        let content = ExtractedContent::new();
        assert!(content.is_empty());
        assert!(content.into_rows().is_empty());
    }

    #[test]
    fn test_rows_follow_category_order() {
        let mut content = ExtractedContent::new();
        // Insert out of order; output order is fixed by category.
        content.push(Category::Paragraph, "p1");
        content.push(Category::Subtitle, "s1");
        content.push(Category::Title, "t1");
        content.push(Category::Paragraph, "p2");
        assert_eq!(content.into_rows(), vec!["t1", "s1", "p1", "p2"]);
    }

    #[test]
    fn test_labeled_indexes_per_category() {
        let mut content = ExtractedContent::new();
        content.push(Category::Title, "a");
        content.push(Category::Paragraph, "b");
        content.push(Category::Paragraph, "c");
        let labeled: Vec<_> = content.labeled().collect();
        assert_eq!(
            labeled,
            vec![
                (Category::Title, 1, "a"),
                (Category::Paragraph, 1, "b"),
                (Category::Paragraph, 2, "c"),
            ]
        );
    }

    #[test]
    fn test_category_tags() {
        let tags: Vec<_> = Category::ALL.iter().map(|c| c.tag()).collect();
        assert_eq!(tags, ["h1", "h2", "p"]);
        assert_eq!(Category::Subtitle.label(), "Subtitle");
    }
}
