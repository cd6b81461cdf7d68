use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Structural metadata extracted from a rendered document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Document title, if present and non-empty
    pub title: Option<String>,

    /// Content of `<meta name="description">`
    pub description: Option<String>,

    /// Resolved-or-raw href of `<link rel="canonical">`
    pub canonical: Option<String>,

    /// Text of the h1/h2 headings, in document order
    pub headings: Vec<String>,

    /// Number of anchor elements carrying an href
    pub link_count: usize,
}

/// Extracts structural metadata from serialized DOM content
pub fn extract(html: &str) -> PageMetadata {
    let doc = Html::parse_document(html);

    let title_selector = Selector::parse("title").unwrap();
    let title = doc
        .select(&title_selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let description_selector = Selector::parse(r#"meta[name="description"]"#).unwrap();
    let description = doc
        .select(&description_selector)
        .next()
        .and_then(|e| e.value().attr("content"))
        .map(|s| s.to_string());

    let canonical_selector = Selector::parse(r#"link[rel="canonical"]"#).unwrap();
    let canonical = doc
        .select(&canonical_selector)
        .next()
        .and_then(|e| e.value().attr("href"))
        .map(|s| s.to_string());

    let heading_selector = Selector::parse("h1, h2").unwrap();
    let headings = doc
        .select(&heading_selector)
        .map(|e| {
            e.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|h| !h.is_empty())
        .collect::<Vec<String>>();

    let anchor_selector = Selector::parse("a[href]").unwrap();
    let link_count = doc.select(&anchor_selector).count();

    ::log::debug!(
        "Extracted metadata: title={:?}, {} headings, {} links",
        title,
        headings.len(),
        link_count
    );

    PageMetadata {
        title,
        description,
        canonical,
        headings,
        link_count,
    }
}
