//! HTML content extraction
//!
//! Plain-text cleaning for the page path, boilerplate-stripped article
//! extraction for the search path, and favicon discovery.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text is never page content
const NOISE_TAGS: &[&str] = &["script", "style", "noscript"];

/// Extract the visible text of a whole page
///
/// Walks the DOM, skipping script/style/noscript subtrees, and joins the
/// remaining text segments with newlines.
pub fn clean_page_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = match Selector::parse("body") {
        Ok(selector) => document
            .select(&selector)
            .next()
            .unwrap_or_else(|| document.root_element()),
        Err(_) => document.root_element(),
    };

    let mut segments = Vec::new();
    collect_text(root, &mut segments);
    segments.join("\n")
}

fn collect_text(element: ElementRef, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if NOISE_TAGS.contains(&child_element.value().name()) {
                continue;
            }
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
    }
}

/// Resolve the page's icon reference
///
/// Scans `<link rel>` metadata for an icon-typed relation first; falls
/// back to the conventional `/favicon.ico` at the page origin without
/// verifying it resolves. Returns None only when the page URL itself
/// cannot be parsed.
pub fn find_favicon(html: &str, page_url: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    let document = Html::parse_document(html);

    if let Ok(selector) = Selector::parse("link[rel]") {
        for link in document.select(&selector) {
            let rel = link.value().attr("rel").unwrap_or_default();
            if !rel.to_lowercase().contains("icon") {
                continue;
            }
            if let Some(href) = link.value().attr("href") {
                if let Ok(resolved) = base.join(href) {
                    return Some(resolved.to_string());
                }
            }
        }
    }

    base.join("/favicon.ico").ok().map(|u| u.to_string())
}

/// Extract the main article content, truncated to `max_tokens` words
///
/// Tries semantic containers first (`article`, `main`, `[role='main']`),
/// then common content class names, then falls back to `<body>`.
/// Returns None when nothing meaningful could be extracted, which the
/// caller treats as a failure distinct from a network error.
pub fn extract_article(html: &str, max_tokens: usize) -> Option<String> {
    let document = Html::parse_document(html);

    let selectors = [
        "article",
        "main",
        "[role='main']",
        ".post-content",
        ".article-content",
        ".entry-content",
        ".story-body",
        ".article__body",
        ".content-body",
        "#article-body",
        "#content",
        ".prose",
    ];

    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let mut segments = Vec::new();
                collect_text(element, &mut segments);
                let text = segments.join(" ");
                if text.len() > 200 {
                    return Some(truncate_words(&text, max_tokens));
                }
            }
        }
    }

    // Fallback: whole body with noise removed
    let text = clean_page_text(html).split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(truncate_words(&text, max_tokens))
    }
}

/// Truncate to at most `max_tokens` whitespace-delimited words
pub fn truncate_words(text: &str, max_tokens: usize) -> String {
    text.split_whitespace()
        .take(max_tokens)
        .collect::<Vec<_>>()
        .join(" ")
}
