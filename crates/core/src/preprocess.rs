//! Boilerplate removal before scoring.
//!
//! Runs a handful of `lol_html` streaming rewrites over the raw page so that the
//! scorer only ever sees markup that could plausibly be article content.

use std::borrow::Cow;
use std::sync::LazyLock;

use lol_html::{ElementContentHandlers, HtmlRewriter, Selector, Settings, element};
use regex::Regex;

/// Tags whose whole subtree never carries readable text.
const UNWANTED_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "canvas", "template"];

/// Page chrome that sits outside the article body on virtually every site.
const CHROME_TAGS: &[&str] = &["nav", "footer", "aside", "button", "select", "dialog"];

/// Tags that are never dropped by the unlikely-candidate pass.
const PROTECTED_TAGS: &[&str] = &["html", "body", "article", "main"];

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

pub(crate) static UNLIKELY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|cookie|disqus|extra|foot|header|menu|newsletter|related|remark|rss|share|shoutbox|sidebar|skyscraper|social|sponsor|subscribe|ad-break|agegate|pagination|pager|popup|promo)",
    )
    .unwrap()
});

pub(crate) static POSITIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story|tweet)").unwrap()
});

static HIDDEN_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").unwrap());

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Remove script, style, noscript, iframe, svg, canvas and template subtrees
    pub remove_unwanted: bool,
    /// Remove nav, footer, aside, dialogs and form controls
    pub remove_chrome: bool,
    /// Remove elements whose class/id looks like navigation, ads or comments
    pub remove_unlikely: bool,
    /// Keep unlikely-looking elements whose class/id also matches a content pattern
    pub keep_positive: bool,
    /// Remove elements hidden by inline style, `hidden` or `aria-hidden`
    pub remove_hidden: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { remove_unwanted: true, remove_chrome: true, remove_unlikely: true, keep_positive: true, remove_hidden: true }
    }
}

/// Preprocess HTML by removing unwanted elements.
///
/// Every pass degrades to returning its input unchanged when the rewriter
/// rejects the document, so this never fails.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let mut processed = COMMENT_RE.replace_all(html, "").into_owned();

    let mut removed: Vec<&str> = Vec::new();
    if config.remove_unwanted {
        removed.extend_from_slice(UNWANTED_TAGS);
    }
    if config.remove_chrome {
        removed.extend_from_slice(CHROME_TAGS);
    }
    if !removed.is_empty() {
        processed = remove_tags(&processed, &removed);
    }

    if config.remove_hidden {
        processed = remove_hidden_elements(&processed);
    }

    if config.remove_unlikely {
        processed = remove_unlikely_candidates(&processed, config.keep_positive);
    }

    processed
}

type Handlers<'h> = Vec<(Cow<'h, Selector>, ElementContentHandlers<'h>)>;

/// Stream `html` through a rewriter with the given handlers.
fn rewrite(html: &str, handlers: Handlers<'_>) -> String {
    let mut output: Vec<u8> = Vec::with_capacity(html.len());
    let mut rewriter = HtmlRewriter::new(
        Settings { element_content_handlers: handlers, ..Default::default() },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );

    let written = rewriter.write(html.as_bytes()).and_then(|()| rewriter.end());
    if written.is_err() {
        tracing::warn!("html rewriter rejected document, skipping pass");
        return html.to_string();
    }

    match String::from_utf8(output) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Remove every element with one of the given tag names, content included.
fn remove_tags(html: &str, tags: &[&str]) -> String {
    let handlers = tags
        .iter()
        .copied()
        .map(|tag| {
            element!(tag, |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();
    rewrite(html, handlers)
}

/// Remove elements with display:none or visibility:hidden styles, or hidden attributes
fn remove_hidden_elements(html: &str) -> String {
    rewrite(
        html,
        vec![element!("*", |el| {
            let styled_hidden = el.get_attribute("style").is_some_and(|style| HIDDEN_STYLE_RE.is_match(&style));
            let attr_hidden = el.has_attribute("hidden")
                || el.get_attribute("aria-hidden").is_some_and(|value| value.eq_ignore_ascii_case("true"));
            if styled_hidden || attr_hidden {
                el.remove();
            }
            Ok(())
        })],
    )
}

/// Remove elements that match unlikely candidate patterns
fn remove_unlikely_candidates(html: &str, keep_positive: bool) -> String {
    let looks_unlikely = move |value: &str| {
        UNLIKELY_RE.is_match(value) && (!keep_positive || !POSITIVE_RE.is_match(value))
    };

    rewrite(
        html,
        vec![element!("*", |el| {
            if PROTECTED_TAGS.contains(&el.tag_name().as_str()) {
                return Ok(());
            }

            let id_unlikely = el.get_attribute("id").is_some_and(|id| looks_unlikely(&id));
            let class_unlikely = el
                .get_attribute("class")
                .is_some_and(|class| class.split_whitespace().any(|name| looks_unlikely(name)));

            if id_unlikely || class_unlikely {
                el.remove();
            }
            Ok(())
        })],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_unwanted_tags() {
        let html = r#"
            <html>
                <head><script>alert('test');</script><style>body{color:red;}</style></head>
                <body>
                    <noscript>Enable JavaScript</noscript>
                    <iframe src="https://example.com"></iframe>
                    <svg><rect width="100" height="100"/></svg>
                    <canvas id="chart"></canvas>
                    <p>Content</p>
                </body>
            </html>
        "#;

        let result = remove_tags(html, UNWANTED_TAGS);
        assert!(!result.contains("alert"));
        assert!(!result.contains("color:red"));
        assert!(!result.contains("Enable JavaScript"));
        assert!(!result.contains("<iframe"));
        assert!(!result.contains("rect"));
        assert!(!result.contains("chart"));
        assert!(result.contains("<p>Content</p>"));
    }

    #[test]
    fn test_remove_chrome_tags() {
        let html = r#"<body><nav>Home | World</nav><article><p>Story</p></article><footer>(c) Paper</footer></body>"#;
        let result = remove_tags(html, CHROME_TAGS);
        assert!(!result.contains("Home | World"));
        assert!(!result.contains("(c) Paper"));
        assert!(result.contains("Story"));
    }

    #[test]
    fn test_remove_unlikely_candidates() {
        let html = r#"
            <html>
                <body>
                    <div id="sidebar">Sidebar content</div>
                    <div id="main-content">Main content</div>
                    <div class="banner-ad">Ad</div>
                    <div class="article">Article content</div>
                </body>
            </html>
        "#;

        let result = remove_unlikely_candidates(html, true);
        assert!(!result.contains("Sidebar content"));
        assert!(!result.contains("banner-ad"));
        assert!(result.contains("Main content"));
        assert!(result.contains("Article content"));
    }

    #[test]
    fn test_unlikely_without_keep_positive() {
        let html = r#"<body><div class="comment-body">Reader comment</div><p>Kept</p></body>"#;

        assert!(remove_unlikely_candidates(html, true).contains("Reader comment"));
        assert!(!remove_unlikely_candidates(html, false).contains("Reader comment"));
    }

    #[test]
    fn test_protected_tags_survive() {
        let html = r#"<html><body class="page-header-fixed"><article class="share-wrapper"><p>Text</p></article></body></html>"#;
        let result = remove_unlikely_candidates(html, false);
        assert!(result.contains("Text"));
    }

    #[test]
    fn test_remove_hidden_elements() {
        let html = r#"
            <html>
                <body>
                    <div style="display:none">Hidden content</div>
                    <div style="visibility: hidden">Invisible content</div>
                    <div hidden>Attribute hidden</div>
                    <div aria-hidden="true">Aria hidden</div>
                    <div>Visible content</div>
                </body>
            </html>
        "#;

        let result = remove_hidden_elements(html);
        assert!(!result.contains("Hidden content"));
        assert!(!result.contains("Invisible content"));
        assert!(!result.contains("Attribute hidden"));
        assert!(!result.contains("Aria hidden"));
        assert!(result.contains("Visible content"));
    }

    #[test]
    fn test_multibyte_text_survives_rewrite() {
        let html = "<p>Café — naïve 日本語</p>".repeat(200);
        let result = remove_tags(&html, UNWANTED_TAGS);
        assert_eq!(result, html);
    }

    #[test]
    fn test_preprocess_full_pipeline() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script>console.log('test');</script>
                <style>.hidden{display:none;}</style>
                <!-- Comment
                     spanning lines -->
            </head>
            <body>
                <div id="sidebar" class="menu">
                    <p>Sidebar</p>
                </div>
                <div id="main" class="article">
                    <p style="display:none">Hidden</p>
                    <p>Content</p>
                </div>
            </body>
            </html>
        "#;

        let result = preprocess_html(html, &PreprocessConfig::default());

        assert!(!result.contains("<script"));
        assert!(!result.contains("<style"));
        assert!(!result.contains("<!--"));
        assert!(!result.contains("Sidebar"));
        assert!(!result.contains("Hidden"));
        assert!(result.contains("Content"));
    }

    #[test]
    fn test_preprocess_disabled_passes() {
        let html = r#"<body><nav>Menu</nav><p>Body</p></body>"#;
        let config = PreprocessConfig { remove_chrome: false, ..Default::default() };
        assert!(preprocess_html(html, &config).contains("Menu"));
    }
}
