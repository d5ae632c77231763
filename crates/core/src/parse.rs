//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types used by the
//! extractor: CSS selection, text access and parent/child navigation over a
//! `scraper` tree.
//!
//! # Example
//!
//! ```rust
//! use glossa_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use std::fmt;
use std::hash::Hash;

use scraper::{ElementRef, Html, Node, Selector};

use crate::ExtractionError;
use crate::preprocess::{self, PreprocessConfig};

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string without preprocessing.
    ///
    /// html5ever recovers from any malformed input, so this never fails.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses HTML after running the boilerplate-removal preprocessor.
    pub fn parse_with_preprocessing(html: &str, config: &PreprocessConfig) -> Self {
        let cleaned = preprocess::preprocess_html(html, config);
        Self::parse(&cleaned)
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::HtmlParse`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>, ExtractionError> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(Element::new).collect())
    }

    /// Gets the content of the `<title>` element, if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }
}

/// A thin wrapper around scraper's `ElementRef`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Stable identity of this element within its document, usable as a map key.
    pub fn node_id(&self) -> impl Copy + Eq + Hash + fmt::Debug + use<'a> {
        (*self.element).id()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Number of characters of text inside this element, ignoring surrounding whitespace.
    pub fn text_len(&self) -> usize {
        self.text().trim().chars().count()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// The nearest ancestor that is an element.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element
            .ancestors()
            .find_map(ElementRef::wrap)
            .map(Element::new)
    }

    /// Element ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element.ancestors().filter_map(ElementRef::wrap).map(Element::new)
    }

    /// Direct element children in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element.children().filter_map(ElementRef::wrap).map(Element::new)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::HtmlParse`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>, ExtractionError> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(Element::new).collect())
    }

    /// Raw child nodes, for walkers that need text and element nodes interleaved.
    pub(crate) fn children(&self) -> impl Iterator<Item = Child<'a>> + use<'a> {
        self.element.children().filter_map(|node| match node.value() {
            Node::Text(text) => Some(Child::Text(&**text)),
            Node::Element(_) => ElementRef::wrap(node).map(|el| Child::Element(Element::new(el))),
            _ => None,
        })
    }
}

/// A child node as seen by text walkers.
pub(crate) enum Child<'a> {
    Text(&'a str),
    Element(Element<'a>),
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::HtmlParse(format!("Invalid selector: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <h1>Heading</h1>
            <div id="wrap"><p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p></div>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("a").unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].attr("href"), Some("https://example.com"));
        assert_eq!(elements[0].tag_name(), "a");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(ExtractionError::HtmlParse(_))));
    }

    #[test]
    fn test_parent_and_ancestors() {
        let doc = Document::parse(SAMPLE_HTML);
        let p = doc.select("p").unwrap()[0];

        let parent = p.parent().unwrap();
        assert_eq!(parent.attr("id"), Some("wrap"));

        let tags: Vec<String> = p.ancestors().map(|a| a.tag_name()).collect();
        assert_eq!(tags, vec!["div", "body", "html"]);
    }

    #[test]
    fn test_child_elements_in_order() {
        let doc = Document::parse(SAMPLE_HTML);
        let wrap = doc.select("#wrap").unwrap()[0];
        let texts: Vec<String> = wrap.child_elements().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["Paragraph 1", "Paragraph 2"]);
    }

    #[test]
    fn test_node_ids_distinguish_equal_markup() {
        let doc = Document::parse("<p>same</p><p>same</p>");
        let ps = doc.select("p").unwrap();
        assert_eq!(ps[0].text(), ps[1].text());
        assert_ne!(ps[0].node_id(), ps[1].node_id());
    }
}
