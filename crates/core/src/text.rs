//! Plain-text rendering of the selected content elements.
//!
//! Walks the chosen elements in document order and turns every block-level
//! element into one paragraph. Inline markup contributes its text to the
//! enclosing block, so `<p>A <em>quick</em> fox</p>` yields `"A quick fox"`.

use crate::parse::{Child, Element};

const BLOCK_ELEMENTS: [&str; 30] = [
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "ul",
    "ol",
    "dl",
    "dt",
    "dd",
    "blockquote",
    "pre",
    "table",
    "tr",
    "td",
    "th",
    "article",
    "section",
    "main",
    "header",
    "figure",
    "figcaption",
    "address",
    "details",
    "summary",
    "hr",
];

const HEADING_ELEMENTS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Subtrees that never contribute text, even if preprocessing was skipped.
const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Text accumulated for the block currently being walked.
#[derive(Default)]
struct Block {
    text: String,
    link_chars: usize,
}

struct Collector {
    title: String,
    max_link_density: f64,
    block: Block,
    paragraphs: Vec<String>,
}

/// Pending work for the tree walk.
enum Frame<'a> {
    Enter(Element<'a>, bool),
    Text(&'a str, bool),
    /// A block element closed; its text is complete.
    Close,
}

/// Render `elements` as plain-text paragraphs.
///
/// Whitespace inside a paragraph collapses to single spaces. A block whose
/// visible text is mostly link text (more than `max_link_density`) is dropped,
/// as is a heading that repeats `title`.
pub fn block_paragraphs(elements: &[Element<'_>], title: &str, max_link_density: f64) -> Vec<String> {
    let mut collector = Collector {
        title: collapse_whitespace(title).to_lowercase(),
        max_link_density,
        block: Block::default(),
        paragraphs: Vec::new(),
    };

    for element in elements {
        collector.walk(*element);
        collector.flush();
    }

    collector.paragraphs
}

impl Collector {
    /// Depth-first walk over an explicit stack of frames.
    fn walk(&mut self, root: Element<'_>) {
        let mut stack = vec![Frame::Enter(root, false)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Text(text, in_link) => self.push_text(text, in_link),
                Frame::Close => self.flush(),
                Frame::Enter(element, in_link) => {
                    let tag = element.tag_name();
                    let tag = tag.as_str();

                    if SKIPPED_ELEMENTS.contains(&tag) {
                        continue;
                    }
                    if tag == "br" {
                        self.block.text.push(' ');
                        continue;
                    }

                    if BLOCK_ELEMENTS.contains(&tag) {
                        self.flush();
                        if HEADING_ELEMENTS.contains(&tag) && self.repeats_title(&element) {
                            tracing::trace!("dropping heading that repeats the title");
                            continue;
                        }
                        stack.push(Frame::Close);
                    }

                    let in_link = in_link || tag == "a";
                    let children: Vec<Child<'_>> = element.children().collect();
                    stack.extend(children.into_iter().rev().map(|child| match child {
                        Child::Text(text) => Frame::Text(text, in_link),
                        Child::Element(child) => Frame::Enter(child, in_link),
                    }));
                }
            }
        }
    }

    fn push_text(&mut self, text: &str, in_link: bool) {
        if in_link {
            self.block.link_chars += visible_chars(text);
        }
        self.block.text.push_str(text);
    }

    fn repeats_title(&self, heading: &Element<'_>) -> bool {
        !self.title.is_empty() && collapse_whitespace(&heading.text()).to_lowercase() == self.title
    }

    fn flush(&mut self) {
        let block = std::mem::take(&mut self.block);
        let text = collapse_whitespace(&block.text);
        if text.is_empty() {
            return;
        }

        let density = block.link_chars as f64 / visible_chars(&text) as f64;
        if density > self.max_link_density {
            tracing::trace!(density, "dropping link-heavy block");
            return;
        }

        self.paragraphs.push(text);
    }
}

fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
