//! Readability scoring for candidate containers and paragraphs.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::Element;
use crate::preprocess::POSITIVE_RE;

/// Class and id fragments typical of page chrome around a news story.
static NEGATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|byline|caption|masthead|meta|outbrain|promo|shopping|tags|widget)",
    )
    .unwrap()
});

/// Weights and caps of the container score.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Added when the id or a class looks like article content.
    pub positive_weight: f64,
    /// Added when the id or a class looks like chrome.
    pub negative_weight: f64,
    /// Cap on the length part of the density score.
    pub max_char_density_score: f64,
    /// Cap on the comma part of the density score.
    pub max_comma_density_score: f64,
    /// Collapsed characters worth one length point.
    pub chars_per_point: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            positive_weight: 25.0,
            negative_weight: -25.0,
            max_char_density_score: 3.0,
            max_comma_density_score: 3.0,
            chars_per_point: 100,
        }
    }
}

/// Breakdown of one container's score, kept for logging and tests.
#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub tag_name: String,
    pub base_score: f64,
    pub class_weight: f64,
    pub content_density: f64,
    /// Share of the text inside links, between 0 and 1.
    pub link_density: f64,
    pub final_score: f64,
}

/// Score an element earns from its tag alone.
///
/// - ARTICLE: +10, MAIN: +10
/// - SECTION: +8
/// - DIV: +5
/// - TD, BLOCKQUOTE: +3
/// - PRE: 0
/// - FORM, ADDRESS and list elements: -3
/// - H1-H6, TH, HEADER, FOOTER, NAV: -5
pub fn base_tag_score(element: &Element<'_>) -> f64 {
    match element.tag_name().as_str() {
        "article" | "main" => 10.0,
        "section" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" => 3.0,
        "pre" => 0.0,
        "form" => -3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

/// Positive or negative weight from the first id or class value that matches a pattern.
///
/// The id is checked before the class list, and a positive match wins over a
/// negative one within the same value.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let values = element
        .attr("id")
        .into_iter()
        .chain(element.attr("class").into_iter().flat_map(str::split_whitespace));

    for value in values {
        if POSITIVE_RE.is_match(value) {
            return config.positive_weight;
        }
        if NEGATIVE_RE.is_match(value) {
            return config.negative_weight;
        }
    }

    0.0
}

/// Number of visible characters once whitespace runs are collapsed.
pub fn normalized_len(text: &str) -> usize {
    text.split_whitespace().map(|word| word.chars().count() + 1).sum::<usize>().saturating_sub(1)
}

/// Content density: one point per `chars_per_point` characters plus one per comma, each capped.
fn density_of(text: &str, config: &ScoreConfig) -> f64 {
    let char_score = ((normalized_len(text) / config.chars_per_point) as f64).min(config.max_char_density_score);
    let comma_score = (text.matches(',').count() as f64).min(config.max_comma_density_score);
    char_score + comma_score
}

/// Collapsed link text over collapsed element text, capped at 1.
pub fn link_density(element: &Element<'_>) -> f64 {
    let text_length = normalized_len(&element.text());
    if text_length == 0 {
        return 0.0;
    }

    let link_text_length: usize = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| normalized_len(&link.text()))
        .sum();

    (link_text_length as f64 / text_length as f64).min(1.0)
}

/// Score a paragraph contributes to its ancestors: one point for existing,
/// one per comma, and one per hundred characters up to three.
pub fn paragraph_score(text: &str, config: &ScoreConfig) -> f64 {
    let commas = text.matches(',').count() as f64;
    let length_points = ((normalized_len(text) / config.chars_per_point) as f64).min(config.max_char_density_score);
    1.0 + commas + length_points
}

/// Heuristic for `<pre>` blocks full of punctuation and short of spaces.
fn looks_like_code(text: &str) -> bool {
    let len = text.len();
    if len <= 50 {
        return false;
    }
    let comma_ratio = text.matches(',').count() as f64 / len as f64;
    let space_ratio = text.matches(' ').count() as f64 / len as f64;
    let special_ratio =
        text.chars().filter(|c| !c.is_alphanumeric() && !c.is_whitespace()).count() as f64 / len as f64;

    special_ratio > 0.15 && comma_ratio < 0.01 && space_ratio < 0.15
}

/// Full container score.
///
/// `(base + class weight + content density + code penalty) * link penalty`, where the
/// link penalty is `1 - density`, halved for positively named or text-heavy (>500 chars)
/// elements.
pub fn calculate_score(element: &Element<'_>, config: &ScoreConfig) -> ScoreResult {
    let tag_name = element.tag_name();
    let text = element.text();

    let base_score = base_tag_score(element);
    let class_weight = class_id_weight(element, config);
    let content_density = density_of(&text, config);
    let ld = link_density(element);

    let code_penalty = if tag_name == "pre" && looks_like_code(&text) { -10.0 } else { 0.0 };
    let lenient = class_weight > 0.0 || normalized_len(&text) > 500;
    let link_penalty = if lenient { 1.0 - ld * 0.5 } else { 1.0 - ld };

    let final_score = (base_score + class_weight + content_density + code_penalty) * link_penalty;

    ScoreResult { tag_name, base_score, class_weight, content_density, link_density: ld, final_score }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;

    fn first<'a>(doc: &'a Document, selector: &str) -> Element<'a> {
        doc.select(selector).unwrap().into_iter().next().unwrap()
    }

    #[test]
    fn test_base_tag_scores() {
        let doc = Document::parse(
            r#"<article>a</article><main>m</main><section>s</section><div>d</div>
               <table><tr><td>Cell</td></tr></table><pre>Code</pre><blockquote>Quote</blockquote>"#,
        );
        assert_eq!(base_tag_score(&first(&doc, "article")), 10.0);
        assert_eq!(base_tag_score(&first(&doc, "main")), 10.0);
        assert_eq!(base_tag_score(&first(&doc, "section")), 8.0);
        assert_eq!(base_tag_score(&first(&doc, "div")), 5.0);
        assert_eq!(base_tag_score(&first(&doc, "td")), 3.0);
        assert_eq!(base_tag_score(&first(&doc, "blockquote")), 3.0);
        assert_eq!(base_tag_score(&first(&doc, "pre")), 0.0);
    }

    #[test]
    fn test_base_tag_score_negative_elements() {
        let doc = Document::parse(r#"<form>Form</form><nav>Nav</nav><header>Header</header><ul><li>x</li></ul>"#);
        assert_eq!(base_tag_score(&first(&doc, "form")), -3.0);
        assert_eq!(base_tag_score(&first(&doc, "li")), -3.0);
        assert_eq!(base_tag_score(&first(&doc, "nav")), -5.0);
        assert_eq!(base_tag_score(&first(&doc, "header")), -5.0);
    }

    #[test]
    fn test_class_weight() {
        let config = ScoreConfig::default();
        let doc = Document::parse(
            r#"<div id="a" class="article-content">x</div>
               <div id="b" class="sidebar">x</div>
               <div id="main-content">x</div>
               <div id="c" class="container">x</div>
               <div id="main-article" class="sidebar">x</div>"#,
        );
        assert_eq!(class_id_weight(&first(&doc, "div.article-content"), &config), 25.0);
        assert_eq!(class_id_weight(&first(&doc, "#b"), &config), -25.0);
        assert_eq!(class_id_weight(&first(&doc, "#main-content"), &config), 25.0);
        assert_eq!(class_id_weight(&first(&doc, "#c"), &config), 0.0);
        assert_eq!(class_id_weight(&first(&doc, "#main-article"), &config), 25.0);
    }

    #[test]
    fn test_normalized_len_collapses_whitespace() {
        assert_eq!(normalized_len("  a \n\n  b  "), 3);
        assert_eq!(normalized_len(""), 0);
        assert_eq!(normalized_len("日本 語"), 4);
    }

    #[test]
    fn test_content_density() {
        let config = ScoreConfig::default();
        assert_eq!(density_of("Short text here.", &config), 0.0);
        assert_eq!(
            density_of("Text with commas, more commas, even more commas, and additional commas here.", &config),
            3.0
        );
        assert_eq!(density_of(&"a".repeat(500), &config), 3.0);
    }

    #[test]
    fn test_link_density() {
        let doc = Document::parse(
            r##"<div id="none">Text content without any links.</div>
                <div id="all"><a href="#">Link text</a></div>
                <div id="mixed">Some text <a href="#">link</a> more text</div>"##,
        );
        assert_eq!(link_density(&first(&doc, "#none")), 0.0);
        assert_eq!(link_density(&first(&doc, "#all")), 1.0);
        let mixed = link_density(&first(&doc, "#mixed"));
        assert!(mixed > 0.0 && mixed < 1.0);
    }

    #[test]
    fn test_paragraph_score() {
        let config = ScoreConfig::default();
        assert_eq!(paragraph_score("Short.", &config), 1.0);
        assert_eq!(paragraph_score("One, two, three.", &config), 3.0);
        assert_eq!(paragraph_score(&"word ".repeat(100), &config), 4.0);
    }

    #[test]
    fn test_code_detection() {
        assert!(looks_like_code("let_x=vec![1;2];let_y=&x[..];assert!(x.len()>1);//////////"));
        assert!(!looks_like_code("A perfectly ordinary sentence, written in prose, that is long enough."));
    }

    #[test]
    fn test_calculate_score_story_body() {
        let doc = Document::parse(
            r##"<div class="story-body" id="story">
            The council met on Tuesday, after months of delay, to vote on the riverside park, which residents have asked for since 2019.
            <a href="/local">More local news</a>
            The mayor said the budget was sound, the plans were final, and construction would begin in the spring, weather permitting.
        </div>"##,
        );
        let result = calculate_score(&first(&doc, "div"), &ScoreConfig::default());

        assert_eq!(result.tag_name, "div");
        assert_eq!(result.base_score, 5.0);
        assert_eq!(result.class_weight, 25.0);
        assert_eq!(result.content_density, 5.0);
        assert!(result.link_density > 0.0 && result.link_density < 0.1);
        assert!(result.final_score > 30.0);
    }

    #[test]
    fn test_calculate_score_nav_penalized() {
        let doc = Document::parse(
            r##"<nav class="menu"><a href="#">Link 1</a> <a href="#">Link 2</a> <a href="#">Link 3</a></nav>"##,
        );
        let result = calculate_score(&first(&doc, "nav"), &ScoreConfig::default());
        assert_eq!(result.base_score, -5.0);
        assert_eq!(result.class_weight, -25.0);
        assert!(result.link_density > 0.2);
        assert!(result.final_score <= 0.0);
    }

    #[test]
    fn test_calculate_score_empty_div() {
        let doc = Document::parse(r#"<div class="sidebar"></div>"#);
        let result = calculate_score(&first(&doc, "div"), &ScoreConfig::default());
        assert_eq!(result.content_density, 0.0);
        assert_eq!(result.final_score, -20.0);
    }
}
