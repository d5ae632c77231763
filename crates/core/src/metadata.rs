use crate::Document;

/// Separators that usually split an article headline from the site name.
const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " — ", " – "];

impl Document {
    /// Extract the article title with priority fallback:
    /// 1. JSON-LD `headline`
    /// 2. Open Graph `og:title`
    /// 3. Twitter `twitter:title`
    /// 4. Meta `title` / `DC.title`
    /// 5. `<title>` element
    /// 6. First `<h1>` element
    ///
    /// Whitespace is collapsed and blank candidates are skipped.
    pub fn extract_title(&self) -> Option<String> {
        let candidates: [&dyn Fn() -> Option<String>; 7] = [
            &|| self.json_ld_headline(),
            &|| self.get_meta_content("og:title"),
            &|| self.get_meta_content("twitter:title"),
            &|| self.get_meta_content("title"),
            &|| self.get_meta_content("DC.title"),
            &|| self.title(),
            &|| self.select("h1").ok()?.first().map(|h1| h1.text()),
        ];

        candidates.iter().find_map(|candidate| {
            let value = candidate()?;
            let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
            (!collapsed.is_empty()).then_some(collapsed)
        })
    }

    /// Look up `<meta name=...>` first, then `<meta property=...>`.
    fn get_meta_content(&self, attr: &str) -> Option<String> {
        ["name", "property"].iter().find_map(|key| {
            let selector = format!("meta[{}=\"{}\"]", key, attr);
            let elements = self.select(&selector).ok()?;
            elements.first()?.attr("content").map(str::to_string)
        })
    }

    /// First `headline` found in the page's JSON-LD blocks, looking into arrays and `@graph`.
    fn json_ld_headline(&self) -> Option<String> {
        let scripts = self.select("script[type=\"application/ld+json\"]").ok()?;
        scripts.iter().find_map(|script| {
            let value = serde_json::from_str::<serde_json::Value>(script.text().trim()).ok()?;
            find_headline(&value)
        })
    }
}

fn find_headline(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Array(items) => items.iter().find_map(find_headline),
        serde_json::Value::Object(map) => {
            if let Some(headline) = map.get("headline").and_then(|h| h.as_str()) {
                return Some(headline.to_string());
            }
            map.get("@graph").and_then(find_headline)
        }
        _ => None,
    }
}

/// Strip a trailing site name such as `"Headline | The Paper"`.
///
/// The suffix is only dropped when what remains still has at least three words,
/// so short titles like `"Q&A - Part 2"` survive intact.
pub fn clean_title(title: &str) -> String {
    let title = title.trim();

    for separator in TITLE_SEPARATORS {
        if let Some(idx) = title.rfind(separator) {
            let head = title[..idx].trim();
            if head.split_whitespace().count() >= 3 {
                return head.to_string();
            }
        }
    }

    title.to_string()
}
