//! Prompt text and answer unwrapping for lookups.

use serde::Deserialize;

use super::WordMeaning;
use crate::LookupError;

pub const WORD_SYSTEM_PROMPT: &str = "You are an English-Japanese dictionary for Japanese learners of English. \
Explain the meaning of an English word as it is used in the given sentence. \
Answer with a single JSON object with the keys \"meaning\" (the meaning in Japanese), \
\"pos\" (the part of speech in Japanese) and \"example\" (a short English example sentence using the word in the same sense). \
Do not add any other text.";

pub const TRANSLATE_SYSTEM_PROMPT: &str = "You are a professional English-to-Japanese translator. \
Translate the given English sentence into natural Japanese. \
Answer with the translation only, without quotes, notes or romanization.";

pub(crate) fn word_prompt(word: &str, context: &str) -> String {
    format!("Word: {}\nSentence: {}", word, context)
}

pub(crate) fn translate_prompt(sentence: &str) -> String {
    format!("Sentence: {}", sentence)
}

/// Remove a surrounding Markdown code fence such as ```` ```json ... ``` ````.
fn strip_code_fences(answer: &str) -> &str {
    let trimmed = answer.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string, which only exists when the fence spans several lines.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// The outermost `{ ... }` span of `text`, if any.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Read a [`WordMeaning`] out of a model answer.
///
/// Tolerates code fences and chatter around the JSON object; all three fields
/// must be present as strings.
pub fn parse_word_meaning(answer: &str) -> Result<WordMeaning, LookupError> {
    let unfenced = strip_code_fences(answer);
    let object = outermost_object(unfenced)
        .ok_or_else(|| LookupError::Parse(format!("no JSON object in answer: {}", preview(answer))))?;

    serde_json::from_str(object).map_err(|e| LookupError::Parse(format!("{}: {}", e, preview(answer))))
}

#[derive(Deserialize)]
struct TranslationAnswer {
    translation: String,
}

/// Read a translation out of a model answer.
///
/// Accepts `{ "translation": "..." }` or plain text; blank answers are rejected.
pub fn parse_translation(answer: &str) -> Result<String, LookupError> {
    let unfenced = strip_code_fences(answer);

    let text = match outermost_object(unfenced).map(serde_json::from_str::<TranslationAnswer>) {
        Some(Ok(parsed)) => parsed.translation,
        _ => unfenced.to_string(),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(LookupError::Parse("empty translation".to_string()));
    }
    Ok(text.to_string())
}

fn preview(answer: &str) -> String {
    answer.chars().take(120).collect()
}
