//! Transcript segmentation into embedding-sized spans.
//!
//! Normalized text splits into sections on heading-like boundaries, sections
//! split into sentences on terminal punctuation, and sentences pack greedily
//! into chunks under the token budget. Each new chunk is seeded with the
//! trailing words of its predecessor for local continuity.
//!
//! Guarantees: no chunk exceeds the token budget by more than one sentence's
//! length, overlap never exceeds the configured word count, and
//! empty/whitespace-only chunks are dropped.

use lectern_core::{approximate_tokens, normalize_text};
use regex::Regex;

/// Segment `text` into overlapping, token-bounded chunks.
#[must_use]
pub fn chunk_text(text: &str, max_tokens: usize, overlap_tokens: usize) -> Vec<String> {
    let text = normalize_text(text);
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    for section in split_sections(&text) {
        let mut buffer = String::new();
        let mut token_count = 0;

        for sentence in split_sentences(&section) {
            let tokens = approximate_tokens(&sentence);

            if token_count + tokens > max_tokens && !buffer.trim().is_empty() {
                let emitted = buffer.trim().to_owned();
                let overlap = trailing_words(&emitted, overlap_tokens);
                chunks.push(emitted);

                buffer = format!("{overlap} {sentence}");
                token_count = approximate_tokens(&buffer);
            } else {
                buffer.push(' ');
                buffer.push_str(&sentence);
                token_count += tokens;
            }
        }

        if !buffer.trim().is_empty() {
            chunks.push(buffer.trim().to_owned());
        }
    }
    chunks
}

/// Split on heading-like boundaries: a short capitalized line starting a
/// block. The final line of the input never opens a new section.
fn split_sections(text: &str) -> Vec<String> {
    let heading = Regex::new(r"^[A-Z][^\n]{3,80}$").expect("valid regex");
    let lines: Vec<&str> = text.lines().collect();

    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for (i, line) in lines.iter().copied().enumerate() {
        let opens_section = heading.is_match(line) && i + 1 < lines.len();
        if opens_section && !current.is_empty() {
            sections.push(current.join("\n"));
            current = vec![line];
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sections.push(current.join("\n"));
    }
    sections
}

/// Split a section into sentences after `.`, `?`, or `!` followed by
/// whitespace. The separating whitespace is consumed.
fn split_sentences(section: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = section.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if matches!(ch, '.' | '?' | '!') && chars.peek().is_some_and(|c| c.is_whitespace()) {
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                let _ = chars.next();
            }
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current);
    }
    sentences
}

/// The last `count` whitespace-separated words of `text`.
fn trailing_words(text: &str, count: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words.len().saturating_sub(count);
    words[start..].join(" ")
}
