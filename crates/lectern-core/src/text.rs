//! Transcript text utilities: whitespace normalization and token estimation.

/// Collapse whitespace in raw transcript text.
///
/// Carriage returns are dropped, runs of blank lines become a single newline,
/// and runs of horizontal whitespace within a line become a single space.
/// Leading/trailing whitespace is trimmed from each line and from the result.
///
/// Line boundaries are preserved so that heading-like lines in pasted
/// material survive normalization; live speech fragments carry no newlines
/// and collapse to a single clean line.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let lines: Vec<String> = text
        .replace('\r', "")
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n")
}

/// Approximate the token count of a text span for budgeting.
///
/// One token is assumed to cover about three quarters of a word, so the
/// estimate is `ceil(words / 0.75)`. The estimate is monotonic in word
/// count, which is what the chunk packing loop relies on.
#[must_use]
pub fn approximate_tokens(text: &str) -> usize {
    let words = text.split_whitespace().count();
    words.div_ceil(3) + words
}
