//! Line patterns: `label: value` pairs and numbers with context words

use crate::number::normalize_number;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `label: value` or `label - value`, with optional currency and a trailing
/// `%` or unit word. The whole line must match.
static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<label>[^:\n]*?[^:\s])\s*(?::|\s[-–]\s)\s*(?P<value>[-+]?[$£€]?\s?[-+]?\d[\d,]*(?:\.\d+)?)\s*(?:%|[A-Za-z]+)?\s*$",
    )
    .expect("key-value pattern is valid")
});

/// `(prefix?)(number)(suffix?)`: context words before a number and at most
/// one word after it.
static WINDOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?P<prefix>[A-Za-z_][A-Za-z0-9_ ]*?)\s*)?(?P<number>[$£€]?\b\d[\d,]*(?:\.\d+)?\b)%?(?:[ \t]*(?P<suffix>[A-Za-z_]+))?",
    )
    .expect("window pattern is valid")
});

/// Parse one line as a key-value pair.
///
/// Returns `None` when the line does not match or its value does not
/// normalize; such lines yield no partial record.
pub(crate) fn key_value(line: &str) -> Option<(String, f64)> {
    let caps = KEY_VALUE.captures(line)?;
    let label = caps.name("label")?.as_str().trim();
    let raw = caps.name("value")?.as_str();

    match normalize_number(raw) {
        Ok(value) => Some((label.to_string(), value)),
        Err(e) => {
            debug!("Skipping key-value line '{}': {}", line, e);
            None
        }
    }
}

/// Scan lines for numbers with surrounding context words.
///
/// The label is the trimmed prefix and suffix joined by a space. A number
/// with no context at all gets `Item{n}`, where `n` is the index of the
/// match within the whole text.
pub(crate) fn windowed<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<(String, f64)> {
    let mut candidates = Vec::new();
    let mut match_index = 0usize;

    for line in lines {
        for caps in WINDOW.captures_iter(line) {
            let n = match_index;
            match_index += 1;

            let Some(number) = caps.name("number") else {
                continue;
            };
            let value = match normalize_number(number.as_str()) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Skipping windowed candidate: {}", e);
                    continue;
                }
            };

            let prefix = caps.name("prefix").map(|m| m.as_str().trim()).unwrap_or("");
            let suffix = caps.name("suffix").map(|m| m.as_str().trim()).unwrap_or("");
            let label = format!("{} {}", prefix, suffix).trim().to_string();
            let label = if label.is_empty() {
                format!("Item{}", n)
            } else {
                label
            };

            candidates.push((label, value));
        }
    }

    candidates
}
