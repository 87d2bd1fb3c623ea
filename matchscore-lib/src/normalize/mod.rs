//! Text cleanup applied to every document before chunking
//!
//! Extracted PDF text is noisy: contact links, bullet glyphs, box-drawing
//! characters and ragged whitespace. None of it helps the embedding model, so
//! it is stripped down to letters, digits and a small punctuation set.
//!
//! ```ignore
//! use matchscore_lib::normalize::normalize;
//!
//! let cleaned = normalize("• Rust  developer – see https://example.com/cv");
//! assert_eq!(cleaned, "Rust developer see");
//! ```

use std::sync::OnceLock;

use regex::Regex;

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://\S+|www\.\S+").expect("link pattern is valid"))
}

fn noise_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-zA-Z0-9.,()!?+\s-]").expect("noise pattern is valid"))
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Remove `http(s)://` URLs and bare `www.` domains.
///
/// Everything up to the next whitespace character is treated as part of the link.
pub fn remove_links(text: &str) -> String {
    link_pattern().replace_all(text, "").into_owned()
}

/// Normalize raw document text.
///
/// Links are removed first, then every character outside
/// `[a-zA-Z0-9.,()!?+-]` and whitespace, and finally whitespace runs are
/// collapsed to a single space and the result is trimmed.
pub fn normalize(text: &str) -> String {
    let text = remove_links(text);
    let text = noise_pattern().replace_all(&text, "");
    whitespace_pattern().replace_all(&text, " ").trim().to_string()
}
