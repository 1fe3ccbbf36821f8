//! Text normalization for catalog search.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold `text` for accent- and case-insensitive matching.
///
/// Decomposes to NFD, drops combining marks, then lowercases, so
/// `"Mouse Gámer"` and `"MOUSE GAMER"` normalize to the same string.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
