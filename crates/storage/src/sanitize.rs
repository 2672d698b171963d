//! Allow-list sanitizers for text that ends up in archive filenames.
//!
//! Archived filenames carry user input in any script, so the sanitizers are
//! defined by what they *keep* rather than what they strip:
//!
//! | Kept                     | Unicode class   |
//! |--------------------------|-----------------|
//! | letters, in any script   | `\p{L}`         |
//! | combining marks          | `\p{M}`         |
//! | digits and numerals      | `\p{N}`         |
//! | currency symbols         | `\p{Sc}`        |
//! | other symbols (emoji, ©) | `\p{So}`        |
//! | hyphen                   | `-`             |
//!
//! Every maximal run of anything else (whitespace, punctuation including `_`
//! and `.`, math symbols, control characters) collapses to one replacement
//! character. [`tag_safe`] additionally keeps `=` so tags can carry
//! `key=value` pairs.
//!
//! All three functions are pure and total.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(DISALLOWED, r"[^\p{L}\p{M}\p{N}\p{Sc}\p{So}\-]+");
regex!(TAG_DISALLOWED, r"[^\p{L}\p{M}\p{N}\p{Sc}\p{So}=\-]+");

/// Makes free text safe to use as the description segment of a filename.
///
/// Disallowed runs become a single space and the result is trimmed, so the
/// description stays readable.
///
/// ```
/// use docket_storage::sanitize::description_safe;
/// assert_eq!(description_safe("  Tax return: 2021/22 (final!)  "), "Tax return 2021 22 final");
/// assert_eq!(description_safe("Café über 東京"), "Café über 東京");
/// ```
pub fn description_safe(text: &str) -> String {
    DISALLOWED.replace_all(text, " ").trim().to_string()
}

/// Makes text safe to use as a single tag token.
///
/// The input is trimmed first, then every disallowed run (spaces included)
/// becomes a single `-`. The result never contains `_` or `.`, the separators
/// of the archived filename grammar.
///
/// ```
/// use docket_storage::sanitize::tag_safe;
/// assert_eq!(tag_safe("  summer holiday "), "summer-holiday");
/// assert_eq!(tag_safe("year=2021"), "year=2021");
/// assert_eq!(tag_safe("a_b.c"), "a-b-c");
/// ```
pub fn tag_safe(text: &str) -> String {
    TAG_DISALLOWED.replace_all(text.trim(), "-").into_owned()
}

/// Makes arbitrary text safe to use as a bare file or directory name.
///
/// Same as [`tag_safe`] without the `=` exception.
///
/// ```
/// use docket_storage::sanitize::filename_safe;
/// assert_eq!(filename_safe(" My Family "), "My-Family");
/// assert_eq!(filename_safe("a=b"), "a-b");
/// ```
pub fn filename_safe(text: &str) -> String {
    DISALLOWED.replace_all(text.trim(), "-").into_owned()
}
