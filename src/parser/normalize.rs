use std::borrow::Cow;

use regex::NoExpand;

use super::config::Patterns;

/// Strip the vendor footer from a fragment before it is split.
///
/// Footers can land mid-sentence, even between a word count and its
/// `words` token, so this must run before any structural pattern.
pub fn normalize<'a>(patterns: &Patterns, fragment: &'a str) -> Cow<'a, str> {
    patterns
        .rinse
        .replace_all(fragment, NoExpand(&patterns.rinse_replacement))
}
