use tracing::debug;

use super::config::Patterns;
use super::extract::extract;
use crate::document::Document;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Split a bundle at its document delimiters.
///
/// Everything after the last delimiter is the bundle trailer and is not
/// returned, so a blob without any delimiter yields no fragments.
pub fn split_fragments<'a>(patterns: &Patterns, raw: &'a str) -> Vec<&'a str> {
    let mut fragments: Vec<&str> = patterns.separator.split(raw).collect();
    fragments.pop();
    fragments
}

#[cfg(feature = "rayon")]
fn extract_all(patterns: &Patterns, fragments: &[&str]) -> Vec<Document> {
    fragments
        .par_iter()
        .filter_map(|fragment| extract(patterns, fragment))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn extract_all(patterns: &Patterns, fragments: &[&str]) -> Vec<Document> {
    fragments
        .iter()
        .filter_map(|fragment| extract(patterns, fragment))
        .collect()
}

/// Segment `raw` and extract every fragment, in delimiter order.
pub fn segment(patterns: &Patterns, raw: &str) -> Vec<Document> {
    let fragments = split_fragments(patterns, raw);
    let docs = extract_all(patterns, &fragments);
    debug!(
        fragments = fragments.len(),
        documents = docs.len(),
        rejected = fragments.len() - docs.len(),
        "segmented bundle"
    );
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PatternConfig;

    const ID_A: &str = "Document AAAAAAAAAAAAAAAAAAAAAAAAA";
    const ID_B: &str = "Dokument BBBBBBBBBBBBBBBBBBBBBBBBB";

    fn patterns() -> Patterns {
        PatternConfig::default().compile().unwrap()
    }

    #[test]
    fn no_delimiter_yields_nothing() {
        let p = patterns();
        assert!(split_fragments(&p, "just a trailer").is_empty());
        assert!(segment(&p, "Title\n17 March 2020\n300 words\nSome Paper\nText").is_empty());
    }

    #[test]
    fn trailer_after_last_delimiter_is_dropped() {
        let p = patterns();
        let raw = format!("one\n{}\ntwo\n{}\ntrailer", ID_A, ID_B);
        assert_eq!(split_fragments(&p, &raw), vec!["one\n", "\ntwo\n"]);
    }

    #[test]
    fn trailing_delimiter_leaves_empty_trailer() {
        let p = patterns();
        let raw = format!("one\n{}", ID_A);
        assert_eq!(split_fragments(&p, &raw), vec!["one\n"]);
    }

    #[test]
    fn rejected_fragments_are_skipped_in_order() {
        let p = patterns();
        let good = |title: &str| {
            format!(
                "{}\n200 words\n1 May 2021\nDaily Mail\n© 2021\nBody of {}\n",
                title, title
            )
        };
        let raw = format!(
            "{}{}\nnot an article\n{}{}{}",
            good("First"),
            ID_A,
            ID_B,
            good("Second"),
            ID_A
        );
        let docs = segment(&p, &raw);
        let headlines: Vec<&str> = docs.iter().map(|d| d.headline()).collect();
        assert_eq!(headlines, vec!["First", "Second"]);
    }
}
