use tracing::trace;

use super::config::Patterns;
use super::normalize::normalize;
use super::trim::trim_body;
use crate::document::{fingerprint, Document};

/// Gate a fragment failed. Only used for logging; callers see `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoDate,
    NoWordCount,
    NoSource,
    EmptyHeadline,
    EmptyBody,
}

/// Turn one raw fragment into a [`Document`], or `None` if any gate fails.
pub fn extract(patterns: &Patterns, raw: &str) -> Option<Document> {
    match try_extract(patterns, raw) {
        Ok(doc) => Some(doc),
        Err(reason) => {
            trace!(?reason, len = raw.len(), "fragment rejected");
            None
        }
    }
}

pub fn try_extract(patterns: &Patterns, raw: &str) -> Result<Document, Rejection> {
    let hash = fingerprint(raw);
    let doc = normalize(patterns, raw);

    let date = patterns
        .date
        .find(&doc)
        .ok_or(Rejection::NoDate)?
        .as_str()
        .to_string();

    let mut segments = patterns.word_count.split(&doc);
    let (lead, segment) = match (segments.next(), segments.next()) {
        (Some(lead), Some(segment)) => (lead, segment),
        _ => return Err(Rejection::NoWordCount),
    };

    let body = trim_body(patterns, segment);
    let headline = pick_headline(patterns, lead);

    let source = patterns
        .source
        .find(segment)
        .ok_or(Rejection::NoSource)?
        .as_str()
        .to_string();

    if headline.is_empty() {
        return Err(Rejection::EmptyHeadline);
    }
    if body.is_empty() {
        return Err(Rejection::EmptyBody);
    }

    Ok(Document::new(headline, body, source, date, hash))
}

fn pick_headline(patterns: &Patterns, lead: &str) -> String {
    let lines: Vec<&str> = lead.split('\n').collect();
    let picked = if lines.len() > patterns.lead_line_threshold {
        lines
            .get(patterns.headline_line)
            .copied()
            .unwrap_or_default()
            .to_string()
    } else {
        lines.join("\n")
    };
    patterns.byline.replace_all(&picked, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PatternConfig;

    fn patterns() -> Patterns {
        PatternConfig::default().compile().unwrap()
    }

    const BODY: &str = "\n17 March 2020\nFinancial Times\nEnglish\n© 2020 The Financial Times Ltd.\nStocks rose sharply.\nPage 2 of 8\nAnalysts were surprised.";

    fn fragment(lead: &str) -> String {
        format!("{}\n1,204 words{}", lead, BODY)
    }

    #[test]
    fn extracts_all_fields() {
        let raw = fragment("Markets rally\nBy Jane Doe");
        let doc = extract(&patterns(), &raw).unwrap();
        assert_eq!(doc.date(), "17 March 2020");
        assert_eq!(doc.headline(), "Markets rally");
        assert_eq!(doc.body(), "Stocks rose sharply.\nAnalysts were surprised.");
        assert_eq!(doc.source(), "Financial Times");
        assert_eq!(doc.hash(), fingerprint(&raw));
    }

    #[test]
    fn hash_uses_raw_text_before_rinse() {
        let p = patterns();
        let clean = fragment("Markets rally");
        let noisy = fragment("Markets rally\nPage 1 of 8 © 2020 Factiva, Inc. All rights reserved.");
        let a = extract(&p, &clean).unwrap();
        let b = extract(&p, &noisy).unwrap();
        assert_ne!(a.hash(), b.hash());
        assert_eq!(b.hash(), fingerprint(&noisy));
    }

    #[test]
    fn missing_date_is_rejected() {
        let raw = "Headline\n300 words\nSome Paper\n© 2020\nText";
        assert_eq!(try_extract(&patterns(), raw), Err(Rejection::NoDate));
    }

    #[test]
    fn missing_word_count_is_rejected() {
        let raw = "Headline\n17 March 2020\nSome Paper\nText";
        assert_eq!(try_extract(&patterns(), raw), Err(Rejection::NoWordCount));
    }

    #[test]
    fn missing_source_is_rejected() {
        let raw = "Headline\n17 March 2020\n300 words\nall lower case body\nno names at all";
        assert_eq!(try_extract(&patterns(), raw), Err(Rejection::NoSource));
    }

    #[test]
    fn source_not_taken_from_lead() {
        let raw = "Big Headline Words\n17 March 2020\n300 words\nonly lower case here";
        assert_eq!(try_extract(&patterns(), raw), Err(Rejection::NoSource));
    }

    #[test]
    fn source_match_is_kept_verbatim() {
        let raw = "Headline\n17 March 2020\n300 words\nFoo Bar baz\n© 2020\nText";
        let doc = extract(&patterns(), raw).unwrap();
        assert_eq!(doc.source(), "Foo Bar ");
    }

    #[test]
    fn only_first_two_segments_used() {
        let raw = fragment("Markets rally") + "\nSecond marker 99 words\nDropped Tail";
        let doc = extract(&patterns(), &raw).unwrap();
        assert!(!doc.body().contains("Dropped Tail"));
        assert!(doc.body().ends_with("Second marker"));
    }

    #[test]
    fn headline_from_fifth_line_of_long_lead() {
        let lead = "SE Business\nHD\nWC\nPD\nShares climb By John Smith\nL5";
        let doc = extract(&patterns(), &fragment(lead)).unwrap();
        assert_eq!(doc.headline(), "Shares climb");
    }

    #[test]
    fn six_line_lead_uses_line_four() {
        let p = patterns();
        assert_eq!(pick_headline(&p, "L0\nL1\nL2\nL3\nL4 By Max Power\nL5"), "L4");
    }

    #[test]
    fn five_line_lead_is_kept_whole() {
        let p = patterns();
        assert_eq!(pick_headline(&p, "a\nb\nc\nd\ne"), "a\nb\nc\nd\ne");
    }

    #[test]
    fn headline_keeps_short_lead_whole() {
        let p = patterns();
        assert_eq!(pick_headline(&p, "Line one\nLine two\nLine three"), "Line one\nLine two\nLine three");
    }

    #[test]
    fn byline_only_strips_capitalized_names() {
        let p = patterns();
        assert_eq!(pick_headline(&p, "Prices fall By Anna Berg"), "Prices fall");
        assert_eq!(pick_headline(&p, "Step by step"), "Step by step");
    }

    #[test]
    fn empty_headline_is_rejected() {
        let lead = "a\nb\nc\nd\n\nf";
        assert_eq!(try_extract(&patterns(), &fragment(lead)), Err(Rejection::EmptyHeadline));
    }

    #[test]
    fn empty_body_is_rejected() {
        let raw = "Headline\n17 March 2020\n300 words\nFinancial Times\n© 2020 FT\nPage 1 of 2";
        assert_eq!(try_extract(&patterns(), raw), Err(Rejection::EmptyBody));
    }

    #[test]
    fn german_fragment() {
        let raw = "Börse im Aufwind\n812 Wörter\n3 März 2021\nHandelsblatt Online\nDeutsch\n(c) 2021 Handelsblatt\nDer DAX stieg.";
        let doc = extract(&patterns(), raw).unwrap();
        assert_eq!(doc.date(), "3 März 2021");
        assert_eq!(doc.source(), "Handelsblatt Online");
        assert_eq!(doc.body(), "Der DAX stieg.");
    }
}
