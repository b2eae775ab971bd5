use std::fmt;

use serde::Serialize;

/// One article extracted from a bundle.
///
/// Built only by a parser once every gate has passed, so all five fields are
/// non-empty. There are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    headline: String,
    body: String,
    source: String,
    date: String,
    hash: String,
}

impl Document {
    pub fn new(
        headline: impl Into<String>,
        body: impl Into<String>,
        source: impl Into<String>,
        date: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Document {
            headline: headline.into(),
            body: body.into(),
            source: source.into(),
            date: date.into(),
            hash: hash.into(),
        }
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Date exactly as matched, e.g. `17 March 2020`.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Fingerprint of the raw fragment this document came from.
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source:\t{}", self.source)?;
        writeln!(f, "Date:\t{}", self.date)?;
        writeln!(f, "Headline:\n{}", tab_indent(&self.headline))?;
        write!(f, "Body:\n{}", tab_indent(&self.body))
    }
}

fn tab_indent(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("\t{}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// MD5 of `text` as 32 lowercase hex chars. Identity key only.
pub fn fingerprint(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}
