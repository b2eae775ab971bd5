use thiserror::Error;

/// Failures of a whole parse call. Rejected fragments are never errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input bytes are not UTF-8 text
    #[error("input is not valid UTF-8: {0}")]
    Malformed(#[from] std::str::Utf8Error),

    /// A configured pattern does not compile
    #[error("invalid `{field}` pattern: {source}")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}
