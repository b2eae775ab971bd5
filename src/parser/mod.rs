pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod segment;
pub mod trim;

pub use config::{PatternConfig, Patterns};
pub use error::ParseError;

use crate::document::Document;

/// A strategy that turns a bundle's text into its articles.
pub trait Parse {
    /// Articles of `raw` in the order they appear. Fragments that do not
    /// look like an article are left out.
    fn parse_source(&self, raw: &str) -> Vec<Document>;

    /// Same as [`Parse::parse_source`] for text that has not been decoded yet.
    fn parse_bytes(&self, raw: &[u8]) -> Result<Vec<Document>, ParseError> {
        let text = std::str::from_utf8(raw)?;
        Ok(self.parse_source(text))
    }
}

/// Delimiter split followed by regex field extraction:
/// blob → fragments → rinse → date / lead-body / source gates → documents.
#[derive(Debug, Clone)]
pub struct ClassicParser {
    patterns: Patterns,
}

impl ClassicParser {
    pub fn new(config: &PatternConfig) -> Result<Self, ParseError> {
        Ok(ClassicParser {
            patterns: config.compile()?,
        })
    }
}

impl Default for ClassicParser {
    fn default() -> Self {
        static DEFAULT: std::sync::LazyLock<Patterns> = std::sync::LazyLock::new(|| {
            PatternConfig::default()
                .compile()
                .expect("built-in patterns compile")
        });
        ClassicParser {
            patterns: DEFAULT.clone(),
        }
    }
}

impl Parse for ClassicParser {
    fn parse_source(&self, raw: &str) -> Vec<Document> {
        segment::segment(&self.patterns, raw)
    }
}

// ── Tests ──
