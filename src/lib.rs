//! Article extraction for news-aggregator PDF bundles.
//!
//! A bundle converted to text is one long blob: many articles separated by
//! `Document <id>` delimiters, interleaved with vendor footers and
//! word-count markers. [`parser::ClassicParser`] turns that blob into an
//! ordered list of [`Document`] records.

pub mod db;
pub mod document;
pub mod ingest;
pub mod parser;
pub mod pdf;
pub mod settings;
pub mod source;

pub use document::Document;
pub use parser::{ClassicParser, Parse, ParseError, PatternConfig};
pub use source::SourceFile;
