use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::document::Document;
use crate::parser::{ClassicParser, Parse};
use crate::pdf;

/// One bundle: its extracted text and the strategy used to parse it.
pub struct SourceFile {
    raw: String,
    path: Option<PathBuf>,
    checksum: Option<String>,
    parser: Box<dyn Parse + Send + Sync>,
}

impl SourceFile {
    /// Wrap text that was already pulled out of a bundle.
    pub fn from_text(raw: impl Into<String>) -> Self {
        SourceFile {
            raw: raw.into(),
            path: None,
            checksum: None,
            parser: Box::new(ClassicParser::default()),
        }
    }

    /// Read a PDF bundle from disk.
    pub fn read_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
        Self::from_pdf_bytes(path, &bytes)
    }

    /// PDF bytes already in memory; `path` is kept for reporting.
    pub fn from_pdf_bytes(path: &Path, bytes: &[u8]) -> Result<Self> {
        let raw = pdf::extract_text(path, bytes)?;
        Ok(SourceFile {
            raw,
            path: Some(path.to_path_buf()),
            checksum: Some(pdf::checksum(bytes)),
            parser: Box::new(ClassicParser::default()),
        })
    }

    pub fn with_parser(mut self, parser: impl Parse + Send + Sync + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn documents(&self) -> Vec<Document> {
        self.parser.parse_source(&self.raw)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// MD5 of the file bytes; `None` for in-memory text.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }
}
