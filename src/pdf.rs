use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Text of a PDF bundle, pages in order separated by newlines.
pub fn extract_text(path: &Path, bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;
    let text = join_pages(text.split('\u{c}'));
    debug!(path = %path.display(), chars = text.len(), "extracted pdf text");
    Ok(text)
}

fn join_pages<'a>(pages: impl Iterator<Item = &'a str>) -> String {
    pages.collect::<Vec<_>>().join("\n")
}

/// Whole-file checksum used to skip bundles that were already ingested.
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
