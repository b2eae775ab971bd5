use std::path::{Path, PathBuf};

use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::db;
use crate::document::Document;
use crate::parser::Parse;
use crate::pdf;

/// Files read and parsed before their documents are written.
pub const CHUNK: usize = 16;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestCounts {
    pub files: usize,
    pub skipped: usize,
    pub failed: usize,
    pub parsed: usize,
    pub inserted: usize,
}

/// What the caller is told while a batch runs.
#[derive(Debug)]
pub enum Progress<'a> {
    Skipped(&'a Path),
    ChunkDone(usize),
}

struct Pending {
    path: PathBuf,
    bytes: Vec<u8>,
    checksum: String,
}

struct Parsed {
    path: PathBuf,
    checksum: String,
    docs: Vec<Document>,
}

fn parse_pending<P, T>(pending: &Pending, parser: &P, to_text: &T) -> Result<Parsed>
where
    P: Parse,
    T: Fn(&Path, &[u8]) -> Result<String>,
{
    let raw = to_text(pending.path.as_path(), pending.bytes.as_slice())?;
    Ok(Parsed {
        path: pending.path.clone(),
        checksum: pending.checksum.clone(),
        docs: parser.parse_source(&raw),
    })
}

#[cfg(feature = "rayon")]
fn parse_all<P, T>(pending: &[Pending], parser: &P, to_text: &T) -> Vec<Result<Parsed>>
where
    P: Parse + Sync,
    T: Fn(&Path, &[u8]) -> Result<String> + Sync,
{
    pending
        .par_iter()
        .map(|p| parse_pending(p, parser, to_text))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn parse_all<P, T>(pending: &[Pending], parser: &P, to_text: &T) -> Vec<Result<Parsed>>
where
    P: Parse + Sync,
    T: Fn(&Path, &[u8]) -> Result<String> + Sync,
{
    pending
        .iter()
        .map(|p| parse_pending(p, parser, to_text))
        .collect()
}

/// Ingest PDF bundles, skipping files whose checksum is already stored
/// unless `force` is set.
pub fn ingest_pdfs<P>(
    conn: &Connection,
    parser: &P,
    files: &[PathBuf],
    force: bool,
    progress: impl FnMut(Progress<'_>),
) -> Result<IngestCounts>
where
    P: Parse + Sync,
{
    ingest_with(conn, parser, files, force, pdf::extract_text, progress)
}

/// Same as [`ingest_pdfs`] with the bytes-to-text step supplied by the caller.
///
/// Files are handled in chunks of [`CHUNK`]: read and checksum in order,
/// parse (in parallel with `rayon`), then save from this thread. A file that
/// cannot be read or converted counts as failed; database errors abort.
pub fn ingest_with<P, T>(
    conn: &Connection,
    parser: &P,
    files: &[PathBuf],
    force: bool,
    to_text: T,
    mut progress: impl FnMut(Progress<'_>),
) -> Result<IngestCounts>
where
    P: Parse + Sync,
    T: Fn(&Path, &[u8]) -> Result<String> + Sync,
{
    let mut counts = IngestCounts::default();

    for chunk in files.chunks(CHUNK) {
        let mut pending = Vec::with_capacity(chunk.len());
        for path in chunk {
            let bytes = match std::fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot read file");
                    counts.failed += 1;
                    continue;
                }
            };
            let checksum = pdf::checksum(&bytes);
            if !force && db::sourcefile_exists(conn, &checksum)? {
                progress(Progress::Skipped(path));
                counts.skipped += 1;
                continue;
            }
            pending.push(Pending {
                path: path.clone(),
                bytes,
                checksum,
            });
        }

        for result in parse_all(&pending, parser, &to_text) {
            match result {
                Ok(parsed) => {
                    let label = parsed.path.to_string_lossy();
                    let inserted =
                        db::save_source(conn, &parsed.checksum, Some(label.as_ref()), &parsed.docs)?;
                    info!(
                        path = %label,
                        documents = parsed.docs.len(),
                        inserted,
                        "ingested bundle"
                    );
                    counts.files += 1;
                    counts.parsed += parsed.docs.len();
                    counts.inserted += inserted;
                }
                Err(e) => {
                    warn!(error = format!("{:#}", e), "bundle failed");
                    counts.failed += 1;
                }
            }
        }
        progress(Progress::ChunkDone(chunk.len()));
    }

    Ok(counts)
}
