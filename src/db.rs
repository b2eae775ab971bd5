use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::document::Document;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE VIRTUAL TABLE IF NOT EXISTS document USING fts5(
            headline, body, source, date, hash UNINDEXED
        );

        -- fts5 tables cannot carry constraints; dedup on fragment hash lives here
        CREATE TABLE IF NOT EXISTS document_hash (
            hash       TEXT PRIMARY KEY,
            checksum   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sourcefile (
            checksum    TEXT PRIMARY KEY,
            path        TEXT,
            documents   INTEGER NOT NULL DEFAULT 0,
            ingested_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Source files ──

pub fn sourcefile_exists(conn: &Connection, checksum: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sourcefile WHERE checksum = ?1",
            params![checksum],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Store the documents of one bundle and record its checksum.
/// Documents whose hash is already known are skipped. Returns how many
/// were inserted.
pub fn save_source(
    conn: &Connection,
    checksum: &str,
    path: Option<&str>,
    docs: &[Document],
) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;
    {
        let mut h_stmt =
            tx.prepare("INSERT OR IGNORE INTO document_hash (hash, checksum) VALUES (?1, ?2)")?;
        let mut d_stmt = tx.prepare(
            "INSERT INTO document (headline, body, source, date, hash)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for d in docs {
            if h_stmt.execute(params![d.hash(), checksum])? == 0 {
                continue;
            }
            d_stmt.execute(params![d.headline(), d.body(), d.source(), d.date(), d.hash()])?;
            inserted += 1;
        }

        tx.execute(
            "INSERT OR REPLACE INTO sourcefile (checksum, path, documents) VALUES (?1, ?2, ?3)",
            params![checksum, path, docs.len() as i64],
        )?;
    }
    tx.commit()?;
    Ok(inserted)
}

// ── Search ──

pub struct SearchHit {
    pub headline: String,
    pub source: String,
    pub date: String,
    pub hash: String,
    pub snippet: String,
}

pub fn search(conn: &Connection, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let mut stmt = conn.prepare(
        "SELECT headline, source, date, hash, snippet(document, 1, '[', ']', '...', 12)
         FROM document
         WHERE document MATCH ?1
         ORDER BY rank
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(params![query, limit as i64], |row| {
            Ok(SearchHit {
                headline: row.get(0)?,
                source: row.get(1)?,
                date: row.get(2)?,
                hash: row.get(3)?,
                snippet: row.get(4)?,
            })
        })
        .with_context(|| format!("Invalid search query {:?}", query))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub documents: i64,
    pub sources: i64,
    pub files: i64,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |sql: &str| -> Result<i64> { Ok(conn.query_row(sql, [], |r| r.get(0))?) };
    Ok(Stats {
        documents: count("SELECT COUNT(*) FROM document")?,
        sources: count("SELECT COUNT(DISTINCT source) FROM document")?,
        files: count("SELECT COUNT(*) FROM sourcefile")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn doc(headline: &str, source: &str, hash: &str) -> Document {
        Document::new(
            headline,
            format!("{} happened today.", headline),
            source,
            "17 March 2020",
            hash,
        )
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = memory();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn save_and_count() {
        let conn = memory();
        let docs = vec![doc("Rates cut", "Financial Times", "h1"), doc("Plants close", "Handelsblatt Online", "h2")];
        assert_eq!(save_source(&conn, "c1", Some("a.pdf"), &docs).unwrap(), 2);
        assert!(sourcefile_exists(&conn, "c1").unwrap());
        assert!(!sourcefile_exists(&conn, "c2").unwrap());

        let s = get_stats(&conn).unwrap();
        assert_eq!(s.documents, 2);
        assert_eq!(s.sources, 2);
        assert_eq!(s.files, 1);
    }

    #[test]
    fn known_hashes_are_skipped() {
        let conn = memory();
        save_source(&conn, "c1", None, &[doc("Rates cut", "Financial Times", "h1")]).unwrap();
        let again = vec![doc("Rates cut", "Financial Times", "h1"), doc("New story", "The Guardian", "h3")];
        assert_eq!(save_source(&conn, "c2", None, &again).unwrap(), 1);
        assert_eq!(get_stats(&conn).unwrap().documents, 2);
    }

    #[test]
    fn reingest_same_checksum_keeps_one_row() {
        let conn = memory();
        let docs = vec![doc("Rates cut", "Financial Times", "h1")];
        save_source(&conn, "c1", None, &docs).unwrap();
        save_source(&conn, "c1", None, &docs).unwrap();
        let s = get_stats(&conn).unwrap();
        assert_eq!(s.files, 1);
        assert_eq!(s.documents, 1);
    }

    #[test]
    fn full_text_search() {
        let conn = memory();
        let docs = vec![doc("Rates cut", "Financial Times", "h1"), doc("Plants close", "Handelsblatt Online", "h2")];
        save_source(&conn, "c1", None, &docs).unwrap();

        let hits = search(&conn, "plants", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hash, "h2");
        assert_eq!(hits[0].source, "Handelsblatt Online");
        assert!(hits[0].snippet.contains("[Plants]"));

        assert!(search(&conn, "nothing", 10).unwrap().is_empty());
    }

    #[test]
    fn connect_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.sqlite");
        let conn = connect(&path).unwrap();
        init_schema(&conn).unwrap();
        assert!(path.exists());
    }
}
