use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;

use newsbundle::ingest::{self, Progress};
use newsbundle::parser::{ClassicParser, Parse};
use newsbundle::settings::Settings;
use newsbundle::{db, Document, SourceFile};

#[derive(Parser)]
#[command(name = "newsbundle", about = "Extract articles from news-aggregator PDF bundles")]
struct Cli {
    /// Settings file (default: ./newsbundle.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables
    Init,
    /// Parse PDF bundles and store their articles
    Ingest {
        files: Vec<PathBuf>,
        /// Ingest even if the file checksum is already known
        #[arg(long)]
        force: bool,
    },
    /// Print every article of one bundle
    Parse {
        file: PathBuf,
        /// Treat the file as already extracted text instead of PDF
        #[arg(long)]
        text: bool,
        /// Emit JSON instead of text cards
        #[arg(long)]
        json: bool,
    },
    /// Print one random article from a random bundle
    Print {
        /// Directory to pick from (default: pdf_dir setting)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Full-text search over stored articles
    Search {
        query: String,
        /// Max hits to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Show database statistics
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let parser = ClassicParser::new(&settings.patterns)?;

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            println!("Database ready: {:?}", settings.db_path);
            Ok(())
        }
        Commands::Ingest { files, force } => {
            if files.is_empty() {
                println!("No files given.");
                return Ok(());
            }
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            run_ingest(&conn, &parser, &files, force)
        }
        Commands::Parse { file, text, json } => {
            let docs = if text {
                let bytes =
                    std::fs::read(&file).with_context(|| format!("Failed to read {:?}", file))?;
                parser
                    .parse_bytes(&bytes)
                    .with_context(|| format!("Failed to parse {:?}", file))?
            } else {
                SourceFile::read_path(&file)?.with_parser(parser).documents()
            };
            print_documents(&docs, json)
        }
        Commands::Print { dir } => {
            let dir = dir.unwrap_or_else(|| settings.pdf_dir.clone());
            print_random(&dir, &parser)
        }
        Commands::Search { query, limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let hits = db::search(&conn, &query, limit)?;
            if hits.is_empty() {
                println!("No matches.");
                return Ok(());
            }
            println!(
                "{:>3} | {:<16} | {:<24} | {:<40}",
                "#", "Date", "Source", "Headline"
            );
            println!("{}", "-".repeat(92));
            for (i, h) in hits.iter().enumerate() {
                println!(
                    "{:>3} | {:<16} | {:<24} | {:<40}",
                    i + 1,
                    truncate(&h.date, 16),
                    truncate(&h.source, 24),
                    truncate(&h.headline, 40),
                );
                println!("      {}  ({})", h.snippet.replace('\n', " "), h.hash);
            }
            println!("\n{} hits", hits.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Documents: {}", s.documents);
            println!("Sources:   {}", s.sources);
            println!("Files:     {}", s.files);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_ingest(
    conn: &rusqlite::Connection,
    parser: &ClassicParser,
    files: &[PathBuf],
    force: bool,
) -> Result<()> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let counts = ingest::ingest_pdfs(conn, parser, files, force, |event| match event {
        Progress::Skipped(path) => pb.println(format!("Already ingested: {}", path.display())),
        Progress::ChunkDone(n) => pb.inc(n as u64),
    })?;

    pb.finish_and_clear();
    println!(
        "Ingested {} files ({} skipped, {} failed): {} articles parsed, {} new.",
        counts.files, counts.skipped, counts.failed, counts.parsed, counts.inserted,
    );
    Ok(())
}

fn print_documents(docs: &[Document], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(docs)?);
        return Ok(());
    }
    for doc in docs {
        println!("{}", "=".repeat(32));
        println!("{}", doc);
    }
    println!("\n{} articles", docs.len());
    Ok(())
}

fn print_random(dir: &Path, parser: &ClassicParser) -> Result<()> {
    let files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .map(|e| e.into_path())
        .collect();

    let mut rng = rand::thread_rng();
    let Some(file) = files.choose(&mut rng) else {
        println!("No PDF files under {:?}.", dir);
        return Ok(());
    };

    println!("{}", "=".repeat(32));
    println!("{}", file.display());
    let docs = SourceFile::read_path(file)?.with_parser(parser.clone()).documents();
    match docs.choose(&mut rng) {
        Some(doc) => println!("{}", doc),
        None => println!("No articles found."),
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
