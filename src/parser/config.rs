use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ParseError;

const SEPARATOR: &str = r"Do[ck]ument [A-Za-z0-9]{25}";
const WORD_COUNT: &str = r"(?:[0-9]{1,2},)?[0-9]{1,3} +(?:Wörter|Words|words)";
const DATE: &str = concat!(
    r"(?P<day>[0-9]{1,2}) (?P<month>",
    "January|February|March|April|May|June|July|August|September|October|November|December|",
    "Januar|Februar|März|Mars|Mai|Juni|Juli|Oktober|Dezember|Desember",
    r") (?P<year>[0-9]{4})"
);
const SOURCE: &str = r"(?:[A-Z][A-Za-z]* ?){2,}";
const RINSE: &str = concat!(
    r"Page +[0-9]{1,4} +of +[0-9]{1,4} ©? +[0-9]{4} +Factiva, +Inc\. +",
    r"(?:All|Alle) +(?:rights|Rechte) +(?:reserved|vorbehalten)\."
);
const BYLINE: &str = r"By [A-Z][A-Za-z]*(?: [A-Z][A-Za-z]*)*";
const RESIDUAL_HEADER: &str = r"^(?:©|\(c\)|\(C\)|Copyright)";
const PAGE_FOOTER: &str = r"Page [0-9]{1,4} of [0-9]{1,4}";

/// Every pattern and threshold the classic extraction uses.
///
/// Loaded from the `[patterns]` table of the config file; missing keys fall
/// back to the built-in Factiva layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Boundary between two articles. The text after the last match is
    /// a trailer and is always dropped.
    pub separator: String,
    /// Word-count marker splitting the lead block from the body.
    pub word_count: String,
    /// Article date. The whole match is stored verbatim.
    pub date: String,
    /// Publication name heuristic, searched in the body segment.
    pub source: String,
    /// Vendor footer removed before any structural parsing. Tokens are
    /// separated by spaces only; without the `©` the year needs two.
    pub rinse: String,
    /// What each rinse match is replaced with.
    pub rinse_replacement: String,
    /// Byline removed from the headline.
    pub byline: String,
    /// Copyright line closing the residual header at the top of the body.
    pub residual_header: String,
    /// Page footer lines dropped from the body.
    pub page_footer: String,
    /// How many leading body lines are scanned for the residual header.
    pub header_scan_lines: usize,
    /// Lead blocks with more lines than this use `headline_line` only.
    pub lead_line_threshold: usize,
    /// Index of the headline line in a long lead block.
    pub headline_line: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig {
            separator: SEPARATOR.to_string(),
            word_count: WORD_COUNT.to_string(),
            date: DATE.to_string(),
            source: SOURCE.to_string(),
            rinse: RINSE.to_string(),
            rinse_replacement: String::new(),
            byline: BYLINE.to_string(),
            residual_header: RESIDUAL_HEADER.to_string(),
            page_footer: PAGE_FOOTER.to_string(),
            header_scan_lines: 10,
            lead_line_threshold: 5,
            headline_line: 4,
        }
    }
}

impl PatternConfig {
    pub fn compile(&self) -> Result<Patterns, ParseError> {
        Ok(Patterns {
            separator: compile("separator", &self.separator)?,
            word_count: compile("word_count", &self.word_count)?,
            date: compile("date", &self.date)?,
            source: compile("source", &self.source)?,
            rinse: compile("rinse", &self.rinse)?,
            rinse_replacement: self.rinse_replacement.clone(),
            byline: compile("byline", &self.byline)?,
            residual_header: compile("residual_header", &self.residual_header)?,
            page_footer: compile("page_footer", &self.page_footer)?,
            header_scan_lines: self.header_scan_lines,
            lead_line_threshold: self.lead_line_threshold,
            headline_line: self.headline_line,
        })
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ParseError> {
    Regex::new(pattern).map_err(|source| ParseError::Pattern { field, source })
}

/// Compiled form of [`PatternConfig`].
#[derive(Debug, Clone)]
pub struct Patterns {
    pub separator: Regex,
    pub word_count: Regex,
    pub date: Regex,
    pub source: Regex,
    pub rinse: Regex,
    pub rinse_replacement: String,
    pub byline: Regex,
    pub residual_header: Regex,
    pub page_footer: Regex,
    pub header_scan_lines: usize,
    pub lead_line_threshold: usize,
    pub headline_line: usize,
}
