use super::config::Patterns;

/// Clean the block that follows the word-count marker.
///
/// The top of the block repeats article metadata (date, publication,
/// language) closed by a copyright line. If that line shows up within the
/// first `header_scan_lines` lines, it and everything above it go. Empty
/// lines and page footers are then dropped everywhere.
pub fn trim_body(patterns: &Patterns, block: &str) -> String {
    let lines: Vec<&str> = block.trim().split('\n').collect();

    let window = lines.len().min(patterns.header_scan_lines);
    let start = lines[..window]
        .iter()
        .position(|line| patterns.residual_header.is_match(line))
        .map_or(0, |idx| idx + 1);

    lines[start..]
        .iter()
        .filter(|line| !line.is_empty() && !patterns.page_footer.is_match(line))
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}
