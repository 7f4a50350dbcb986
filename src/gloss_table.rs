//! Tabular gloss source parsing.
//!
//! The source is UTF-8 text: a TAB-separated header line `id` followed by
//! language codes, then one row per symbol. Cells hold gloss candidates
//! separated by the configured delimiter, with backslash escaping as
//! documented on [`CellRules`](crate::config::CellRules).

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::config::CellRules;

/// Parsed gloss table: language columns plus well-formed rows.
#[derive(Debug, Clone)]
pub struct GlossTable {
    /// Language codes, in header order.
    pub languages: Vec<String>,
    /// Well-formed data rows, in file order.
    pub rows: Vec<GlossRow>,
    /// Rows skipped for a wrong column count.
    pub malformed_rows: usize,
}

impl GlossTable {
    /// Total data rows seen, including malformed ones.
    pub fn total_rows(&self) -> usize {
        self.rows.len() + self.malformed_rows
    }
}

/// One row of the gloss table.
#[derive(Debug, Clone)]
pub struct GlossRow {
    pub id: String,
    /// Candidate lists aligned with `GlossTable::languages`. An empty cell
    /// yields an empty list.
    pub cells: Vec<Vec<String>>,
    /// 1-based source line, for anomaly reports.
    pub line: usize,
}

/// Read and parse a gloss table file.
///
/// A missing file or an unusable header is fatal. A row with the wrong
/// column count is skipped with a warning and counted.
pub fn read_gloss_table(path: &Path, rules: &CellRules) -> Result<GlossTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read gloss table {}", path.display()))?;
    parse_gloss_table(&raw, rules)
        .with_context(|| format!("malformed gloss table {}", path.display()))
}

/// Parse gloss table text. Separated from file I/O for testability.
pub fn parse_gloss_table(text: &str, rules: &CellRules) -> Result<GlossTable> {
    let mut lines = text.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => bail!("gloss table is empty"),
        }
    };

    let columns: Vec<&str> = header.split('\t').collect();
    if columns.len() < 2 || columns[0].trim() != "id" {
        bail!("gloss table header must be `id` followed by language columns");
    }
    let languages: Vec<String> = columns[1..]
        .iter()
        .map(|lang| lang.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut malformed_rows = 0usize;

    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != columns.len() {
            warn!(
                line = line_number,
                expected = columns.len(),
                found = fields.len(),
                "skipping row with wrong column count"
            );
            malformed_rows += 1;
            continue;
        }

        let id = fields[0].trim().to_string();
        let cells = fields[1..]
            .iter()
            .map(|cell| split_cell(cell, rules))
            .collect();
        rows.push(GlossRow {
            id,
            cells,
            line: line_number,
        });
    }

    Ok(GlossTable {
        languages,
        rows,
        malformed_rows,
    })
}

/// Split one cell into trimmed, non-empty gloss candidates.
pub fn split_cell(cell: &str, rules: &CellRules) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut current = String::new();
    let mut chars = cell.chars();

    while let Some(ch) = chars.next() {
        if ch == rules.escape {
            match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push(ch),
            }
        } else if ch == rules.delimiter {
            push_candidate(&mut candidates, &mut current);
        } else {
            current.push(ch);
        }
    }
    push_candidate(&mut candidates, &mut current);
    candidates
}

fn push_candidate(candidates: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        candidates.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> CellRules {
        CellRules::default()
    }

    #[test]
    fn split_cell_on_delimiter() {
        assert_eq!(split_cell("Cat ; cat.", &rules()), vec!["Cat", "cat."]);
    }

    #[test]
    fn split_cell_empty_yields_empty_list() {
        assert!(split_cell("", &rules()).is_empty());
        assert!(split_cell("  ", &rules()).is_empty());
        assert!(split_cell(" ; ; ", &rules()).is_empty());
    }

    #[test]
    fn split_cell_escaped_delimiter_is_literal() {
        assert_eq!(split_cell(r"a\;b", &rules()), vec!["a;b"]);
        assert_eq!(split_cell(r"a\\;b", &rules()), vec![r"a\", "b"]);
        assert_eq!(split_cell(r"trailing\", &rules()), vec![r"trailing\"]);
    }

    #[test]
    fn parse_header_and_rows() {
        let text = "id\ten\tsv\n1\tdog\thund\n2\tcat; kitten\tkatt\n";
        let table = parse_gloss_table(text, &rules()).unwrap();

        assert_eq!(table.languages, vec!["en", "sv"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.malformed_rows, 0);
        assert_eq!(table.rows[0].id, "1");
        assert_eq!(table.rows[0].cells, vec![vec!["dog"], vec!["hund"]]);
        assert_eq!(table.rows[1].cells[0], vec!["cat", "kitten"]);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].line, 3);
    }

    #[test]
    fn parse_skips_malformed_rows_and_counts_them() {
        let text = "id\ten\n1\tdog\n2\tcat\textra\n3\tfish\n";
        let table = parse_gloss_table(text, &rules()).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.malformed_rows, 1);
        assert_eq!(table.total_rows(), 3);
        assert_eq!(table.rows[1].id, "3");
    }

    #[test]
    fn parse_skips_blank_lines() {
        let text = "\nid\ten\n\n1\tdog\n\n";
        let table = parse_gloss_table(text, &rules()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.malformed_rows, 0);
    }

    #[test]
    fn parse_rejects_missing_header() {
        assert!(parse_gloss_table("", &rules()).is_err());
        assert!(parse_gloss_table("name\ten\n", &rules()).is_err());
        assert!(parse_gloss_table("id\n", &rules()).is_err());
    }

    #[test]
    fn empty_cell_produces_empty_list() {
        let text = "id\ten\tsv\n1\t\thund\n";
        let table = parse_gloss_table(text, &rules()).unwrap();
        assert!(table.rows[0].cells[0].is_empty());
        assert_eq!(table.rows[0].cells[1], vec!["hund"]);
    }
}
