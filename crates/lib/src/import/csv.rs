//! Delimited-text parsing for uploaded import files.
//!
//! The upstream exports arrive with inconsistent delimiters (semicolon from
//! the usual spreadsheet export, comma or tab from hand-edited files), so
//! the delimiter is detected from the header line rather than configured.

use crate::errors::ImportError;

/// The delimiters an uploaded file may use.
const CANDIDATE_DELIMITERS: [char; 3] = [',', ';', '\t'];

/// Semicolon is the convention for this pipeline's source files, so it wins
/// ties and empty headers.
const DEFAULT_DELIMITER: char = ';';

/// A fully split upload: one header row plus equally sized data rows.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// The delimiter detected from the header line, kept for diagnostics.
    pub delimiter: char,
}

/// Picks the delimiter with the strictly highest count in the header line.
/// A tie or zero matches falls back to the semicolon default.
pub fn detect_delimiter(header_line: &str) -> char {
    let mut leader = DEFAULT_DELIMITER;
    let mut leader_count = 0usize;
    let mut tied = false;
    for candidate in CANDIDATE_DELIMITERS {
        let count = header_line.matches(candidate).count();
        if count > leader_count {
            leader = candidate;
            leader_count = count;
            tied = false;
        } else if count == leader_count {
            tied = true;
        }
    }
    if leader_count == 0 || tied {
        DEFAULT_DELIMITER
    } else {
        leader
    }
}

/// Splits one line into cells on `delimiter`, honoring double-quoted cells.
///
/// A doubled `""` inside a quoted cell is unescaped to one literal quote,
/// enclosing quotes are stripped, and every cell is whitespace-trimmed. A
/// line that ends while still inside a quote is rejected rather than
/// guessed at, since a misparse here silently shifts every later column.
pub fn split_line(line: &str, delimiter: char) -> Result<Vec<String>, String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                // escaped quote inside a quoted cell
                cell.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            cells.push(cell.trim().to_string());
            cell = String::new();
        } else {
            cell.push(ch);
        }
    }

    if in_quotes {
        return Err("unbalanced double quote".to_string());
    }

    cells.push(cell.trim().to_string());
    Ok(cells)
}

/// Parses the full upload text into a header and data rows.
///
/// Line endings are normalized, blank lines are dropped, and a file with
/// fewer than two remaining lines is rejected as empty. Every data row must
/// have exactly as many cells as the header; a ragged row is a parse error,
/// not something to pad or truncate, because a misaligned row would be
/// staged under the wrong columns. Line numbers in errors are 1-based over
/// the non-blank lines.
pub fn parse_table(text: &str) -> Result<ParsedTable, ImportError> {
    let lines: Vec<&str> = text
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(ImportError::EmptyInput);
    }

    let delimiter = detect_delimiter(lines[0]);
    let header =
        split_line(lines[0], delimiter).map_err(|reason| ImportError::Parse { line: 1, reason })?;

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for (index, line) in lines.iter().enumerate().skip(1) {
        let cells = split_line(line, delimiter).map_err(|reason| ImportError::Parse {
            line: index + 1,
            reason,
        })?;
        if cells.len() != header.len() {
            return Err(ImportError::Parse {
                line: index + 1,
                reason: format!("expected {} cells, found {}", header.len(), cells.len()),
            });
        }
        rows.push(cells);
    }

    Ok(ParsedTable {
        header,
        rows,
        delimiter,
    })
}
