// File: src/model/parser.rs
//! CSV tokenizer and the mapping from CSV rows to `ImportRecord`s.
//!
//! The tokenizer is deliberately tolerant: unterminated quotes run to the end of
//! the input and rows may have any number of columns.
use crate::error::FormatError;
use crate::model::item::{DEFAULT_PROJECT, ImportRecord};

pub const COL_SUMMARY: &str = "Summary";
pub const COL_PROJECT: &str = "Project";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_ISSUE_ID: &str = "Issue Id";
pub const COL_TAGS: &str = "Tags";
pub const COL_STATE: &str = "State";

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unquoted,
    Quoted,
}

/// Splits CSV text into rows of raw field values.
///
/// `,` separates fields, `\n`, `\r\n` and a bare `\r` end a row, and `""` inside a
/// quoted section is a literal quote. Newlines inside quotes are kept verbatim.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = ScanState::Unquoted;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            ScanState::Quoted => match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => state = ScanState::Unquoted,
                _ => field.push(c),
            },
            ScanState::Unquoted => match c {
                '"' => state = ScanState::Quoted,
                ',' => row.push(std::mem::take(&mut field)),
                '\n' | '\r' => {
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut field));
                    if !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                    }
                }
                _ => field.push(c),
            },
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Columns {
    summary: usize,
    project: usize,
    description: Option<usize>,
    issue_id: Option<usize>,
    tags: Option<usize>,
    state: Option<usize>,
}

impl Columns {
    fn resolve(header: &[String]) -> Result<Self, FormatError> {
        let find = |name: &str| header.iter().position(|h| h == name);

        let summary = find(COL_SUMMARY);
        let project = find(COL_PROJECT);
        let (Some(summary), Some(project)) = (summary, project) else {
            let missing = [(COL_SUMMARY, summary), (COL_PROJECT, project)]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(FormatError::MissingColumns(missing));
        };

        Ok(Self {
            summary,
            project,
            description: find(COL_DESCRIPTION),
            issue_id: find(COL_ISSUE_ID),
            tags: find(COL_TAGS),
            state: find(COL_STATE),
        })
    }

    fn record(&self, values: &[String]) -> Option<ImportRecord> {
        if values.len() <= self.summary {
            return None;
        }

        let cell = |idx: Option<usize>| {
            idx.and_then(|i| values.get(i))
                .map(String::as_str)
                .unwrap_or("")
        };

        let summary = values[self.summary].as_str();
        let issue_id = cell(self.issue_id);
        let title = if issue_id.is_empty() {
            summary.to_string()
        } else {
            format!("{} - {}", issue_id, summary)
        };
        if title.trim().is_empty() {
            return None;
        }

        let project = match cell(Some(self.project)) {
            "" => DEFAULT_PROJECT,
            name => name,
        };

        Some(ImportRecord {
            title,
            project: project.to_string(),
            description: cell(self.description).to_string(),
            tags: split_tags(cell(self.tags)),
            state: cell(self.state).to_string(),
        })
    }
}

/// Splits a `Tags` cell on commas, trimming pieces and dropping empty ones.
pub fn split_tags(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a CSV export into import records.
///
/// Fails when the text yields fewer than two rows or when the header lacks a
/// `Summary` or `Project` column. Data rows too short to hold a summary, and rows
/// whose title is blank, are skipped.
pub fn parse(text: &str) -> Result<Vec<ImportRecord>, FormatError> {
    let rows = parse_rows(text);
    if rows.len() < 2 {
        return Err(FormatError::TooFewRows { rows: rows.len() });
    }

    let columns = Columns::resolve(&rows[0])?;
    Ok(rows[1..]
        .iter()
        .filter_map(|values| columns.record(values))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_rows_basic_and_trailing_newline() {
        let rows = parse_rows("a,b\nc,d\n");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn test_rows_line_endings() {
        assert_eq!(
            parse_rows("a\r\nb\rc\nd"),
            vec![row(&["a"]), row(&["b"]), row(&["c"]), row(&["d"])]
        );
    }

    #[test]
    fn test_rows_escaped_quote_and_embedded_newline() {
        let rows = parse_rows("a,\"b\"\"c\",d\ne");
        assert_eq!(rows, vec![row(&["a", "b\"c", "d"]), row(&["e"])]);

        let rows = parse_rows("x,\"line 1\nline 2\r\nline 3\",y");
        assert_eq!(rows, vec![row(&["x", "line 1\nline 2\r\nline 3", "y"])]);
    }

    #[test]
    fn test_rows_strip_bom() {
        let rows = parse_rows("\u{feff}Summary,Project\nA,B");
        assert_eq!(rows[0][0], "Summary");
    }

    #[test]
    fn test_rows_unterminated_quote_runs_to_end() {
        let rows = parse_rows("a,\"open,\nstill open");
        assert_eq!(rows, vec![row(&["a", "open,\nstill open"])]);
    }

    #[test]
    fn test_rows_blank_line_is_single_empty_field() {
        assert_eq!(
            parse_rows("a\n\nb"),
            vec![row(&["a"]), row(&[""]), row(&["b"])]
        );
    }

    #[test]
    fn test_rows_trailing_comma_keeps_empty_field() {
        assert_eq!(parse_rows("a,"), vec![row(&["a", ""])]);
    }

    #[test]
    fn test_parse_requires_two_rows() {
        assert_eq!(
            parse("Summary,Project"),
            Err(FormatError::TooFewRows { rows: 1 })
        );
        assert_eq!(parse(""), Err(FormatError::TooFewRows { rows: 0 }));
    }

    #[test]
    fn test_parse_missing_required_columns() {
        assert_eq!(
            parse("Summary,Owner\nA,B"),
            Err(FormatError::MissingColumns(vec!["Project".to_string()]))
        );
        assert_eq!(
            parse("Title,Project\nA,B"),
            Err(FormatError::MissingColumns(vec!["Summary".to_string()]))
        );
        // Header matching is case-sensitive.
        assert_eq!(
            parse("summary,project\nA,B"),
            Err(FormatError::MissingColumns(vec![
                "Summary".to_string(),
                "Project".to_string()
            ]))
        );
    }

    #[test]
    fn test_parse_full_record() {
        let text = "Issue Id,Summary,Project,Description,Tags,State\n\
                    A-1,Fix bug,P1,\"multi\nline\", bug , ,ui,Open\n";
        // The unquoted Tags cell is split by the tokenizer, so only " bug " lands in Tags.
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.title, "A-1 - Fix bug");
        assert_eq!(r.project, "P1");
        assert_eq!(r.description, "multi\nline");
        assert_eq!(r.tags, vec!["bug".to_string()]);
        assert_eq!(r.state, " ");
    }

    #[test]
    fn test_parse_quoted_tags_cell() {
        let text = "Summary,Project,Tags\nTask,P,\" bug, ,ui,bug \"\n";
        let records = parse(text).unwrap();
        assert_eq!(records[0].tags, vec!["bug", "ui", "bug"]);
    }

    #[test]
    fn test_parse_defaults_and_skips() {
        let text = "Project,Summary,State\n\
                    ,No project,Open\n\
                    OnlyProject\n\
                    P2,   \n\
                    P3,Kept";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].project, DEFAULT_PROJECT);
        assert_eq!(records[0].title, "No project");
        assert_eq!(records[0].state, "Open");
        assert_eq!(records[1].project, "P3");
        assert_eq!(records[1].state, "");
        assert!(records[1].tags.is_empty());
        assert_eq!(records[1].description, "");
    }

    #[test]
    fn test_parse_empty_issue_id_uses_summary() {
        let text = "Issue Id,Summary,Project\n,Plain,P\nX-9,Keyed,P";
        let records = parse(text).unwrap();
        assert_eq!(records[0].title, "Plain");
        assert_eq!(records[1].title, "X-9 - Keyed");
    }

    #[test]
    fn test_parse_only_header_and_blank_line() {
        let records = parse("Summary,Project\n\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(""), Vec::<String>::new());
        assert_eq!(split_tags(" a ,, b,a"), vec!["a", "b", "a"]);
    }
}
