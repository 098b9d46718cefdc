//! Minimal CSV reader for two-column mapping sheets.
//!
//! Quoted cells may contain separators, doubled quotes and line breaks.

use crate::error::FormatError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag, take_while},
    character::complete::char,
    combinator::{map, value},
    multi::{many0, separated_list1},
    sequence::delimited,
};

/// One physical mapping row before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line the row starts on.
    pub line: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

fn quoted_cell(input: &str) -> IResult<&str, String> {
    map(
        delimited(
            char('"'),
            many0(alt((value("\"", tag("\"\"")), is_not("\"")))),
            char('"'),
        ),
        |parts: Vec<&str>| parts.concat(),
    )
    .parse(input)
}

fn bare_cell(input: &str) -> IResult<&str, String> {
    map(
        take_while(|c: char| c != ',' && c != '\n' && c != '\r'),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn record(input: &str) -> IResult<&str, Vec<String>> {
    separated_list1(char(','), alt((quoted_cell, bare_cell))).parse(input)
}

fn line_of(text: &str, rest: &str) -> usize {
    let consumed = text.len() - rest.len();
    text[..consumed].matches('\n').count() + 1
}

/// Splits CSV text into rows, keeping blank lines out of the result.
pub fn read_rows(text: &str) -> Result<Vec<RawRow>, FormatError> {
    let mut rows = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let line = line_of(text, rest);
        let (after, cells) = record(rest).map_err(|e| FormatError::Csv {
            line,
            message: e.to_string(),
        })?;

        rest = if let Some(r) = after.strip_prefix("\r\n") {
            r
        } else if let Some(r) = after.strip_prefix('\n') {
            r
        } else if after.is_empty() {
            after
        } else {
            return Err(FormatError::Csv {
                line: line_of(text, after),
                message: format!(
                    "unexpected characters after cell: '{}'",
                    after.chars().take(20).collect::<String>()
                ),
            });
        };

        let row = RawRow::new(line, cells);
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(rows: &[RawRow]) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|r| r.cells.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn reads_plain_rows_with_line_numbers() {
        let rows = read_rows("tag,source_path\nC.1.1,case.id\n\nD.1,patient.name\n").unwrap();
        assert_eq!(
            cells(&rows),
            vec![
                vec!["tag", "source_path"],
                vec!["C.1.1", "case.id"],
                vec!["D.1", "patient.name"],
            ]
        );
        assert_eq!(rows[2].line, 4);
    }

    #[test]
    fn quoted_cells_keep_commas_quotes_and_newlines() {
        let rows = read_rows("\"a,b\",\"say \"\"hi\"\"\"\r\n\"multi\nline\",x").unwrap();
        assert_eq!(rows[0].cells, vec!["a,b", "say \"hi\""]);
        assert_eq!(rows[1].cells, vec!["multi\nline", "x"]);
        assert_eq!(rows[1].line, 2);
    }

    #[test]
    fn empty_trailing_cell_is_counted() {
        let rows = read_rows("C.1.1,").unwrap();
        assert_eq!(rows[0].cells, vec!["C.1.1", ""]);
    }

    #[test]
    fn junk_after_quoted_cell_is_an_error() {
        let err = read_rows("ok,row\n\"a\"b,c").unwrap_err();
        assert!(matches!(err, FormatError::Csv { line: 2, .. }));
    }
}
