use crate::conventions::MappingConventions;
use crate::csv::{RawRow, read_rows};
use crate::error::FormatError;
use icsr_jpath::{PathExpr, parse_path};
use std::collections::HashMap;

const HEADER_NAMES: [&str; 2] = ["tag", "e2b_tag"];

/// One materialisable (or internal) tag and where its value comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    tag: String,
    source: PathExpr,
    is_internal: bool,
    line: usize,
}

impl MappingEntry {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn source(&self) -> &PathExpr {
        &self.source
    }

    /// True when the source path contains at least one placeholder.
    pub fn is_repetitive(&self) -> bool {
        self.source.is_repetitive()
    }

    pub fn is_internal(&self) -> bool {
        self.is_internal
    }

    /// Line of the mapping source this entry was read from.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Immutable tag -> source path table, unique by tag, in source order.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    by_tag: HashMap<String, usize>,
    conventions: MappingConventions,
}

impl MappingTable {
    /// Builds a table from raw rows.
    ///
    /// Rows whose path is empty or carries the unmapped prefix are dropped.
    /// Any other malformed row fails the whole table.
    pub fn parse<I>(rows: I, conventions: MappingConventions) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut table = Self {
            entries: Vec::new(),
            by_tag: HashMap::new(),
            conventions,
        };

        for row in rows {
            if row.is_blank() {
                continue;
            }
            if row.cells.len() != 2 {
                return Err(FormatError::ColumnCount {
                    line: row.line,
                    found: row.cells.len(),
                });
            }

            let tag = row.cells[0].trim();
            let path = row.cells[1].trim();
            if tag.is_empty() {
                return Err(FormatError::EmptyTag { line: row.line });
            }
            if table.conventions.is_unmapped(path) {
                log::debug!("line {}: '{}' is unmapped, skipping", row.line, tag);
                continue;
            }

            table.insert(row.line, tag, path)?;
        }

        log::debug!(
            "Loaded mapping table with {} entries ({} internal)",
            table.entries.len(),
            table.internal().count()
        );
        Ok(table)
    }

    /// Reads a CSV mapping sheet. A leading header row (`tag` or `e2b_tag`
    /// in the first column) is skipped.
    pub fn from_csv_str(text: &str, conventions: MappingConventions) -> Result<Self, FormatError> {
        let mut rows = read_rows(text)?;
        let has_header = rows
            .first()
            .and_then(|r| r.cells.first())
            .is_some_and(|c| HEADER_NAMES.iter().any(|h| c.trim().eq_ignore_ascii_case(h)));
        if has_header {
            rows.remove(0);
        }
        Self::parse(rows, conventions)
    }

    /// Builds a table from `(tag, path)` pairs, numbering them from line 1.
    pub fn from_pairs<'a, I>(pairs: I, conventions: MappingConventions) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let rows = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (tag, path))| RawRow::new(i + 1, vec![tag.to_string(), path.to_string()]));
        Self::parse(rows, conventions)
    }

    fn insert(&mut self, line: usize, tag: &str, path: &str) -> Result<(), FormatError> {
        if let Some(&idx) = self.by_tag.get(tag) {
            return Err(FormatError::DuplicateTag {
                line,
                tag: tag.to_string(),
                first_line: self.entries[idx].line,
            });
        }

        let source =
            parse_path(path, &self.conventions.placeholder).map_err(|source| FormatError::Path {
                line,
                tag: tag.to_string(),
                source,
            })?;

        // A bare `_ID_` step that did not parse as `[_ID_]` is a misspelt placeholder.
        let mentions = self.conventions.placeholder_mentions(path);
        if mentions != source.placeholder_count() {
            return Err(FormatError::Placeholder {
                line,
                tag: tag.to_string(),
                path: path.to_string(),
                placeholder: self.conventions.placeholder.clone(),
            });
        }

        self.by_tag.insert(tag.to_string(), self.entries.len());
        self.entries.push(MappingEntry {
            tag: tag.to_string(),
            source,
            is_internal: self.conventions.is_internal(tag),
            line,
        });
        Ok(())
    }

    pub fn get(&self, tag: &str) -> Option<&MappingEntry> {
        self.by_tag.get(tag).map(|&i| &self.entries[i])
    }

    /// All entries in source order.
    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter()
    }

    /// Entries that produce output.
    pub fn materialized(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter().filter(|e| !e.is_internal)
    }

    pub fn internal(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter().filter(|e| e.is_internal)
    }

    /// Entries equal to `prefix` or nested below it in the tag hierarchy,
    /// internal ones included. Lets callers inspect what a loaded table maps
    /// for one section, e.g. before swapping in a partial custom mapping.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a MappingEntry> + 'a {
        let sep = self.conventions.separator;
        self.entries.iter().filter(move |e| {
            e.tag == prefix
                || e.tag
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(sep))
        })
    }

    pub fn conventions(&self) -> &MappingConventions {
        &self.conventions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
