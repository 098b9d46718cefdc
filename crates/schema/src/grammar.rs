//! Hierarchical tag decomposition.
//!
//! A tag such as `G.k.4.r.1a` is a `.`-separated list of segments. The first
//! segment names a section, later segments are numbered sub-items with an
//! optional letter suffix, and repetition markers (`i`, `j`, `k`, `r`) fold
//! into the segment before them, marking it as repeated.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagGrammar {
    pub separator: char,
    pub markers: Vec<String>,
}

impl Default for TagGrammar {
    fn default() -> Self {
        Self {
            separator: '.',
            markers: ["i", "j", "k", "r"].iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// One level of a decomposed tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    /// The tag prefix identifying this level, e.g. `E.i` or `E.i.2`.
    pub key: String,
    pub repeated: bool,
}

/// A decomposed tag: ancestors first, leaf last. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPath {
    tag: String,
    segments: Vec<Segment>,
}

impl TagPath {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn ancestors(&self) -> &[Segment] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn leaf(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    /// Key of the closest ancestor, or `None` for a top-level leaf.
    pub fn parent_key(&self) -> Option<&str> {
        self.ancestors().last().map(|s| s.key.as_str())
    }

    pub fn marked_repetitions(&self) -> usize {
        self.segments.iter().filter(|s| s.repeated).count()
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .segments
            .iter()
            .map(|s| {
                if s.repeated {
                    format!("{}*", s.key)
                } else {
                    s.key.clone()
                }
            })
            .collect();
        write!(f, "{}", keys.join(" > "))
    }
}

impl TagGrammar {
    fn is_marker(&self, part: &str) -> bool {
        self.markers.iter().any(|m| m == part)
    }

    fn is_section(part: &str) -> bool {
        let mut chars = part.chars();
        chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_alphanumeric())
    }

    fn is_item(part: &str) -> bool {
        let digits = part.chars().take_while(|c| c.is_ascii_digit()).count();
        digits > 0 && part[digits..].chars().all(|c| c.is_ascii_lowercase())
    }

    /// Decomposes `tag` into its hierarchy segments.
    pub fn decompose(&self, tag: &str) -> Result<TagPath, SchemaError> {
        let fail = |reason: String| SchemaError::TagGrammar {
            tag: tag.to_string(),
            reason,
        };

        let mut parts = tag.split(self.separator);
        let first = parts.next().unwrap_or_default();
        if first.is_empty() {
            return Err(fail("empty segment".to_string()));
        }
        if self.is_marker(first) {
            return Err(fail(format!("marker '{first}' cannot start a tag")));
        }
        if !Self::is_section(first) {
            return Err(fail(format!("'{first}' is not a section name")));
        }

        let mut segments = vec![Segment {
            key: first.to_string(),
            repeated: false,
        }];
        let mut prefix = first.to_string();
        let mut after_marker = false;

        for part in parts {
            prefix.push(self.separator);
            prefix.push_str(part);

            if part.is_empty() {
                return Err(fail("empty segment".to_string()));
            } else if self.is_marker(part) {
                if after_marker {
                    return Err(fail(format!("two markers in a row before '{part}'")));
                }
                if let Some(last) = segments.last_mut() {
                    last.key = prefix.clone();
                    last.repeated = true;
                }
                after_marker = true;
            } else if Self::is_item(part) {
                segments.push(Segment {
                    key: prefix.clone(),
                    repeated: false,
                });
                after_marker = false;
            } else {
                return Err(fail(format!("unexpected segment '{part}'")));
            }
        }

        Ok(TagPath {
            tag: tag.to_string(),
            segments,
        })
    }
}

/// Orders tags naturally: digit runs compare numerically, everything else
/// compares character by character.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let da = a.chars().take_while(char::is_ascii_digit).count();
                let db = b.chars().take_while(char::is_ascii_digit).count();
                let (na, nb) = (a[..da].trim_start_matches('0'), b[..db].trim_start_matches('0'));
                let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
                if ord != Ordering::Equal {
                    return ord;
                }
                a = &a[da..];
                b = &b[db..];
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a = &a[x.len_utf8()..];
                b = &b[y.len_utf8()..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(tag: &str) -> Vec<(String, bool)> {
        TagGrammar::default()
            .decompose(tag)
            .unwrap()
            .segments()
            .iter()
            .map(|s| (s.key.clone(), s.repeated))
            .collect()
    }

    #[test]
    fn markers_fold_into_previous_segment() {
        assert_eq!(
            shape("E.i.2.1b"),
            vec![
                ("E.i".to_string(), true),
                ("E.i.2".to_string(), false),
                ("E.i.2.1b".to_string(), false),
            ]
        );
        assert_eq!(
            shape("G.k.4.r.1a"),
            vec![
                ("G.k".to_string(), true),
                ("G.k.4.r".to_string(), true),
                ("G.k.4.r.1a".to_string(), false),
            ]
        );
        assert_eq!(
            shape("A.2.r"),
            vec![("A".to_string(), false), ("A.2.r".to_string(), true)]
        );
    }

    #[test]
    fn depth_equals_nesting() {
        let g = TagGrammar::default();
        assert_eq!(g.decompose("H.1").unwrap().depth(), 2);
        assert_eq!(g.decompose("FDA").unwrap().depth(), 1);
        let path = g.decompose("C.1.1").unwrap();
        assert_eq!(path.parent_key(), Some("C.1"));
        assert_eq!(path.leaf().key, "C.1.1");
    }

    #[test]
    fn rejects_malformed_tags() {
        let g = TagGrammar::default();
        for tag in ["", "i.1", "e.1", "A..1", "A.i.r", "A.1-2", "A.B", "A.1A", "A."] {
            assert!(
                matches!(g.decompose(tag), Err(SchemaError::TagGrammar { .. })),
                "{tag} should be rejected"
            );
        }
    }

    #[test]
    fn natural_order() {
        let mut tags = vec!["E.i.10", "E.i.2", "E.i.1.1b", "E.i.1.1a", "D.2.2b", "E.i.1"];
        tags.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            tags,
            vec!["D.2.2b", "E.i.1", "E.i.1.1a", "E.i.1.1b", "E.i.2", "E.i.10"]
        );
    }
}
