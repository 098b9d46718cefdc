use icsr_jpath::DEFAULT_PLACEHOLDER;

/// Naming conventions a mapping source follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConventions {
    /// Token in a source path meaning "iterate every item".
    pub placeholder: String,
    /// Tags starting with this prefix group other tags and are never materialised.
    pub internal_prefix: String,
    /// Paths starting with this prefix are explicitly unmapped; such rows are dropped.
    pub unmapped_prefix: String,
    /// Hierarchy separator inside tags.
    pub separator: char,
}

impl MappingConventions {
    /// The placeholder without its surrounding brackets (`_ID_` for `[_ID_]`).
    pub(crate) fn placeholder_name(&self) -> &str {
        let bare = self.placeholder.trim_matches(|c| c == '[' || c == ']');
        if bare.is_empty() { &self.placeholder } else { bare }
    }

    /// Counts whole path steps spelled like the placeholder, bracketed or
    /// bare, so `items._ID_.x` counts once and `patient_ID_number` not at all.
    pub(crate) fn placeholder_mentions(&self, path: &str) -> usize {
        let name = self.placeholder_name();
        path.match_indices(name)
            .filter(|(start, _)| {
                let before = path[..*start].chars().next_back();
                let after = path[start + name.len()..].chars().next();
                matches!(before, None | Some('.' | '['))
                    && matches!(after, None | Some('.' | '[' | ']'))
            })
            .count()
    }

    pub fn is_internal(&self, tag: &str) -> bool {
        tag.starts_with(&self.internal_prefix)
    }

    pub fn is_unmapped(&self, path: &str) -> bool {
        path.is_empty() || path.starts_with(&self.unmapped_prefix)
    }
}

impl Default for MappingConventions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            internal_prefix: "__".to_string(),
            unmapped_prefix: "TBD".to_string(),
            separator: '.',
        }
    }
}
