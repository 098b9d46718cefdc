use std::collections::BTreeMap;

/// Named values substituted into fixed attributes written as `{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationParams {
    values: BTreeMap<String, String>,
}

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Fills a fixed attribute value. `None` means the attribute is dropped.
    pub(crate) fn fill(&self, template: &str) -> Option<String> {
        match template
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(name) => self.get(name).map(str::to_string),
            None => Some(template.to_string()),
        }
    }
}
