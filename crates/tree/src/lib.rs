//! Output Document Tree
//! The finished, owned element tree produced by one generation pass and
//! consumed by the serializer. Children are stored in document order and
//! attributes in their canonical order; nothing here re-sorts.

// --- Shared Types ---

/// A string type for element names, attribute values and text.
pub type TextStr = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: TextStr,
    pub value: TextStr,
}

// --- Main Node ---

/// One element of the output document. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputNode {
    pub name: TextStr,
    pub attributes: Vec<Attribute>,
    pub text: Option<TextStr>,
    pub children: Vec<OutputNode>,
}

impl OutputNode {
    pub fn new(name: impl Into<TextStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<TextStr>, value: impl Into<TextStr>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_text(mut self, text: impl Into<TextStr>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: OutputNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a OutputNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follows a `/`-separated chain of child names, taking the first match at each step.
    pub fn find(&self, path: &str) -> Option<&OutputNode> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |node, name| node.children.iter().find(|c| c.name == name))
    }

    /// Every node reachable through a `/`-separated chain of child names.
    pub fn find_all(&self, path: &str) -> Vec<&OutputNode> {
        let mut current = vec![self];
        for name in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|n| n.children.iter().filter(|c| c.name == name))
                .collect();
        }
        current
    }

    /// Counts this node and all of its descendants.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(OutputNode::node_count).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.text.is_none() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OutputNode {
        OutputNode::new("doc")
            .with_child(
                OutputNode::new("item")
                    .with_attribute("code", "1")
                    .with_child(OutputNode::new("name").with_text("a")),
            )
            .with_child(
                OutputNode::new("item")
                    .with_attribute("code", "2")
                    .with_child(OutputNode::new("name").with_text("b")),
            )
    }

    #[test]
    fn find_follows_first_match() {
        let doc = sample();
        assert_eq!(doc.find("item/name").and_then(|n| n.text.as_deref()), Some("a"));
        assert!(doc.find("item/missing").is_none());
        assert_eq!(doc.find("").map(|n| n.name.as_str()), Some("doc"));
    }

    #[test]
    fn find_all_fans_out() {
        let doc = sample();
        let names: Vec<_> = doc
            .find_all("item/name")
            .iter()
            .filter_map(|n| n.text.as_deref())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(doc.children_named("item").count(), 2);
        assert_eq!(doc.children[1].attribute("code"), Some("2"));
        assert_eq!(doc.node_count(), 5);
    }
}
