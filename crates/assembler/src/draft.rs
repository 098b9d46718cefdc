//! The mutable tree built during one assembly pass.
//!
//! Every node keeps its children in a map keyed by canonical order, so the
//! finished document does not depend on the order leaves were placed in.

use crate::params::GenerationParams;
use icsr_schema::StaticNode;
use icsr_tree::{Attribute, OutputNode};
use std::collections::{BTreeMap, HashMap};

/// Rank of a nested chain element without an explicit `order`: after the
/// fixed children of its parent.
pub(crate) const NESTED_RANK: u32 = 500;

/// Sibling key: rank first, then slot, then repetition position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Order {
    rank: u32,
    slot: String,
    position: usize,
}

impl Order {
    /// Key of the `index`-th fixed child of a static node.
    fn fixed(index: usize, node: &StaticNode) -> Self {
        Self {
            rank: node.order.unwrap_or(index as u32),
            slot: format!("#{index}"),
            position: 0,
        }
    }

    fn instance(rank: u32, slot: &str, position: usize) -> Self {
        Self {
            rank,
            slot: slot.to_string(),
            position,
        }
    }

    /// Chain elements below the first are shared by name within one instance.
    fn nested(slot: &str, depth: usize, node: &StaticNode) -> Self {
        Self {
            rank: node.order.unwrap_or(NESTED_RANK),
            slot: format!("{slot}#{depth}#{}", node.name),
            position: 0,
        }
    }
}

/// Paths from the skeleton root to every anchored node.
pub(crate) fn anchor_paths(skeleton: &StaticNode) -> HashMap<String, Vec<Order>> {
    fn walk(node: &StaticNode, path: &mut Vec<Order>, out: &mut HashMap<String, Vec<Order>>) {
        if let Some(anchor) = &node.anchor {
            out.insert(anchor.clone(), path.clone());
        }
        for (i, child) in node.children.iter().enumerate() {
            path.push(Order::fixed(i, child));
            walk(child, path, out);
            path.pop();
        }
    }

    let mut out = HashMap::new();
    walk(skeleton, &mut Vec::new(), &mut out);
    out
}

#[derive(Debug, Default)]
pub(crate) struct DraftNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: BTreeMap<Order, DraftNode>,
}

impl DraftNode {
    pub(crate) fn from_static(node: &StaticNode, params: &GenerationParams) -> Self {
        let attributes = node
            .attributes
            .iter()
            .filter_map(|(name, value)| params.fill(value).map(|v| (name.clone(), v)))
            .collect();
        let children = node
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| (Order::fixed(i, child), DraftNode::from_static(child, params)))
            .collect();

        Self {
            name: node.name.clone(),
            attributes,
            text: node.text.clone(),
            children,
        }
    }

    pub(crate) fn descend_mut(&mut self, path: &[Order]) -> Option<&mut DraftNode> {
        let mut node = self;
        for key in path {
            node = node.children.get_mut(key)?;
        }
        Some(node)
    }

    /// Locates or creates the element chain of one instance and returns its
    /// innermost element. An empty chain returns `self`.
    pub(crate) fn instance(
        &mut self,
        rank: u32,
        slot: &str,
        position: usize,
        chain: &[StaticNode],
        params: &GenerationParams,
    ) -> &mut DraftNode {
        let mut node = self;
        for (depth, element) in chain.iter().enumerate() {
            let key = if depth == 0 {
                Order::instance(rank, slot, position)
            } else {
                Order::nested(slot, depth, element)
            };
            node = node
                .children
                .entry(key)
                .or_insert_with(|| DraftNode::from_static(element, params));
        }
        node
    }

    /// Returns `false` when the text is already set.
    pub(crate) fn set_text(&mut self, value: String) -> bool {
        if self.text.is_some() {
            return false;
        }
        self.text = Some(value);
        true
    }

    /// Returns `false` when the attribute is already present.
    pub(crate) fn set_attribute(&mut self, name: &str, value: String) -> bool {
        if self.attributes.iter().any(|(n, _)| n == name) {
            return false;
        }
        self.attributes.push((name.to_string(), value));
        true
    }

    /// Freezes the draft, putting attributes in canonical order.
    pub(crate) fn finish(self, attribute_order: &HashMap<String, usize>) -> OutputNode {
        let rank = |name: &str| {
            attribute_order
                .get(name)
                .copied()
                .unwrap_or(attribute_order.len())
        };
        let mut attributes = self.attributes;
        attributes.sort_by(|(a, _), (b, _)| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));

        OutputNode {
            name: self.name,
            attributes: attributes
                .into_iter()
                .map(|(name, value)| Attribute { name, value })
                .collect(),
            text: self.text,
            children: self
                .children
                .into_values()
                .map(|child| child.finish(attribute_order))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_are_ordered_by_rank_then_position() {
        let params = GenerationParams::new();
        let mut root = DraftNode::from_static(&StaticNode::new("doc"), &params);
        let item = [StaticNode::new("item")];
        root.instance(20, "b", 1, &item, &params).set_text("b1".into());
        root.instance(10, "a", 0, &item, &params).set_text("a0".into());
        root.instance(20, "b", 0, &item, &params).set_text("b0".into());

        let doc = root.finish(&HashMap::new());
        let texts: Vec<_> = doc.children.iter().filter_map(|c| c.text.as_deref()).collect();
        assert_eq!(texts, vec!["a0", "b0", "b1"]);
    }

    #[test]
    fn instance_lookup_is_idempotent() {
        let params = GenerationParams::new();
        let mut root = DraftNode::from_static(&StaticNode::new("doc"), &params);
        let chain = [StaticNode::new("outer"), StaticNode::new("inner")];
        assert!(root.instance(1, "x", 0, &chain, &params).set_attribute("a", "1".into()));
        assert!(!root.instance(1, "x", 0, &chain, &params).set_attribute("a", "2".into()));

        let doc = root.finish(&HashMap::new());
        assert_eq!(doc.node_count(), 3);
    }

    #[test]
    fn attributes_follow_configured_order() {
        let params = GenerationParams::new().with("id", "42");
        let node = StaticNode::new("id")
            .with_attribute("root", "1.2.3")
            .with_attribute("extension", "{id}")
            .with_attribute("zeta", "z")
            .with_attribute("alpha", "a")
            .with_attribute("missing", "{nope}");
        let order: HashMap<String, usize> =
            [("extension".to_string(), 0), ("root".to_string(), 1)].into_iter().collect();

        let out = DraftNode::from_static(&node, &params).finish(&order);
        let names: Vec<_> = out.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["extension", "root", "alpha", "zeta"]);
        assert_eq!(out.attribute("extension"), Some("42"));
    }
}
