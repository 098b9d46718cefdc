use crate::error::SchemaError;
use crate::grammar::{TagGrammar, TagPath};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A fixed element: part of the skeleton, of a group chain or of a field host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticNode {
    pub name: String,
    /// Fixed attributes. A value written as `{param}` is filled from the
    /// generation parameters and dropped when the parameter is missing.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<StaticNode>,
    /// Attachment point name for top-level groups and fields.
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

impl StaticNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
            anchor: None,
            order: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: StaticNode) -> Self {
        self.children.push(child);
        self
    }
}

/// The element chain one instance of an ancestor segment creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub tag: String,
    /// Empty means transparent: the segment adds no element of its own.
    #[serde(default)]
    pub chain: Vec<StaticNode>,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

impl GroupDef {
    pub fn is_transparent(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Where a leaf value lands on its host element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Text,
    Attribute(String),
}

/// Case-insensitive value translation applied to a leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeTable {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub default: Option<String>,
}

impl CodeTable {
    /// Looks `raw` up; a miss falls back to the default, then to `raw` itself.
    pub fn translate(&self, raw: &str) -> String {
        let needle = raw.trim();
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(needle))
            .map(|(_, v)| v.clone())
            .or_else(|| self.default.clone())
            .unwrap_or_else(|| raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub tag: String,
    /// Element chain under the ancestor instance that carries the value.
    #[serde(default)]
    pub host: Vec<StaticNode>,
    #[serde(default)]
    pub target: Target,
    /// Fields of one ancestor instance with the same slot share one host.
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(default)]
    pub codes: Option<CodeTable>,
    /// Written when another field of the same slot placed a value here but
    /// this one resolved to nothing.
    #[serde(default)]
    pub default: Option<String>,
}

impl FieldDef {
    pub fn slot(&self) -> &str {
        self.slot.as_deref().unwrap_or(&self.tag)
    }
}

/// Versioned description of the output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub grammar: TagGrammar,
    #[serde(default)]
    pub attribute_order: Vec<String>,
    pub skeleton: StaticNode,
    #[serde(default)]
    pub groups: Vec<GroupDef>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

const BUILTIN_E2B_R3: &str = include_str!("../assets/e2b_r3.json");

/// Rank given to declared groups and fields without an explicit `order`.
pub const DECLARED_RANK_BASE: u32 = 1_000;

impl Schema {
    /// Parses and validates a schema from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.validate()?;
        log::debug!(
            "Loaded schema '{}' v{} ({} groups, {} fields)",
            schema.name,
            schema.version,
            schema.groups.len(),
            schema.fields.len()
        );
        Ok(schema)
    }

    /// The embedded E2B R3 ICSR schema.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json_str(BUILTIN_E2B_R3)
    }

    pub fn group(&self, tag: &str) -> Option<&GroupDef> {
        self.groups.iter().find(|g| g.tag == tag)
    }

    pub fn field(&self, tag: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Sibling rank of a group: its explicit order, else its declaration index.
    pub fn group_rank(&self, tag: &str) -> Option<u32> {
        let (i, g) = self.groups.iter().enumerate().find(|(_, g)| g.tag == tag)?;
        Some(g.order.unwrap_or(DECLARED_RANK_BASE + i as u32))
    }

    /// Sibling rank of a field's host slot.
    ///
    /// Fields sharing a slot under the same owner share the lowest rank among them.
    pub fn field_rank(&self, tag: &str) -> Option<u32> {
        let field = self.field(tag)?;
        let owner = self.owner_of(&self.grammar.decompose(tag).ok()?);
        let base = DECLARED_RANK_BASE + self.groups.len() as u32;
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.slot() == field.slot())
            .filter(|(_, f)| {
                self.grammar
                    .decompose(&f.tag)
                    .is_ok_and(|p| self.owner_of(&p) == owner)
            })
            .map(|(i, f)| f.order.unwrap_or(base + i as u32))
            .min()
    }

    /// Names the element a leaf ends up under: the closest ancestor with a
    /// chain of its own, else `@anchor` of the top-level segment.
    pub fn owner_of(&self, path: &TagPath) -> String {
        let owning = path
            .ancestors()
            .iter()
            .rev()
            .find(|seg| self.group(&seg.key).is_some_and(|g| !g.is_transparent()));
        if let Some(seg) = owning {
            return seg.key.clone();
        }

        let top = &path.segments()[0].key;
        let anchor = if path.depth() == 1 {
            self.field(top).and_then(|f| f.anchor.as_deref())
        } else {
            self.group(top).and_then(|g| g.anchor.as_deref())
        };
        format!("@{}", anchor.unwrap_or_default())
    }

    /// Position of an attribute name in the canonical attribute order.
    pub fn attribute_rank(&self, name: &str) -> usize {
        self.attribute_order
            .iter()
            .position(|a| a == name)
            .unwrap_or(self.attribute_order.len())
    }

    /// Anchor ids declared in the skeleton.
    pub fn anchors(&self) -> Vec<&str> {
        fn walk<'a>(node: &'a StaticNode, out: &mut Vec<&'a str>) {
            if let Some(a) = &node.anchor {
                out.push(a);
            }
            for child in &node.children {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.skeleton, &mut out);
        out
    }

    /// Structural checks that do not depend on a mapping table.
    pub fn validate(&self) -> Result<(), SchemaError> {
        fn check_names(node: &StaticNode, owner: &str) -> Result<(), SchemaError> {
            if node.name.trim().is_empty() {
                return Err(SchemaError::Invalid(format!("empty element name in {owner}")));
            }
            node.children.iter().try_for_each(|c| check_names(c, owner))
        }

        if self.name.trim().is_empty() {
            return Err(SchemaError::Invalid("schema has no name".to_string()));
        }
        check_names(&self.skeleton, "skeleton")?;

        let anchors = self.anchors();
        let mut seen = HashSet::new();
        for a in &anchors {
            if !seen.insert(*a) {
                return Err(SchemaError::Invalid(format!("anchor '{a}' declared twice")));
            }
        }

        let mut tags = HashSet::new();
        for group in &self.groups {
            self.grammar.decompose(&group.tag)?;
            if !tags.insert(group.tag.as_str()) {
                return Err(SchemaError::Invalid(format!("group '{}' defined twice", group.tag)));
            }
            group.chain.iter().try_for_each(|n| check_names(n, &group.tag))?;
            self.check_anchor(&group.tag, group.anchor.as_deref(), &anchors)?;
        }

        let mut hosts: HashMap<(String, &str), &str> = HashMap::new();
        let mut field_tags = HashSet::new();
        for field in &self.fields {
            let path = self.grammar.decompose(&field.tag)?;
            if !field_tags.insert(field.tag.as_str()) {
                return Err(SchemaError::Invalid(format!("field '{}' defined twice", field.tag)));
            }
            field.host.iter().try_for_each(|n| check_names(n, &field.tag))?;
            self.check_anchor(&field.tag, field.anchor.as_deref(), &anchors)?;

            if let (Target::Attribute(attribute), Some(host)) = (&field.target, field.host.last()) {
                if host.attributes.contains_key(attribute) {
                    return Err(SchemaError::FixedAttribute {
                        tag: field.tag.clone(),
                        attribute: attribute.clone(),
                    });
                }
            }

            // Fields sharing a slot share the outermost host element.
            let outer = field.host.first().map(|n| n.name.as_str()).unwrap_or_default();
            let key = (self.owner_of(&path), field.slot());
            match hosts.get(&key) {
                Some(existing) if *existing != outer => {
                    return Err(SchemaError::SlotConflict {
                        tag: field.tag.clone(),
                        slot: field.slot().to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    hosts.insert(key, outer);
                }
            }
        }

        Ok(())
    }

    fn check_anchor(&self, tag: &str, anchor: Option<&str>, anchors: &[&str]) -> Result<(), SchemaError> {
        match anchor {
            Some(a) if !anchors.contains(&a) => Err(SchemaError::UnknownAnchor {
                tag: tag.to_string(),
                anchor: a.to_string(),
            }),
            Some(_) if self.grammar.decompose(tag)?.depth() > 1 => {
                Err(SchemaError::NestedAnchor { tag: tag.to_string() })
            }
            _ => Ok(()),
        }
    }
}
