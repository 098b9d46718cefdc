//! Compiles a mapping table against a schema, then assembles records with it.
//!
//! Everything that can be checked without a record is checked in
//! [`Blueprint::compile`], so per-record assembly only fails on contradictions
//! that depend on the data.

use crate::draft::{DraftNode, Order, anchor_paths};
use crate::error::GenerationError;
use crate::functions::{FunctionRegistry, LeafFunction};
use crate::params::GenerationParams;
use icsr_jpath::{IndexTuple, Lookup, PathExpr, resolve};
use icsr_mapping::{MappingEntry, MappingTable};
use icsr_schema::{
    CodeTable, DECLARED_RANK_BASE, Schema, SchemaError, StaticNode, TagPath, Target, natural_cmp,
};
use icsr_tree::OutputNode;
use itertools::Itertools;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One level of element creation on the way to a leaf.
#[derive(Debug, Clone)]
struct Step {
    slot: String,
    rank: u32,
    repeated: bool,
    chain: Vec<StaticNode>,
}

/// A schema default for a slot companion that resolved to nothing.
#[derive(Debug, Clone)]
struct DefaultLeaf {
    host: Step,
    target: Target,
    value: String,
}

/// Everything needed to place the values of one mapping entry.
#[derive(Clone)]
struct LeafPlan {
    tag: String,
    source: PathExpr,
    anchor: Option<String>,
    /// Ancestor segments that create elements; transparent ones are dropped.
    steps: Vec<Step>,
    host: Step,
    target: Target,
    transform: Option<LeafFunction>,
    codes: Option<CodeTable>,
    /// Fields sharing this leaf's slot that fall back to a default.
    defaults: Vec<DefaultLeaf>,
}

impl LeafPlan {
    /// The final text of a resolved value, or `None` when it counts as absent.
    fn leaf_text(&self, value: &Lookup) -> Option<String> {
        if value.is_container() {
            log::warn!(
                "'{}': '{}' resolved to a container, not a scalar; treating as absent",
                self.tag,
                self.source
            );
            return None;
        }
        let raw = value.text()?;
        let text = match self.transform {
            Some(f) => f(&raw),
            None => raw.into_owned(),
        };
        if text.is_empty() {
            return None;
        }
        Some(match &self.codes {
            Some(codes) => codes.translate(&text),
            None => text,
        })
    }
}

/// A mapping table compiled against a schema. Immutable and shareable
/// across threads; each [`Blueprint::assemble`] call owns its own tree.
#[derive(Clone)]
pub struct Blueprint {
    skeleton: StaticNode,
    anchors: HashMap<String, Vec<Order>>,
    attribute_order: HashMap<String, usize>,
    plans: Vec<LeafPlan>,
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("root", &self.skeleton.name)
            .field("anchors", &self.anchors.keys().sorted().collect::<Vec<_>>())
            .field("tags", &self.tags().collect::<Vec<_>>())
            .finish()
    }
}

impl Blueprint {
    /// Compiles every materialised mapping entry into a leaf plan.
    ///
    /// Entries are planned by ascending depth, then natural tag order, so the
    /// result does not depend on mapping row order.
    pub fn compile(
        mapping: &MappingTable,
        schema: &Schema,
        functions: &FunctionRegistry,
    ) -> Result<Self, SchemaError> {
        schema.validate()?;

        for entry in mapping.internal() {
            log::debug!("Skipping internal tag '{}'", entry.tag());
        }

        let entries: Vec<(&MappingEntry, TagPath)> = mapping
            .materialized()
            .map(|e| Ok((e, schema.grammar.decompose(e.tag())?)))
            .collect::<Result<Vec<_>, SchemaError>>()?
            .into_iter()
            .sorted_by(|(_, a), (_, b)| {
                a.depth()
                    .cmp(&b.depth())
                    .then_with(|| natural_cmp(a.tag(), b.tag()))
            })
            .collect();

        let promoted = promote(&entries, schema)?;
        if !promoted.is_empty() {
            log::debug!(
                "Repetition promoted at: {}",
                promoted.iter().sorted_by(|a, b| natural_cmp(a, b)).join(", ")
            );
        }

        let anchors = anchor_paths(&schema.skeleton);
        let plans = entries
            .iter()
            .map(|(entry, path)| plan(entry, path, schema, functions, &promoted))
            .collect::<Result<Vec<_>, _>>()?;

        let attribute_order = schema
            .attribute_order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        log::debug!(
            "Compiled blueprint '{}' v{}: {} leaf plans",
            schema.name,
            schema.version,
            plans.len()
        );

        Ok(Self {
            skeleton: schema.skeleton.clone(),
            anchors,
            attribute_order,
            plans,
        })
    }

    /// Tags this blueprint materialises, in planning order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.plans.iter().map(|p| p.tag.as_str())
    }

    /// Builds the output tree for one record.
    ///
    /// Absent values never fail; they simply leave their elements out.
    pub fn assemble(
        &self,
        record: &Value,
        params: &GenerationParams,
    ) -> Result<OutputNode, GenerationError> {
        let mut root = DraftNode::from_static(&self.skeleton, params);
        let mut placed_with_defaults = Vec::new();

        for plan in &self.plans {
            for resolution in resolve(&plan.source, record) {
                let Some(text) = plan.leaf_text(&resolution.value) else {
                    continue;
                };
                self.place(&mut root, plan, &resolution.index, text, params)?;
                if !plan.defaults.is_empty() {
                    placed_with_defaults.push((plan, resolution.index));
                }
            }
        }

        // Defaults only fill what no mapped value claimed.
        for (plan, index) in placed_with_defaults {
            let (owner, position) = self.owner_instance(&mut root, plan, &index, params)?;
            for default in &plan.defaults {
                let host = &default.host;
                let node = owner.instance(host.rank, &host.slot, position, &host.chain, params);
                match &default.target {
                    Target::Text => {
                        node.set_text(default.value.clone());
                    }
                    Target::Attribute(name) => {
                        node.set_attribute(name, default.value.clone());
                    }
                }
            }
        }

        Ok(root.finish(&self.attribute_order))
    }

    fn place(
        &self,
        root: &mut DraftNode,
        plan: &LeafPlan,
        index: &IndexTuple,
        text: String,
        params: &GenerationParams,
    ) -> Result<(), GenerationError> {
        let expected = plan.source.placeholder_count();
        if index.len() != expected {
            return Err(GenerationError::IndexMismatch {
                tag: plan.tag.clone(),
                index: index.clone(),
                expected,
            });
        }

        let (owner, position) = self.owner_instance(root, plan, index, params)?;
        let host = &plan.host;
        let node = owner.instance(host.rank, &host.slot, position, &host.chain, params);

        log::trace!("{} {} = {:?}", plan.tag, index, text);
        let placed = match &plan.target {
            Target::Text => node.set_text(text),
            Target::Attribute(name) => node.set_attribute(name, text),
        };
        if placed {
            Ok(())
        } else {
            Err(GenerationError::DuplicateLeaf {
                tag: plan.tag.clone(),
                index: index.clone(),
            })
        }
    }

    /// Walks from the anchor through the plan's ancestor instances, creating
    /// them as needed. Returns the innermost one and the host's position.
    ///
    /// Components are consumed outer-to-inner; repeated levels left over use
    /// position 0.
    fn owner_instance<'d>(
        &self,
        root: &'d mut DraftNode,
        plan: &LeafPlan,
        index: &IndexTuple,
        params: &GenerationParams,
    ) -> Result<(&'d mut DraftNode, usize), GenerationError> {
        let mut node = match &plan.anchor {
            None => root,
            Some(anchor) => self
                .anchors
                .get(anchor)
                .and_then(|path| root.descend_mut(path))
                .ok_or_else(|| GenerationError::MissingAnchor {
                    tag: plan.tag.clone(),
                    anchor: anchor.clone(),
                })?,
        };

        let mut components = index.as_slice().iter().copied();
        let mut next_position = |repeated: bool| {
            if repeated {
                components.next().unwrap_or(0)
            } else {
                0
            }
        };
        for step in &plan.steps {
            let position = next_position(step.repeated);
            node = node.instance(step.rank, &step.slot, position, &step.chain, params);
        }
        Ok((node, next_position(plan.host.repeated)))
    }
}

/// Decides which unmarked segments repeat, across the whole table.
///
/// An entry with more placeholders than repeated segments promotes its
/// deepest unmarked ancestors that create elements, then its leaf.
fn promote(entries: &[(&MappingEntry, TagPath)], schema: &Schema) -> Result<HashSet<String>, SchemaError> {
    let mut promoted: HashSet<String> = HashSet::new();

    for (entry, path) in entries {
        let placeholders = entry.source().placeholder_count();
        let available = path
            .segments()
            .iter()
            .filter(|s| s.repeated || promoted.contains(&s.key))
            .count();
        if placeholders <= available {
            continue;
        }

        let mut needed = placeholders - available;
        let candidates: Vec<String> = path
            .ancestors()
            .iter()
            .rev()
            .filter(|s| !s.repeated && !promoted.contains(&s.key))
            .filter(|s| schema.group(&s.key).is_some_and(|g| !g.is_transparent()))
            .map(|s| s.key.clone())
            .collect();
        for key in candidates {
            if needed == 0 {
                break;
            }
            promoted.insert(key);
            needed -= 1;
        }

        let leaf = path.leaf();
        let leaf_has_host = schema.field(&leaf.key).is_some_and(|f| !f.host.is_empty());
        if needed > 0 && !leaf.repeated && leaf_has_host {
            promoted.insert(leaf.key.clone());
            needed -= 1;
        }

        if needed > 0 {
            return Err(SchemaError::Placeholder {
                tag: entry.tag().to_string(),
                placeholders,
                available: placeholders - needed,
            });
        }
    }

    Ok(promoted)
}

fn plan(
    entry: &MappingEntry,
    path: &TagPath,
    schema: &Schema,
    functions: &FunctionRegistry,
    promoted: &HashSet<String>,
) -> Result<LeafPlan, SchemaError> {
    let tag = entry.tag();
    let mut anchor = None;
    let mut steps = Vec::new();

    for (depth, segment) in path.ancestors().iter().enumerate() {
        let group = schema
            .group(&segment.key)
            .ok_or_else(|| SchemaError::UnknownGroup {
                tag: tag.to_string(),
                segment: segment.key.clone(),
            })?;
        let repeated = segment.repeated || promoted.contains(&segment.key);
        if depth == 0 {
            anchor = group.anchor.clone();
        }
        if group.is_transparent() {
            if repeated {
                return Err(SchemaError::TransparentRepeat {
                    tag: tag.to_string(),
                    segment: segment.key.clone(),
                });
            }
            continue;
        }
        steps.push(Step {
            slot: segment.key.clone(),
            rank: schema.group_rank(&segment.key).unwrap_or(DECLARED_RANK_BASE),
            repeated,
            chain: group.chain.clone(),
        });
    }

    let field = schema
        .field(tag)
        .ok_or_else(|| SchemaError::UnknownField { tag: tag.to_string() })?;
    if path.depth() == 1 {
        anchor = field.anchor.clone();
    }

    let repeated = path.leaf().repeated || promoted.contains(tag);
    if repeated && field.host.is_empty() {
        return Err(SchemaError::RepeatedLeafWithoutHost { tag: tag.to_string() });
    }

    if let Target::Attribute(attribute) = &field.target {
        let carrier = field
            .host
            .last()
            .or_else(|| steps.last().and_then(|s| s.chain.last()));
        if carrier.is_some_and(|n| n.attributes.contains_key(attribute)) {
            return Err(SchemaError::FixedAttribute {
                tag: tag.to_string(),
                attribute: attribute.clone(),
            });
        }
    }

    let transform = match &field.transform {
        Some(name) => Some(functions.get(name).ok_or_else(|| SchemaError::UnknownTransform {
            tag: tag.to_string(),
            name: name.clone(),
        })?),
        None => None,
    };

    let owner = schema.owner_of(path);
    let rank = schema.field_rank(tag).unwrap_or(DECLARED_RANK_BASE);
    let defaults = schema
        .fields
        .iter()
        .filter(|other| other.tag != tag && other.slot() == field.slot())
        .filter_map(|other| {
            let value = other.default.clone()?;
            let other_path = schema.grammar.decompose(&other.tag).ok()?;
            (schema.owner_of(&other_path) == owner).then(|| DefaultLeaf {
                host: Step {
                    slot: other.slot().to_string(),
                    rank,
                    repeated: false,
                    chain: other.host.clone(),
                },
                target: other.target.clone(),
                value,
            })
        })
        .collect();

    log::trace!("Planned {} ({}) from '{}'", tag, path, entry.source());

    Ok(LeafPlan {
        tag: tag.to_string(),
        source: entry.source().clone(),
        anchor,
        steps,
        host: Step {
            slot: field.slot().to_string(),
            rank,
            repeated,
            chain: field.host.clone(),
        },
        target: field.target.clone(),
        transform,
        codes: field.codes.clone(),
        defaults,
    })
}
