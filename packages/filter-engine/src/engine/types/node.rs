use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;
use ulid::Ulid;

use super::field::{FieldDescriptor, FilterOperator, ValueType};

/// Node ids are ulids: unique across the tree, ephemeral (regenerated on
/// rehydration when they collide) and excluded from signatures.
pub type NodeId = SmolStr;

pub(crate) fn new_node_id() -> NodeId {
    SmolStr::new(Ulid::new().to_string())
}

/// A single leaf condition: field + operator + value(s). `field_label` and
/// `value_type` are denormalized from the field catalog for display.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub id: NodeId,
    pub field_id: SmolStr,
    pub field_label: String,
    pub operator: FilterOperator,
    pub values: SmallVec<[SmolStr; 2]>,
    pub value_type: ValueType,
}

impl Filter {
    pub fn new<I, V>(field: &FieldDescriptor, operator: FilterOperator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SmolStr>,
    {
        Filter {
            id: new_node_id(),
            field_id: field.id.clone(),
            field_label: field.label.clone(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
            value_type: field.value_type,
        }
    }
}

/// Boolean combinator of a group's children.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GroupOperator {
    And,
    Or,
}

impl GroupOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupOperator::And => "and",
            GroupOperator::Or => "or",
        }
    }
}

impl fmt::Display for GroupOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// A boolean combinator over an ordered list of child nodes. Children are
/// Arc-shared so mutations rebuild only the path from the edited node to the
/// root and reuse untouched subtrees by reference.
///
/// A group may have zero children: that is "no constraint" and evaluates to
/// true for both combinators.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    pub id: NodeId,
    pub operator: GroupOperator,
    /// Negates the combined result of the children.
    #[serde(default, skip_serializing_if = "is_false")]
    pub not: bool,
    pub children: Vec<Arc<FilterNode>>,
}

impl FilterGroup {
    pub fn new(operator: GroupOperator) -> Self {
        FilterGroup {
            id: new_node_id(),
            operator,
            not: false,
            children: Vec::new(),
        }
    }

    /// The fresh tree a user starts from when opening advanced filtering.
    pub fn new_root() -> Self {
        Self::new(GroupOperator::And)
    }

    pub fn with_children(operator: GroupOperator, children: Vec<FilterNode>) -> Self {
        FilterGroup {
            id: new_node_id(),
            operator,
            not: false,
            children: children.into_iter().map(Arc::new).collect(),
        }
    }
}

/// The tagged union held in a group's children. The persisted JSON carries
/// no kind tag: a group is recognized by the presence of `children`
/// (serde tries the Group variant first), which is why `is_group` is the one
/// standardized discriminant check.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum FilterNode {
    Group(FilterGroup),
    Filter(Filter),
}

impl FilterNode {
    pub fn is_group(&self) -> bool {
        matches!(self, FilterNode::Group(_))
    }

    pub fn is_filter(&self) -> bool {
        matches!(self, FilterNode::Filter(_))
    }

    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            FilterNode::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            FilterNode::Filter(f) => Some(f),
            _ => None,
        }
    }

    pub fn id(&self) -> &NodeId {
        match self {
            FilterNode::Group(g) => &g.id,
            FilterNode::Filter(f) => &f.id,
        }
    }
}

impl From<Filter> for FilterNode {
    fn from(f: Filter) -> Self {
        FilterNode::Filter(f)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(g: FilterGroup) -> Self {
        FilterNode::Group(g)
    }
}
