//! Structural flattening of filter trees.
//!
//! Flattening collects every filter leaf in traversal order, ignoring group
//! combinators and negation: a leaf under a negated `or` branch still shows
//! up as a chip. Semantic interpretation is the evaluator's job.

use super::types::{Filter, FilterGroup, FilterNode, GroupOperator};

/// All filter leaves in the subtree, depth-first, in children order.
pub fn flatten_filter_group(group: &FilterGroup) -> Vec<&Filter> {
    let mut out = Vec::new();
    collect(group, &mut out);
    out
}

fn collect<'a>(group: &'a FilterGroup, out: &mut Vec<&'a Filter>) {
    for child in &group.children {
        match child.as_ref() {
            FilterNode::Filter(f) => out.push(f),
            FilterNode::Group(sub) => collect(sub, out),
        }
    }
}

/// Number of filter leaves in the subtree.
pub fn filter_count(group: &FilterGroup) -> usize {
    group
        .children
        .iter()
        .map(|child| match child.as_ref() {
            FilterNode::Filter(_) => 1,
            FilterNode::Group(sub) => filter_count(sub),
        })
        .sum()
}

/// True iff the tree cannot be losslessly shown as a flat AND-list of
/// filters: it nests a group, negates the root, or disjoins more than one
/// child at the root. Drives the "advanced filter active" badge only.
pub fn is_advanced_filter_group(group: &FilterGroup) -> bool {
    group.not
        || group.children.iter().any(|child| child.is_group())
        || (group.operator == GroupOperator::Or && group.children.len() > 1)
}
