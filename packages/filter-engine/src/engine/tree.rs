//! Immutable mutation operations over filter trees.
//!
//! Every operation takes the current root group and returns a new one; the
//! input is never mutated. All operations are total: a target id that no
//! longer exists (the UI can race edits against background reloads) is
//! absorbed as a no-op instead of surfacing an error into render.
//!
//! The six operations are instances of one generic first-match rewrite walk
//! so that matching and no-op semantics cannot drift apart per operation.

use std::sync::Arc;
use tracing::debug;

use super::types::{Filter, FilterGroup, FilterNode, GroupOperator};

/// Partial update shallow-merged into a group by [`update_group_in_group`].
/// `children` is only replaced when explicitly included.
#[derive(Clone, Debug, Default)]
pub struct GroupPatch {
    pub operator: Option<GroupOperator>,
    pub not: Option<bool>,
    pub children: Option<Vec<Arc<FilterNode>>>,
}

impl GroupPatch {
    fn apply(&self, group: &FilterGroup) -> FilterGroup {
        FilterGroup {
            id: group.id.clone(),
            operator: self.operator.unwrap_or(group.operator),
            not: self.not.unwrap_or(group.not),
            children: self
                .children
                .clone()
                .unwrap_or_else(|| group.children.clone()),
        }
    }
}

fn rebuild(group: &FilterGroup, children: Vec<Arc<FilterNode>>) -> FilterGroup {
    FilterGroup {
        id: group.id.clone(),
        operator: group.operator,
        not: group.not,
        children,
    }
}

/// Depth-first walk that applies `edit` at each group and stops at the first
/// match, rebuilding only the ancestor chain of the edited node. Untouched
/// sibling subtrees are returned by reference (Arc clone), not copied.
/// Returns `None` when no group accepted the edit.
fn rewrite_first<F>(group: &FilterGroup, edit: &F) -> Option<FilterGroup>
where
    F: Fn(&FilterGroup) -> Option<FilterGroup>,
{
    if let Some(rewritten) = edit(group) {
        return Some(rewritten);
    }
    for (idx, child) in group.children.iter().enumerate() {
        if let FilterNode::Group(sub) = child.as_ref() {
            if let Some(new_sub) = rewrite_first(sub, edit) {
                let mut children = group.children.clone();
                children[idx] = Arc::new(FilterNode::Group(new_sub));
                return Some(rebuild(group, children));
            }
        }
    }
    None
}

/// Appends `filter` to the children of the group with id `target_group_id`
/// (the root included). No-op if no such group exists.
pub fn add_filter_to_group(
    root: &FilterGroup,
    filter: Filter,
    target_group_id: &str,
) -> FilterGroup {
    rewrite_first(root, &|group| {
        if group.id != target_group_id {
            return None;
        }
        let mut children = group.children.clone();
        children.push(Arc::new(FilterNode::Filter(filter.clone())));
        Some(rebuild(group, children))
    })
    .unwrap_or_else(|| {
        debug!(target_group_id, "add_filter target not found; tree unchanged");
        root.clone()
    })
}

/// Replaces the filter whose id matches `filter.id`, keeping its position in
/// its parent's children. No-op if not found.
pub fn update_filter_in_group(root: &FilterGroup, filter: Filter) -> FilterGroup {
    rewrite_first(root, &|group| {
        let idx = group.children.iter().position(
            |child| matches!(child.as_ref(), FilterNode::Filter(f) if f.id == filter.id),
        )?;
        let mut children = group.children.clone();
        children[idx] = Arc::new(FilterNode::Filter(filter.clone()));
        Some(rebuild(group, children))
    })
    .unwrap_or_else(|| {
        debug!(filter_id = %filter.id, "update_filter target not found; tree unchanged");
        root.clone()
    })
}

/// Removes the filter with the given id from its parent's children, wherever
/// it occurs. Removing the last child of a group leaves the (valid) empty
/// group in place. No-op if not found.
pub fn remove_filter_from_group(root: &FilterGroup, filter_id: &str) -> FilterGroup {
    rewrite_first(root, &|group| {
        let idx = group.children.iter().position(
            |child| matches!(child.as_ref(), FilterNode::Filter(f) if f.id == filter_id),
        )?;
        let mut children = group.children.clone();
        children.remove(idx);
        Some(rebuild(group, children))
    })
    .unwrap_or_else(|| {
        debug!(filter_id, "remove_filter target not found; tree unchanged");
        root.clone()
    })
}

/// Appends `new_group` as a child of the group with id `target_group_id`.
/// No-op if the target does not exist.
pub fn add_group_to_group(
    root: &FilterGroup,
    new_group: FilterGroup,
    target_group_id: &str,
) -> FilterGroup {
    rewrite_first(root, &|group| {
        if group.id != target_group_id {
            return None;
        }
        let mut children = group.children.clone();
        children.push(Arc::new(FilterNode::Group(new_group.clone())));
        Some(rebuild(group, children))
    })
    .unwrap_or_else(|| {
        debug!(target_group_id, "add_group target not found; tree unchanged");
        root.clone()
    })
}

/// Removes the group with the given id from its parent's children. The root
/// has no parent and therefore can never be removed here; passing the root's
/// id is a no-op.
pub fn remove_group_from_group(root: &FilterGroup, group_id: &str) -> FilterGroup {
    rewrite_first(root, &|group| {
        let idx = group.children.iter().position(
            |child| matches!(child.as_ref(), FilterNode::Group(g) if g.id == group_id),
        )?;
        let mut children = group.children.clone();
        children.remove(idx);
        Some(rebuild(group, children))
    })
    .unwrap_or_else(|| {
        debug!(group_id, "remove_group target not found; tree unchanged");
        root.clone()
    })
}

/// Shallow-merges `patch` into the group with the given id (the root
/// included). No-op if not found.
pub fn update_group_in_group(root: &FilterGroup, group_id: &str, patch: &GroupPatch) -> FilterGroup {
    rewrite_first(root, &|group| {
        (group.id == group_id).then(|| patch.apply(group))
    })
    .unwrap_or_else(|| {
        debug!(group_id, "update_group target not found; tree unchanged");
        root.clone()
    })
}

/// Read-only lookup of a group by id, the root included.
pub fn find_group<'a>(root: &'a FilterGroup, group_id: &str) -> Option<&'a FilterGroup> {
    if root.id == group_id {
        return Some(root);
    }
    root.children
        .iter()
        .filter_map(|child| child.as_group())
        .find_map(|sub| find_group(sub, group_id))
}

/// Read-only lookup of a filter leaf by id.
pub fn find_filter<'a>(root: &'a FilterGroup, filter_id: &str) -> Option<&'a Filter> {
    for child in &root.children {
        match child.as_ref() {
            FilterNode::Filter(f) if f.id == filter_id => return Some(f),
            FilterNode::Group(sub) => {
                if let Some(found) = find_filter(sub, filter_id) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// True when any node (group or filter, the root included) carries the id.
pub fn contains_node(root: &FilterGroup, id: &str) -> bool {
    if root.id == id {
        return true;
    }
    root.children.iter().any(|child| match child.as_ref() {
        FilterNode::Filter(f) => f.id == id,
        FilterNode::Group(sub) => contains_node(sub, id),
    })
}
