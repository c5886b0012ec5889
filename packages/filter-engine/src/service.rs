//! Persistence-boundary handling for saved-view filter configs.
//!
//! The engine's own operations are total and never validate; a rehydrated
//! config is the one place malformed trees can enter, so it is parsed and
//! checked here before anything downstream trusts it.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

use crate::engine::flatten::flatten_filter_group;
use crate::engine::types::{
    new_node_id, FieldCatalog, Filter, FilterGroup, FilterNode, NodeId, ValueArity,
};
use crate::engine::views::FilterConfig;

/// Maximum accepted nesting depth of a rehydrated tree. User-authored trees
/// are shallow in practice; anything deeper is a corrupt or hostile payload.
pub const MAX_GROUP_DEPTH: usize = 16;

/// Parse and validate a persisted filter config. Node ids are normalized
/// (duplicates and blanks regenerated) and the legacy flat list is re-synced
/// from the canonical tree.
#[instrument(skip(config))]
pub fn prepare_view_config(config: Value) -> Result<FilterConfig> {
    let mut parsed: FilterConfig =
        serde_json::from_value(config).context("malformed filter config")?;

    if let Some(group) = parsed.filter_group.take() {
        validate_group(&group, None)?;
        let group = normalize_ids(&group);
        parsed.advanced_filters = flatten_filter_group(&group).into_iter().cloned().collect();
        parsed.filter_group = Some(group);
    }

    Ok(parsed)
}

/// Check a tree against the structural rules the engine assumes: bounded
/// nesting, non-empty values, operator arity, and (when a catalog is given)
/// that each filter uses a known field with an allowed operator.
pub fn validate_group(group: &FilterGroup, catalog: Option<&FieldCatalog>) -> Result<()> {
    validate_at_depth(group, catalog, 0)
}

fn validate_at_depth(group: &FilterGroup, catalog: Option<&FieldCatalog>, depth: usize) -> Result<()> {
    if depth > MAX_GROUP_DEPTH {
        bail!("filter group nesting exceeds {MAX_GROUP_DEPTH} levels");
    }
    for child in &group.children {
        match child.as_ref() {
            FilterNode::Filter(filter) => validate_filter(filter, catalog)?,
            FilterNode::Group(sub) => validate_at_depth(sub, catalog, depth + 1)?,
        }
    }
    Ok(())
}

fn validate_filter(filter: &Filter, catalog: Option<&FieldCatalog>) -> Result<()> {
    if filter.values.is_empty() {
        bail!("filter on '{}' has no values", filter.field_id);
    }
    match filter.operator.value_arity(filter.value_type) {
        ValueArity::ExactlyOne if filter.values.len() != 1 => bail!(
            "operator '{}' on '{}' takes exactly one value, got {}",
            filter.operator,
            filter.field_id,
            filter.values.len()
        ),
        ValueArity::ExactlyTwo if filter.values.len() != 2 => bail!(
            "'between' on '{}' takes exactly two bounds, got {}",
            filter.field_id,
            filter.values.len()
        ),
        _ => {}
    }

    if let Some(catalog) = catalog {
        let field = catalog
            .get(&filter.field_id)
            .ok_or_else(|| anyhow!("unknown field '{}'", filter.field_id))?;
        if field.value_type != filter.value_type {
            bail!(
                "filter on '{}' carries value type {:?}, field is {:?}",
                filter.field_id,
                filter.value_type,
                field.value_type
            );
        }
        if !field.supports(filter.operator) {
            bail!(
                "operator '{}' not allowed on field '{}'",
                filter.operator,
                filter.field_id
            );
        }
    }

    Ok(())
}

/// Regenerate blank or duplicate node ids. Ids are excluded from signatures,
/// so normalization never changes what the tree means.
pub fn normalize_ids(group: &FilterGroup) -> FilterGroup {
    let mut seen = HashSet::new();
    normalize_group(group, &mut seen)
}

fn ensure_fresh(id: &NodeId, seen: &mut HashSet<NodeId>) -> NodeId {
    if !id.is_empty() && seen.insert(id.clone()) {
        return id.clone();
    }
    let fresh = new_node_id();
    seen.insert(fresh.clone());
    fresh
}

fn normalize_group(group: &FilterGroup, seen: &mut HashSet<NodeId>) -> FilterGroup {
    let id = ensure_fresh(&group.id, seen);
    let children = group
        .children
        .iter()
        .map(|child| match child.as_ref() {
            FilterNode::Filter(filter) => {
                let mut filter = filter.clone();
                filter.id = ensure_fresh(&filter.id, seen);
                Arc::new(FilterNode::Filter(filter))
            }
            FilterNode::Group(sub) => Arc::new(FilterNode::Group(normalize_group(sub, seen))),
        })
        .collect();

    FilterGroup {
        id,
        operator: group.operator,
        not: group.not,
        children,
    }
}
