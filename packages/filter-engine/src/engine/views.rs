//! Saved-view filter configuration: the shape the engine persists and
//! rehydrates. The backend stores these verbatim inside a saved view; the
//! engine owns only the shape and its round-trip semantics.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::sync::Arc;

use super::flatten::flatten_filter_group;
use super::signature::filter_group_signature;
use super::types::{new_node_id, Filter, FilterGroup, FilterNode, GroupOperator};

/// The `filter_config` payload of a saved view.
///
/// `filter_group` is the canonical nested representation;
/// `advanced_filters` is the flat legacy mirror kept in sync for consumers
/// that only understand a flat AND-list.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub advanced_filters: Vec<Filter>,
    #[serde(default)]
    pub filter_group: Option<FilterGroup>,
}

impl FilterConfig {
    /// Build a config from the current tree, syncing the legacy flat list.
    pub fn from_group(search_query: impl Into<String>, group: FilterGroup) -> Self {
        let advanced_filters = flatten_filter_group(&group).into_iter().cloned().collect();
        FilterConfig {
            search_query: search_query.into(),
            advanced_filters,
            filter_group: Some(group),
        }
    }

    /// The tree this config denotes. Legacy configs without a `filter_group`
    /// are a flat list of implicitly ANDed filters.
    pub fn effective_group(&self) -> FilterGroup {
        match &self.filter_group {
            Some(group) => group.clone(),
            None => FilterGroup {
                id: new_node_id(),
                operator: GroupOperator::And,
                not: false,
                children: self
                    .advanced_filters
                    .iter()
                    .cloned()
                    .map(|f| Arc::new(FilterNode::Filter(f)))
                    .collect(),
            },
        }
    }

    /// Semantic signature of the denoted tree.
    pub fn signature(&self) -> String {
        filter_group_signature(&self.effective_group())
    }
}

/// A persisted named view: search text plus a filter tree. Owned by the
/// backend; held here as the baseline for dirty-state comparison.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub id: SmolStr,
    pub name: String,
    pub filter_config: FilterConfig,
}

impl SavedView {
    /// Has the user's working state drifted from this saved baseline?
    /// Compares signatures, so reordered children and regenerated node ids
    /// do not count as modifications.
    pub fn is_modified(&self, current: &FilterConfig) -> bool {
        current.search_query != self.filter_config.search_query
            || current.signature() != self.filter_config.signature()
    }
}
