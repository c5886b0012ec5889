// src/lib.rs

pub mod engine;
pub mod service;

// Re-export commonly used types for convenience
pub use engine::eval::{
    evaluate_batch, evaluate_filter, evaluate_group, evaluate_node, matching_indices,
    resolve_field_value,
};
pub use engine::flatten::{filter_count, flatten_filter_group, is_advanced_filter_group};
pub use engine::signature::{canonical_form, filter_group_signature};
pub use engine::tree::{
    add_filter_to_group, add_group_to_group, contains_node, find_filter, find_group,
    remove_filter_from_group, remove_group_from_group, update_filter_in_group,
    update_group_in_group, GroupPatch,
};
pub use engine::types::{
    FastMap, FieldCatalog, FieldDescriptor, FieldPath, Filter, FilterGroup, FilterNode,
    FilterOperator, GroupOperator, NodeId, RecordValue, ValueArity, ValueType,
};
pub use engine::views::{FilterConfig, SavedView};
pub use service::{normalize_ids, prepare_view_config, validate_group, MAX_GROUP_DEPTH};
