mod filter;

pub use filter::{
    evaluate_batch, evaluate_filter, evaluate_group, evaluate_node, matching_indices,
    resolve_field_value,
};
