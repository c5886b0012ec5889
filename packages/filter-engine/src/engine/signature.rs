//! Canonical signatures for dirty-state comparison.
//!
//! A signature captures a tree's semantic content: field ids, operators,
//! values, combinators and negation. Node ids are ephemeral (regenerated on
//! rehydration) and child order inside a commutative combinator is display
//! order, so both are normalized away. Two trees are "the same filters" iff
//! their signatures are equal.

use serde_json::{json, Value};

use super::types::{Filter, FilterGroup, FilterNode};

/// Order-normalized, id-free JSON encoding of the tree's semantic content.
/// serde_json's default object map is ordered by key, so the output is
/// deterministic byte-for-byte.
pub fn canonical_form(group: &FilterGroup) -> String {
    canonical_group(group).to_string()
}

/// blake3 hex digest of [`canonical_form`], the string compared against the
/// persisted baseline's signature.
pub fn filter_group_signature(group: &FilterGroup) -> String {
    blake3::hash(canonical_form(group).as_bytes())
        .to_hex()
        .to_string()
}

fn canonical_group(group: &FilterGroup) -> Value {
    let mut children: Vec<(String, Value)> = group
        .children
        .iter()
        .map(|child| {
            let value = match child.as_ref() {
                FilterNode::Filter(f) => canonical_filter(f),
                FilterNode::Group(sub) => canonical_group(sub),
            };
            (value.to_string(), value)
        })
        .collect();
    // sort by the serialized child form: and/or are commutative
    children.sort_by(|a, b| a.0.cmp(&b.0));

    json!({
        "g": group.operator.as_str(),
        "not": group.not,
        "c": children.into_iter().map(|(_, v)| v).collect::<Vec<_>>(),
    })
}

fn canonical_filter(filter: &Filter) -> Value {
    let mut values: Vec<&str> = filter.values.iter().map(|v| v.as_str()).collect();
    values.sort_unstable();

    json!({
        "f": filter.field_id.as_str(),
        "op": filter.operator.as_str(),
        "v": values,
    })
}

#[cfg(test)]
mod signature_tests {
    use super::*;
    use crate::engine::types::{
        FieldDescriptor, FilterOperator, GroupOperator, ValueType,
    };

    fn city_filter(id: &str, value: &str) -> Filter {
        let mut filter = Filter::new(
            &FieldDescriptor::new("city", "City", ValueType::Select),
            FilterOperator::Is,
            [value],
        );
        filter.id = id.into();
        filter
    }

    #[test]
    fn test_child_order_does_not_affect_signature() {
        let a = FilterGroup::with_children(
            GroupOperator::Or,
            vec![
                city_filter("f1", "Haifa").into(),
                city_filter("f2", "Tel Aviv").into(),
            ],
        );
        let b = FilterGroup::with_children(
            GroupOperator::Or,
            vec![
                city_filter("f3", "Tel Aviv").into(),
                city_filter("f4", "Haifa").into(),
            ],
        );
        assert_eq!(filter_group_signature(&a), filter_group_signature(&b));
    }

    #[test]
    fn test_node_ids_do_not_affect_signature() {
        let a = FilterGroup::with_children(GroupOperator::And, vec![city_filter("x", "Haifa").into()]);
        let mut b = a.clone();
        b.id = "completely-different".into();
        assert_eq!(filter_group_signature(&a), filter_group_signature(&b));
    }

    #[test]
    fn test_value_order_does_not_affect_signature() {
        let field = FieldDescriptor::new("tags", "Tags", ValueType::Multiselect);
        let mut f1 = Filter::new(&field, FilterOperator::Is, ["yoga", "pilates"]);
        let mut f2 = Filter::new(&field, FilterOperator::Is, ["pilates", "yoga"]);
        f1.id = "a".into();
        f2.id = "a".into();

        let a = FilterGroup::with_children(GroupOperator::And, vec![f1.into()]);
        let b = FilterGroup::with_children(GroupOperator::And, vec![f2.into()]);
        assert_eq!(filter_group_signature(&a), filter_group_signature(&b));
    }

    #[test]
    fn test_signature_sensitive_to_semantic_changes() {
        let base = FilterGroup::with_children(
            GroupOperator::And,
            vec![city_filter("f1", "Haifa").into()],
        );
        let base_sig = filter_group_signature(&base);

        // operator of the leaf
        let mut changed = city_filter("f1", "Haifa");
        changed.operator = FilterOperator::IsNot;
        let tree = FilterGroup::with_children(GroupOperator::And, vec![changed.into()]);
        assert_ne!(filter_group_signature(&tree), base_sig);

        // value of the leaf
        let tree = FilterGroup::with_children(
            GroupOperator::And,
            vec![city_filter("f1", "Eilat").into()],
        );
        assert_ne!(filter_group_signature(&tree), base_sig);

        // field of the leaf
        let mut moved = city_filter("f1", "Haifa");
        moved.field_id = "birth_city".into();
        let tree = FilterGroup::with_children(GroupOperator::And, vec![moved.into()]);
        assert_ne!(filter_group_signature(&tree), base_sig);

        // group combinator
        let mut or_root = base.clone();
        or_root.operator = GroupOperator::Or;
        assert_ne!(filter_group_signature(&or_root), base_sig);

        // group negation
        let mut negated = base.clone();
        negated.not = true;
        assert_ne!(filter_group_signature(&negated), base_sig);
    }

    #[test]
    fn test_empty_and_differs_from_empty_or() {
        let and_root = FilterGroup::new(GroupOperator::And);
        let or_root = FilterGroup::new(GroupOperator::Or);
        assert_ne!(
            filter_group_signature(&and_root),
            filter_group_signature(&or_root)
        );
    }

    #[test]
    fn test_nested_groups_sorted_recursively() {
        let inner_a = FilterGroup::with_children(
            GroupOperator::Or,
            vec![
                city_filter("1", "Haifa").into(),
                city_filter("2", "Eilat").into(),
            ],
        );
        let inner_b = FilterGroup::with_children(
            GroupOperator::Or,
            vec![
                city_filter("3", "Eilat").into(),
                city_filter("4", "Haifa").into(),
            ],
        );

        let a = FilterGroup::with_children(
            GroupOperator::And,
            vec![inner_a.into(), city_filter("5", "Holon").into()],
        );
        let b = FilterGroup::with_children(
            GroupOperator::And,
            vec![city_filter("6", "Holon").into(), inner_b.into()],
        );
        assert_eq!(filter_group_signature(&a), filter_group_signature(&b));
    }

    #[test]
    fn test_canonical_form_is_stable_json() {
        let tree = FilterGroup::with_children(
            GroupOperator::And,
            vec![city_filter("f1", "Haifa").into()],
        );
        let form = canonical_form(&tree);
        // keys ordered, ids absent
        assert!(form.contains("\"f\":\"city\""));
        assert!(!form.contains("f1"));
        assert_eq!(form, canonical_form(&tree));
    }
}
