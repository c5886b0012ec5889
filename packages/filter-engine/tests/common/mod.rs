//! Shared fixtures for the filter-engine integration tests.
//!
//! The catalog mirrors a leads screen: primary fields plus one joined
//! sub-resource field, the way resource screens hand their field lists to
//! the engine.

use filter_engine::{
    FieldCatalog, FieldDescriptor, Filter, FilterGroup, FilterNode, FilterOperator,
    GroupOperator, ValueType,
};

pub fn leads_catalog() -> FieldCatalog {
    FieldCatalog::new([
        FieldDescriptor::new("status", "Status", ValueType::Select),
        FieldDescriptor::new("city", "City", ValueType::Select),
        FieldDescriptor::new("tags", "Tags", ValueType::Multiselect),
        FieldDescriptor::new("age", "Age", ValueType::Number),
        FieldDescriptor::new("joined_at", "Joined at", ValueType::Date),
        FieldDescriptor::new("name", "Full name", ValueType::Text),
        FieldDescriptor::new("subscription.plan", "Plan", ValueType::Select)
            .on_related_entity("subscription", "Subscription"),
    ])
}

/// Build a filter against a catalog field, with a fixed id for assertions.
pub fn make_filter<const N: usize>(
    catalog: &FieldCatalog,
    id: &str,
    field_id: &str,
    operator: FilterOperator,
    values: [&str; N],
) -> Filter {
    let field = catalog.get(field_id).expect("fixture field");
    let mut filter = Filter::new(field, operator, values);
    filter.id = id.into();
    filter
}

/// Build a group with a fixed id.
pub fn make_group(id: &str, operator: GroupOperator, children: Vec<FilterNode>) -> FilterGroup {
    let mut group = FilterGroup::with_children(operator, children);
    group.id = id.into();
    group
}
