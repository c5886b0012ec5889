//! End-to-end evaluation scenarios over lead-shaped records.

mod common;

use common::{leads_catalog, make_filter, make_group};
use filter_engine::{
    evaluate_batch, evaluate_group, matching_indices, record, FilterOperator, GroupOperator,
    RecordValue,
};

fn lead(city: &str, age: i64, status: &str) -> RecordValue {
    record!({
        "city": city,
        "age": age,
        "status": status,
        "subscription": {"plan": "premium"}
    })
}

#[test]
fn age_between_is_inclusive_on_both_ends() {
    let catalog = leads_catalog();
    let root = make_group(
        "root",
        GroupOperator::And,
        vec![make_filter(&catalog, "f1", "age", FilterOperator::Between, ["18", "30"]).into()],
    );

    assert!(evaluate_group(&root, &lead("Haifa", 25, "active")));
    assert!(!evaluate_group(&root, &lead("Haifa", 35, "active")));
    assert!(evaluate_group(&root, &lead("Haifa", 18, "active")));
    assert!(evaluate_group(&root, &lead("Haifa", 30, "active")));
}

#[test]
fn negated_or_of_cities() {
    let catalog = leads_catalog();
    let mut root = make_group(
        "root",
        GroupOperator::Or,
        vec![
            make_filter(&catalog, "f1", "city", FilterOperator::Is, ["Tel Aviv"]).into(),
            make_filter(&catalog, "f2", "city", FilterOperator::Is, ["Haifa"]).into(),
        ],
    );
    root.not = true;

    // neither disjunct matches, negated to true
    assert!(evaluate_group(&root, &lead("Jerusalem", 30, "active")));
    // a disjunct matches, negated to false
    assert!(!evaluate_group(&root, &lead("Haifa", 30, "active")));
}

#[test]
fn related_entity_fields_resolve_through_the_join() {
    let catalog = leads_catalog();
    let root = make_group(
        "root",
        GroupOperator::And,
        vec![make_filter(
            &catalog,
            "f1",
            "subscription.plan",
            FilterOperator::Is,
            ["premium"],
        )
        .into()],
    );

    assert!(evaluate_group(&root, &lead("Haifa", 30, "active")));
    assert!(!evaluate_group(
        &root,
        &record!({"subscription": {"plan": "basic"}})
    ));
}

#[test]
fn batch_evaluation_matches_singles_and_yields_indices() {
    let catalog = leads_catalog();
    let root = make_group(
        "root",
        GroupOperator::And,
        vec![
            make_filter(&catalog, "f1", "status", FilterOperator::Is, ["active"]).into(),
            make_filter(&catalog, "f2", "age", FilterOperator::GreaterThan, ["25"]).into(),
        ],
    );

    let records = vec![
        lead("Haifa", 20, "active"),
        lead("Haifa", 30, "active"),
        lead("Haifa", 30, "lost"),
        lead("Eilat", 26, "active"),
    ];

    let expected: Vec<bool> = records.iter().map(|r| evaluate_group(&root, r)).collect();
    assert_eq!(evaluate_batch(&root, &records), expected);
    assert_eq!(matching_indices(&root, &records), vec![1, 3]);
}

#[test]
fn empty_groups_do_not_restrict() {
    let catalog = leads_catalog();
    let empty_or = make_group("g1", GroupOperator::Or, vec![]);
    let root = make_group(
        "root",
        GroupOperator::And,
        vec![
            make_filter(&catalog, "f1", "status", FilterOperator::Is, ["active"]).into(),
            empty_or.into(),
        ],
    );

    // the empty or-group is "no constraint", so the status filter decides
    assert!(evaluate_group(&root, &lead("Haifa", 30, "active")));
    assert!(!evaluate_group(&root, &lead("Haifa", 30, "lost")));
}
