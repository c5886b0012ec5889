//! Mutation, flattening and signature throughput over a wide nested tree.

use filter_engine::{
    add_filter_to_group, evaluate_batch, filter_group_signature, flatten_filter_group,
    remove_filter_from_group, FieldDescriptor, Filter, FilterGroup, FilterOperator,
    GroupOperator, RecordValue, ValueType,
};

fn main() {
    divan::main();
}

fn status_field() -> FieldDescriptor {
    FieldDescriptor::new("status", "Status", ValueType::Select)
}

/// A root with `groups` or-groups of `leaves` filters each.
fn build_tree(groups: usize, leaves: usize) -> FilterGroup {
    let field = status_field();
    let mut root = FilterGroup::new_root();
    root.id = "root".into();

    for g in 0..groups {
        let children = (0..leaves)
            .map(|l| {
                let mut filter = Filter::new(&field, FilterOperator::Is, [format!("v{g}-{l}")]);
                filter.id = format!("f{g}-{l}").into();
                filter.into()
            })
            .collect();
        let mut group = FilterGroup::with_children(GroupOperator::Or, children);
        group.id = format!("g{g}").into();
        root = filter_engine::add_group_to_group(&root, group, "root");
    }
    root
}

#[divan::bench]
fn add_filter_deep(bencher: divan::Bencher) {
    let tree = build_tree(16, 8);
    let field = status_field();
    bencher.bench(|| {
        let filter = Filter::new(&field, FilterOperator::Is, ["fresh"]);
        add_filter_to_group(divan::black_box(&tree), filter, "g15")
    });
}

#[divan::bench]
fn remove_filter_deep(bencher: divan::Bencher) {
    let tree = build_tree(16, 8);
    bencher.bench(|| remove_filter_from_group(divan::black_box(&tree), "f15-7"));
}

#[divan::bench]
fn flatten(bencher: divan::Bencher) {
    let tree = build_tree(16, 8);
    bencher.bench(|| flatten_filter_group(divan::black_box(&tree)).len());
}

#[divan::bench]
fn signature(bencher: divan::Bencher) {
    let tree = build_tree(16, 8);
    bencher.bench(|| filter_group_signature(divan::black_box(&tree)));
}

#[divan::bench]
fn batch_evaluate_1k(bencher: divan::Bencher) {
    let tree = build_tree(4, 4);
    let records: Vec<RecordValue> = (0..1000)
        .map(|i| {
            filter_engine::RecordValue::from(serde_json::json!({
                "status": format!("v{}-{}", i % 4, i % 4)
            }))
        })
        .collect();
    bencher.bench(|| evaluate_batch(divan::black_box(&tree), divan::black_box(&records)));
}
