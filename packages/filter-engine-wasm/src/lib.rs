//! Browser bindings for the filter engine. The dashboard holds the current
//! tree as a plain JS object; every call here deserializes it, runs the pure
//! engine operation, and hands a fresh object back.

use filter_engine::{Filter, FilterGroup, GroupPatch, GroupOperator, RecordValue};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(typescript_custom_section)]
const TS_APPEND_CONTENT: &'static str = r#"
export type FilterOperator =
  | "is" | "isNot" | "contains" | "notContains" | "equals" | "notEquals"
  | "greaterThan" | "lessThan" | "before" | "after" | "between";

export type ValueType = "select" | "multiselect" | "date" | "number" | "text";

export interface Filter {
  id: string;
  fieldId: string;
  fieldLabel: string;
  operator: FilterOperator;
  values: string[];
  valueType: ValueType;
}

export interface FilterGroup {
  id: string;
  operator: "and" | "or";
  not?: boolean;
  children: (Filter | FilterGroup)[];
}

export interface FilterConfig {
  searchQuery: string;
  advancedFilters: Filter[];
  filterGroup: FilterGroup | null;
}
"#;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // plain JS objects, not Map instances
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize result: {}", e)))
}

fn group_from_js(root: JsValue) -> Result<FilterGroup, JsValue> {
    serde_wasm_bindgen::from_value(root)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse filter group: {}", e)))
}

fn filter_from_js(filter: JsValue) -> Result<Filter, JsValue> {
    serde_wasm_bindgen::from_value(filter)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse filter: {}", e)))
}

/// Fresh empty root group: `and`, no children, not negated.
#[wasm_bindgen]
pub fn new_filter_group() -> Result<JsValue, JsValue> {
    to_js(&FilterGroup::new_root())
}

#[wasm_bindgen]
pub fn add_filter_to_group(
    root: JsValue,
    filter: JsValue,
    target_group_id: String,
) -> Result<JsValue, JsValue> {
    let root = group_from_js(root)?;
    let filter = filter_from_js(filter)?;
    to_js(&filter_engine::add_filter_to_group(
        &root,
        filter,
        &target_group_id,
    ))
}

#[wasm_bindgen]
pub fn update_filter_in_group(root: JsValue, filter: JsValue) -> Result<JsValue, JsValue> {
    let root = group_from_js(root)?;
    let filter = filter_from_js(filter)?;
    to_js(&filter_engine::update_filter_in_group(&root, filter))
}

#[wasm_bindgen]
pub fn remove_filter_from_group(root: JsValue, filter_id: String) -> Result<JsValue, JsValue> {
    let root = group_from_js(root)?;
    to_js(&filter_engine::remove_filter_from_group(&root, &filter_id))
}

#[wasm_bindgen]
pub fn add_group_to_group(
    root: JsValue,
    new_group: JsValue,
    target_group_id: String,
) -> Result<JsValue, JsValue> {
    let root = group_from_js(root)?;
    let new_group = group_from_js(new_group)?;
    to_js(&filter_engine::add_group_to_group(
        &root,
        new_group,
        &target_group_id,
    ))
}

#[wasm_bindgen]
pub fn remove_group_from_group(root: JsValue, group_id: String) -> Result<JsValue, JsValue> {
    let root = group_from_js(root)?;
    to_js(&filter_engine::remove_group_from_group(&root, &group_id))
}

/// Shallow-merges `operator` / `not` into the target group. Pass `null` to
/// leave a field unchanged.
#[wasm_bindgen]
pub fn update_group_in_group(
    root: JsValue,
    group_id: String,
    operator: Option<String>,
    not: Option<bool>,
) -> Result<JsValue, JsValue> {
    let root = group_from_js(root)?;
    let operator = match operator.as_deref() {
        None => None,
        Some("and") => Some(GroupOperator::And),
        Some("or") => Some(GroupOperator::Or),
        Some(other) => {
            return Err(JsValue::from_str(&format!(
                "Unknown group operator: {}",
                other
            )))
        }
    };
    let patch = GroupPatch {
        operator,
        not,
        children: None,
    };
    to_js(&filter_engine::update_group_in_group(&root, &group_id, &patch))
}

/// All filter leaves in display order, for the chips row.
#[wasm_bindgen]
pub fn flatten_filter_group(root: JsValue) -> Result<JsValue, JsValue> {
    let root = group_from_js(root)?;
    let flat: Vec<Filter> = filter_engine::flatten_filter_group(&root)
        .into_iter()
        .cloned()
        .collect();
    to_js(&flat)
}

#[wasm_bindgen]
pub fn is_advanced_filter_group(root: JsValue) -> Result<bool, JsValue> {
    Ok(filter_engine::is_advanced_filter_group(&group_from_js(
        root,
    )?))
}

/// Canonical semantic signature; compare against the saved baseline's to
/// drive the dirty indicator.
#[wasm_bindgen]
pub fn filter_group_signature(root: JsValue) -> Result<String, JsValue> {
    Ok(filter_engine::filter_group_signature(&group_from_js(root)?))
}

/// Evaluate a tree against a single record object.
#[wasm_bindgen]
pub fn evaluate_filter_group(root: JsValue, record: JsValue) -> Result<bool, JsValue> {
    let root = group_from_js(root)?;
    let record: Value = serde_wasm_bindgen::from_value(record)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse record: {}", e)))?;
    Ok(filter_engine::evaluate_group(
        &root,
        &RecordValue::from(record),
    ))
}

/// Validate and normalize a persisted view config before trusting it.
#[wasm_bindgen]
pub fn prepare_view_config(config: JsValue) -> Result<JsValue, JsValue> {
    let config: Value = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?;
    let prepared = filter_engine::prepare_view_config(config)
        .map_err(|e| JsValue::from_str(&format!("Rehydration failed: {}", e)))?;
    to_js(&prepared)
}
