use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Value domain of a filterable field. Drives the default operator set and
/// the value widget the UI renders.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Select,
    Multiselect,
    Date,
    Number,
    Text,
}

impl ValueType {
    /// Operators a field of this type supports when its descriptor does not
    /// name an explicit set.
    pub fn default_operators(self) -> &'static [FilterOperator] {
        use FilterOperator::*;
        match self {
            ValueType::Select | ValueType::Multiselect => &[Is, IsNot],
            ValueType::Date => &[Equals, Before, After, Between],
            ValueType::Number => &[Equals, GreaterThan, LessThan, NotEquals],
            ValueType::Text => &[Contains, NotContains, Equals, NotEquals],
        }
    }
}

/// Comparison operator of a single filter condition. The serde tokens are
/// the persisted wire format.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Is,
    IsNot,
    Contains,
    NotContains,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Before,
    After,
    Between,
}

/// How many values a (operator, value type) pair carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueArity {
    ExactlyOne,
    /// Range bounds, lower first.
    ExactlyTwo,
    /// Membership lists (multiselect).
    AtLeastOne,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        use FilterOperator::*;
        match self {
            Is => "is",
            IsNot => "isNot",
            Contains => "contains",
            NotContains => "notContains",
            Equals => "equals",
            NotEquals => "notEquals",
            GreaterThan => "greaterThan",
            LessThan => "lessThan",
            Before => "before",
            After => "after",
            Between => "between",
        }
    }

    pub fn value_arity(self, value_type: ValueType) -> ValueArity {
        match self {
            FilterOperator::Between => ValueArity::ExactlyTwo,
            FilterOperator::Is | FilterOperator::IsNot
                if value_type == ValueType::Multiselect =>
            {
                ValueArity::AtLeastOne
            }
            _ => ValueArity::ExactlyOne,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filterable field as supplied by a resource screen (leads, customers).
/// Read-only to the engine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: SmolStr,
    pub label: String,
    pub value_type: ValueType,
    /// Empty means "use the defaults for the value type".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_operators: Vec<FilterOperator>,
    /// Set when the field lives on a joined sub-resource rather than the
    /// primary one; its id is then a dotted path ("subscription.plan").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity_label: Option<String>,
}

impl FieldDescriptor {
    pub fn new(id: impl Into<SmolStr>, label: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value_type,
            allowed_operators: Vec::new(),
            related_entity: None,
            related_entity_label: None,
        }
    }

    pub fn with_operators(mut self, operators: impl IntoIterator<Item = FilterOperator>) -> Self {
        self.allowed_operators = operators.into_iter().collect();
        self
    }

    pub fn on_related_entity(
        mut self,
        entity: impl Into<SmolStr>,
        label: impl Into<String>,
    ) -> Self {
        self.related_entity = Some(entity.into());
        self.related_entity_label = Some(label.into());
        self
    }

    /// The effective operator set for this field.
    pub fn operators(&self) -> &[FilterOperator] {
        if self.allowed_operators.is_empty() {
            self.value_type.default_operators()
        } else {
            &self.allowed_operators
        }
    }

    pub fn supports(&self, operator: FilterOperator) -> bool {
        self.operators().contains(&operator)
    }
}

/// The set of filterable fields a resource screen offers, in display order.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FieldCatalog {
    fields: IndexMap<SmolStr, FieldDescriptor>,
}

impl FieldCatalog {
    pub fn new(fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self {
            fields: fields.into_iter().map(|f| (f.id.clone(), f)).collect(),
        }
    }

    pub fn get(&self, field_id: &str) -> Option<&FieldDescriptor> {
        self.fields.get(field_id)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.fields.contains_key(field_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
