mod field;
mod node;
mod path;
mod record_value;

pub use field::{FieldCatalog, FieldDescriptor, FilterOperator, ValueArity, ValueType};
pub use node::{Filter, FilterGroup, FilterNode, GroupOperator, NodeId};
pub use path::FieldPath;
pub use record_value::{FastMap, RecordValue};

pub(crate) use node::new_node_id;
