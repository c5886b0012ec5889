use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Dot-separated field address. A plain field id is a single segment
/// ("status"); fields belonging to a joined sub-resource carry the entity
/// prefix ("subscription.plan").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath(pub Vec<SmolStr>);

impl FieldPath {
    pub fn new(s: &str) -> Self {
        if s.is_empty() {
            FieldPath(vec![])
        } else {
            FieldPath(s.split('.').map(SmolStr::new).collect())
        }
    }

    pub fn as_str(&self) -> String {
        self.0
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.0
    }
}

impl Serialize for FieldPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.0.is_empty() {
            serializer.serialize_str("")
        } else {
            serializer.serialize_str(&self.as_str())
        }
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Ok(FieldPath::new(&s))
    }
}
