use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// GeoJSON feature `id` member.
///
/// Both spellings the format allows are kept so ids are echoed back to the
/// application exactly as they arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(Number),
    Text(String),
}

impl FeatureId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(FeatureId::Number(n.clone())),
            Value::String(s) => Some(FeatureId::Text(s.clone())),
            _ => None,
        }
    }

    /// Textual form used for selection matching: `3` and `"3"` compare equal.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{n}"),
            FeatureId::Text(s) => f.write_str(s),
        }
    }
}

impl From<geojson::feature::Id> for FeatureId {
    fn from(id: geojson::feature::Id) -> Self {
        match id {
            geojson::feature::Id::Number(n) => FeatureId::Number(n),
            geojson::feature::Id::String(s) => FeatureId::Text(s),
        }
    }
}

impl From<FeatureId> for geojson::feature::Id {
    fn from(id: FeatureId) -> Self {
        match id {
            FeatureId::Number(n) => geojson::feature::Id::Number(n),
            FeatureId::Text(s) => geojson::feature::Id::String(s),
        }
    }
}

impl From<u64> for FeatureId {
    fn from(n: u64) -> Self {
        FeatureId::Number(Number::from(n))
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        FeatureId::Text(s.to_string())
    }
}
