use serde::Deserialize;
use serde_json::Value;

use crate::error::DatasetError;
use crate::membership::ColumnIndex;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeEntry {
    pub header: String,
    pub index: i64,
}

/// Tree node to matrix column table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLookup {
    entries: Vec<NodeEntry>,
}

impl NodeLookup {
    pub fn new(entries: Vec<NodeEntry>) -> Self {
        Self { entries }
    }

    pub fn from_value(value: Value) -> Result<Self, DatasetError> {
        let entries =
            serde_json::from_value::<Vec<NodeEntry>>(value).map_err(|e| {
                DatasetError::InvalidLookup {
                    name: "node",
                    reason: e.to_string(),
                }
            })?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[NodeEntry] {
        &self.entries
    }

    /// Resolves a user-facing column name.
    ///
    /// A row matches when its header equals `column` exactly, or when the
    /// lowercased header equals `node_` followed by `column`. Only the header
    /// is lowercased. The first matching row wins.
    pub fn resolve(&self, column: &str) -> Option<ColumnIndex> {
        let prefixed = format!("node_{column}");
        self.entries
            .iter()
            .find(|e| e.header == column || e.header.to_lowercase() == prefixed)
            .map(|e| ColumnIndex(e.index))
    }
}

/// Statistic key to display name table, kept in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatNameLookup {
    entries: Vec<(String, Value)>,
}

impl StatNameLookup {
    pub fn from_value(value: Value) -> Result<Self, DatasetError> {
        let Value::Object(map) = value else {
            return Err(DatasetError::InvalidLookup {
                name: "statistic name",
                reason: "expected an object".to_string(),
            });
        };
        Ok(Self {
            entries: map.into_iter().collect(),
        })
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeLookup, StatNameLookup};
    use crate::error::DatasetError;
    use crate::membership::ColumnIndex;
    use serde_json::json;

    fn lookup() -> NodeLookup {
        NodeLookup::from_value(json!([
            { "header": "Node_12", "index": 0 },
            { "header": "Squamata", "index": 1 },
            { "header": "node_3", "index": 2 }
        ]))
        .expect("parse node lookup")
    }

    #[test]
    fn resolves_exact_header() {
        assert_eq!(lookup().resolve("Squamata"), Some(ColumnIndex(1)));
        assert_eq!(lookup().resolve("Node_12"), Some(ColumnIndex(0)));
    }

    #[test]
    fn resolves_node_prefixed_header_case_insensitively() {
        assert_eq!(lookup().resolve("12"), Some(ColumnIndex(0)));
        assert_eq!(lookup().resolve("3"), Some(ColumnIndex(2)));
    }

    #[test]
    fn only_header_is_lowercased() {
        assert_eq!(lookup().resolve("squamata"), None);
        assert_eq!(lookup().resolve("missing"), None);
    }

    #[test]
    fn stat_names_keep_document_order() {
        let names = StatNameLookup::from_value(json!({ "z": "Zeta", "a": "Alpha" }))
            .expect("parse stat names");
        let keys: Vec<&str> = names.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn rejects_malformed_tables() {
        assert!(matches!(
            NodeLookup::from_value(json!({ "header": "x" })),
            Err(DatasetError::InvalidLookup { name: "node", .. })
        ));
        assert!(matches!(
            StatNameLookup::from_value(json!([1, 2])),
            Err(DatasetError::InvalidLookup { .. })
        ));
    }
}
