use serde_json::{Map, Value};

/// Index of a tree node's column in the statistics matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnIndex(pub i64);

/// Categorical flag a polygon can hold for a column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Slot `"1"`.
    Positive,
    /// Slot `"-1"`.
    Negative,
    /// Slot `"2"`.
    Mixed,
}

impl Category {
    /// Lookup order; the first category holding a column wins.
    pub const ALL: [Category; 3] = [Category::Positive, Category::Negative, Category::Mixed];

    pub const fn key(self) -> &'static str {
        match self {
            Category::Positive => "1",
            Category::Negative => "-1",
            Category::Mixed => "2",
        }
    }
}

/// Per-polygon membership record read from `properties.data`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipData {
    positive: Vec<ColumnIndex>,
    negative: Vec<ColumnIndex>,
    mixed: Vec<ColumnIndex>,
}

impl MembershipData {
    pub fn new(
        positive: Vec<ColumnIndex>,
        negative: Vec<ColumnIndex>,
        mixed: Vec<ColumnIndex>,
    ) -> Self {
        Self {
            positive,
            negative,
            mixed,
        }
    }

    /// Reads the three slots out of a feature's properties. Missing slots and
    /// entries that are not integers are ignored.
    pub fn from_properties(properties: &Map<String, Value>) -> Self {
        let Some(data) = properties.get("data").and_then(|v| v.as_object()) else {
            return Self::default();
        };
        let slot = |category: Category| -> Vec<ColumnIndex> {
            data.get(category.key())
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_i64())
                        .map(ColumnIndex)
                        .collect()
                })
                .unwrap_or_default()
        };
        Self {
            positive: slot(Category::Positive),
            negative: slot(Category::Negative),
            mixed: slot(Category::Mixed),
        }
    }

    pub fn columns(&self, category: Category) -> &[ColumnIndex] {
        match category {
            Category::Positive => &self.positive,
            Category::Negative => &self.negative,
            Category::Mixed => &self.mixed,
        }
    }

    /// True when at least one slot lists a column.
    pub fn has_any(&self) -> bool {
        Category::ALL
            .iter()
            .any(|c| !self.columns(*c).is_empty())
    }

    pub fn category_of(&self, column: ColumnIndex) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| self.columns(*c).contains(&column))
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, ColumnIndex, MembershipData};
    use serde_json::json;

    fn props(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn reads_all_three_slots() {
        let data = MembershipData::from_properties(&props(json!({
            "data": { "1": [3, 4], "-1": [7], "2": [] }
        })));
        assert_eq!(
            data.columns(Category::Positive),
            &[ColumnIndex(3), ColumnIndex(4)]
        );
        assert_eq!(data.columns(Category::Negative), &[ColumnIndex(7)]);
        assert!(data.columns(Category::Mixed).is_empty());
        assert!(data.has_any());
    }

    #[test]
    fn first_category_wins() {
        let data = MembershipData::from_properties(&props(json!({
            "data": { "1": [5], "-1": [5], "2": [5, 6] }
        })));
        assert_eq!(data.category_of(ColumnIndex(5)), Some(Category::Positive));
        assert_eq!(data.category_of(ColumnIndex(6)), Some(Category::Mixed));
        assert_eq!(data.category_of(ColumnIndex(9)), None);
    }

    #[test]
    fn empty_or_missing_data_has_no_membership() {
        let empty = MembershipData::from_properties(&props(json!({
            "data": { "1": [], "-1": [], "2": [] }
        })));
        assert!(!empty.has_any());
        let missing = MembershipData::from_properties(&props(json!({ "name": "x" })));
        assert_eq!(missing, MembershipData::default());
    }
}
