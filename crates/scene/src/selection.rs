use std::collections::HashSet;

use formats::FeatureId;

/// Ordered list of selected site ids.
///
/// Ids are held in their textual form so a numeric feature id `3` matches the
/// attribute token `"3"`.
///
/// Ordering contract:
/// - `ids()` yields ids in the order they were supplied, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSelection {
    ids: Vec<String>,
    lookup: HashSet<String>,
}

impl SiteSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a space-separated attribute value. A missing attribute is an
    /// empty selection.
    pub fn from_attribute(value: Option<&str>) -> Self {
        value
            .map(|v| Self::from_tokens(v.split_whitespace()))
            .unwrap_or_default()
    }

    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let ids: Vec<String> = tokens.into_iter().map(str::to_string).collect();
        let lookup = ids.iter().cloned().collect();
        Self { ids, lookup }
    }

    pub fn from_feature_ids(ids: &[FeatureId]) -> Self {
        let ids: Vec<String> = ids.iter().map(FeatureId::as_text).collect();
        let lookup = ids.iter().cloned().collect();
        Self { ids, lookup }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.lookup.contains(&id.as_text())
    }
}
