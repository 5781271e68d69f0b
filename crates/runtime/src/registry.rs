use std::collections::BTreeMap;

use foundation::WidgetId;

/// Live map plus its overlay layer, if one has been drawn yet.
#[derive(Debug)]
pub struct MapEntry<M, L> {
    pub map: M,
    pub overlay: Option<L>,
}

/// Maps keyed by the widget id of their container.
///
/// Invariants:
/// - At most one entry per widget id.
/// - An entry holds zero or one overlay layer.
#[derive(Debug)]
pub struct MapRegistry<M, L> {
    entries: BTreeMap<WidgetId, MapEntry<M, L>>,
}

impl<M, L> Default for MapRegistry<M, L> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<M, L> MapRegistry<M, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh map with no overlay. Returns the entry it replaced.
    pub fn insert(&mut self, id: WidgetId, map: M) -> Option<MapEntry<M, L>> {
        self.entries.insert(id, MapEntry { map, overlay: None })
    }

    pub fn remove(&mut self, id: WidgetId) -> Option<MapEntry<M, L>> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&MapEntry<M, L>> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut MapEntry<M, L>> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn overlay_count(&self, id: WidgetId) -> usize {
        self.entries
            .get(&id)
            .map_or(0, |e| usize::from(e.overlay.is_some()))
    }
}
