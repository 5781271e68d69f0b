use formats::SiteCollection;

/// Background polygons that carry membership data, ready to be drawn as a
/// map's overlay layer.
///
/// Built once from the full background grid and shared by every map.
/// Styles are resolved from each drawn feature's own properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlaySource {
    sites: SiteCollection,
}

impl OverlaySource {
    /// Keeps only the features with at least one non-empty membership slot.
    pub fn from_background(background: &SiteCollection) -> Self {
        let features = background
            .features
            .iter()
            .filter(|f| f.membership().has_any())
            .cloned()
            .collect();
        Self {
            sites: SiteCollection { features },
        }
    }

    pub fn sites(&self) -> &SiteCollection {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
