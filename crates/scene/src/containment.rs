use formats::{FeatureId, SiteCollection};
use geo::{Geometry, Relate};

/// Geometric predicate used to turn a drawn shape into a site selection.
pub trait ContainmentTest {
    /// True when `feature` lies entirely inside `shape`.
    fn within(&self, feature: &Geometry<f64>, shape: &Geometry<f64>) -> bool;

    /// Ids of the features of `sites` that lie within `shape`.
    ///
    /// Ordering contract:
    /// - Ids are returned in the collection's document order.
    /// - Features without an id or without a geometry are skipped.
    fn points_within(&self, shape: &Geometry<f64>, sites: &SiteCollection) -> Vec<FeatureId> {
        sites
            .features
            .iter()
            .filter_map(|f| {
                let id = f.id.as_ref()?;
                let geometry = f.geometry.as_ref()?;
                self.within(geometry, shape).then(|| id.clone())
            })
            .collect()
    }
}

/// DE-9IM "within" from `geo`, with lon/lat treated as planar x/y.
///
/// Positions on the shape's boundary are not within it.
#[derive(Debug, Default, Copy, Clone)]
pub struct PlanarContainment;

impl ContainmentTest for PlanarContainment {
    fn within(&self, feature: &Geometry<f64>, shape: &Geometry<f64>) -> bool {
        feature.relate(shape).is_within()
    }
}
