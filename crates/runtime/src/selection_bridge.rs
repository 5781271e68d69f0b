use std::rc::Rc;

use formats::{FeatureId, SiteCollection};
use scene::{ContainmentTest, PlanarContainment};
use tracing::debug;

use crate::error::BridgeError;
use crate::ports::{AppPorts, OutboundMessage};

/// Scratch layer holding the shape the user is drawing.
pub trait EditableGroup {
    type Shape;

    fn add_shape(&mut self, shape: Self::Shape);
    /// Current contents as a FeatureCollection.
    fn to_sites(&self) -> Result<SiteCollection, BridgeError>;
    fn clear(&mut self);
}

/// Turns finished drawings into `sitesSelected` messages.
///
/// The drawn shape is transient: the editable group is empty again once a
/// drawing has been handled, whether or not the message went out.
#[derive(Debug, Clone)]
pub struct SelectionBridge<T = PlanarContainment> {
    observed: Rc<SiteCollection>,
    containment: T,
}

impl SelectionBridge<PlanarContainment> {
    pub fn new(observed: Rc<SiteCollection>) -> Self {
        Self::with_containment(observed, PlanarContainment)
    }
}

impl<T: ContainmentTest> SelectionBridge<T> {
    pub fn with_containment(observed: Rc<SiteCollection>, containment: T) -> Self {
        Self {
            observed,
            containment,
        }
    }

    pub fn observed(&self) -> &SiteCollection {
        &self.observed
    }

    /// Ids of observed sites inside the first feature of `drawn`.
    pub fn select(&self, drawn: &SiteCollection) -> Vec<FeatureId> {
        drawn
            .first_geometry()
            .map(|shape| self.containment.points_within(shape, &self.observed))
            .unwrap_or_default()
    }

    pub fn on_shape_created<G, P>(
        &self,
        group: &mut G,
        shape: G::Shape,
        ports: &P,
    ) -> Result<Vec<FeatureId>, BridgeError>
    where
        G: EditableGroup,
        P: AppPorts + ?Sized,
    {
        group.add_shape(shape);
        let drawn = group.to_sites();
        let result = drawn.and_then(|drawn| {
            let ids = self.select(&drawn);
            debug!("drawn shape selects {} sites", ids.len());
            ports.send(OutboundMessage::SitesSelected(ids.clone()))?;
            Ok(ids)
        });
        group.clear();
        result
    }

    pub fn on_draw_start<G: EditableGroup>(&self, group: &mut G) {
        group.clear();
    }
}
