use foundation::LonLatBounds;
use geo::{BoundingRect, Geometry};
use geojson::GeoJson;
use serde_json::{Map, Value};

use crate::error::DatasetError;
use crate::feature_id::FeatureId;
use crate::membership::MembershipData;

#[derive(Debug, Clone, PartialEq)]
pub struct SiteFeature {
    pub id: Option<FeatureId>,
    pub properties: Map<String, Value>,
    /// `None` for features whose geometry is `null` or absent.
    pub geometry: Option<Geometry<f64>>,
}

impl SiteFeature {
    pub fn membership(&self) -> MembershipData {
        MembershipData::from_properties(&self.properties)
    }

    pub fn bounds(&self) -> Option<LonLatBounds> {
        let rect = self.geometry.as_ref()?.bounding_rect()?;
        Some(LonLatBounds::new(
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y,
        ))
    }
}

/// A GeoJSON FeatureCollection of per-site features: the background polygon
/// grid, the observed sites, or the contents of a drawing layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteCollection {
    pub features: Vec<SiteFeature>,
}

impl SiteCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(mut value: Value) -> Result<Self, DatasetError> {
        // Leaflet tolerates features without a geometry member; geojson does not.
        if let Some(features) = value.get_mut("features").and_then(Value::as_array_mut) {
            for feature in features.iter_mut().filter_map(Value::as_object_mut) {
                feature
                    .entry("geometry".to_string())
                    .or_insert(Value::Null);
            }
        }
        let GeoJson::FeatureCollection(collection) = GeoJson::from_json_value(value)? else {
            return Err(DatasetError::NotAFeatureCollection);
        };

        let mut features = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            let geometry = feature
                .geometry
                .map(|g| Geometry::<f64>::try_from(g.value))
                .transpose()
                .map_err(|err| DatasetError::InvalidFeature {
                    index,
                    reason: err.to_string(),
                })?;
            features.push(SiteFeature {
                id: feature.id.map(FeatureId::from),
                properties: feature.properties.unwrap_or_default(),
                geometry,
            });
        }
        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Geometry of the first feature, the way a drawing layer hands back the
    /// shape the user just finished.
    pub fn first_geometry(&self) -> Option<&Geometry<f64>> {
        self.features.first().and_then(|f| f.geometry.as_ref())
    }

    /// Bounding box over every feature; `None` when no feature has a position.
    pub fn bounds(&self) -> Option<LonLatBounds> {
        self.features
            .iter()
            .filter_map(SiteFeature::bounds)
            .reduce(LonLatBounds::union)
    }

    /// Emits the collection back as a GeoJSON FeatureCollection.
    pub fn to_geojson_value(&self) -> Result<Value, DatasetError> {
        let features = self
            .features
            .iter()
            .map(|f| geojson::Feature {
                bbox: None,
                geometry: f
                    .geometry
                    .as_ref()
                    .map(|g| geojson::Geometry::new(geojson::Value::from(g))),
                id: f.id.clone().map(geojson::feature::Id::from),
                properties: Some(f.properties.clone()),
                foreign_members: None,
            })
            .collect();
        let collection = geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        Ok(serde_json::to_value(&collection)?)
    }
}
