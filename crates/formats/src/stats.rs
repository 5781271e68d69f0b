use serde::Serialize;
use serde_json::Value;

use crate::feature_id::FeatureId;
use crate::lookup::StatNameLookup;
use crate::site_collection::SiteCollection;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    pub stats: Vec<(String, Value)>,
}

/// Message pushed to the statistics application once at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    pub sites_observed: Vec<SiteStats>,
    pub stat_name_lookup: Vec<(String, Value)>,
}

impl StatsPayload {
    pub fn from_sources(observed: &SiteCollection, names: &StatNameLookup) -> Self {
        let sites_observed = observed
            .features
            .iter()
            .map(|f| SiteStats {
                id: f.id.clone(),
                stats: f
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            })
            .collect();
        Self {
            sites_observed,
            stat_name_lookup: names.entries().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StatsPayload;
    use crate::lookup::StatNameLookup;
    use crate::site_collection::SiteCollection;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn payload_matches_port_shape() {
        let observed = SiteCollection::from_geojson_value(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 2,
                    "properties": { "richness": 14, "phi": 0.5 },
                    "geometry": { "type": "Point", "coordinates": [1, 1] }
                },
                {
                    "type": "Feature",
                    "properties": { "richness": 3 },
                    "geometry": { "type": "Point", "coordinates": [2, 2] }
                }
            ]
        }))
        .expect("parse observed sites");
        let names = StatNameLookup::from_value(json!({ "richness": "Species richness" }))
            .expect("parse names");

        let payload = StatsPayload::from_sources(&observed, &names);
        let value = serde_json::to_value(&payload).expect("serialize payload");

        assert_eq!(
            value,
            json!({
                "sitesObserved": [
                    { "id": 2, "stats": [["richness", 14], ["phi", 0.5]] },
                    { "stats": [["richness", 3]] }
                ],
                "statNameLookup": [["richness", "Species richness"]]
            })
        );
    }
}
