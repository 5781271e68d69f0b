use formats::{NodeLookup, SiteCollection, StatNameLookup};
use serde_json::Value;

use crate::error::BridgeError;

/// Page datasets the bridge reads. The application's own flags are not here;
/// they pass through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub background: SiteCollection,
    pub observed: SiteCollection,
    pub nodes: NodeLookup,
    pub stat_names: StatNameLookup,
}

impl Datasets {
    pub fn from_values(
        background: Value,
        observed: Value,
        nodes: Value,
        stat_names: Value,
    ) -> Result<Self, BridgeError> {
        Ok(Self {
            background: SiteCollection::from_geojson_value(background).map_err(|source| {
                BridgeError::Dataset {
                    name: "background",
                    source,
                }
            })?,
            observed: SiteCollection::from_geojson_value(observed).map_err(|source| {
                BridgeError::Dataset {
                    name: "observed sites",
                    source,
                }
            })?,
            nodes: NodeLookup::from_value(nodes).map_err(|source| BridgeError::Dataset {
                name: "node lookup",
                source,
            })?,
            stat_names: StatNameLookup::from_value(stat_names).map_err(|source| {
                BridgeError::Dataset {
                    name: "statistic names",
                    source,
                }
            })?,
        })
    }
}
