use layers::StylePalette;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Everything the bridge needs to know about the host page.
///
/// Every field has a default matching the stats page, so an empty JSON object
/// (or no config at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Class that marks an element as a map container.
    pub marker_class: String,
    /// Space-separated site ids to highlight.
    pub sites_attribute: String,
    /// Column name to color by.
    pub column_attribute: String,
    /// Element whose rectangle receives forwarded pointer events.
    pub plot_element_id: String,
    /// Element the statistics application is embedded into.
    pub host_element_id: String,
    /// Elm module exposing `embed`.
    pub app_module: String,
    pub datasets: DatasetNames,
    pub tiles: TileLayerConfig,
    pub world_copy_jump: bool,
    pub draw: DrawToolsConfig,
    pub palette: StylePalette,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            marker_class: "leaflet-map".to_string(),
            sites_attribute: "data-map-sites".to_string(),
            column_attribute: "data-map-column".to_string(),
            plot_element_id: "plot".to_string(),
            host_element_id: "app".to_string(),
            app_module: "StatsTreeMap".to_string(),
            datasets: DatasetNames::default(),
            tiles: TileLayerConfig::default(),
            world_copy_jump: true,
            draw: DrawToolsConfig::default(),
            palette: StylePalette::default(),
        }
    }
}

impl BridgeConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, BridgeError> {
        let config: Self =
            serde_json::from_str(payload).map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.marker_class.trim().is_empty() {
            return Err(BridgeError::Config("marker_class must not be empty".to_string()));
        }
        if self.tiles.min_zoom > self.tiles.max_zoom {
            return Err(BridgeError::Config(format!(
                "tile min_zoom {} exceeds max_zoom {}",
                self.tiles.min_zoom, self.tiles.max_zoom
            )));
        }
        Ok(())
    }

    /// Attributes whose changes restyle a container.
    pub fn watched_attributes(&self) -> Vec<String> {
        vec![self.sites_attribute.clone(), self.column_attribute.clone()]
    }
}

/// Names of the page globals holding the pre-loaded datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetNames {
    /// Polygon-per-site grid with membership data.
    pub background: String,
    pub observed_sites: String,
    pub node_lookup: String,
    pub stat_names: String,
    /// Flags handed to the statistics application.
    pub matrix: String,
    pub taxon_tree: String,
}

impl Default for DatasetNames {
    fn default() -> Self {
        Self {
            background: "ancPam".to_string(),
            observed_sites: "sitesObserved".to_string(),
            node_lookup: "nodeLookup".to_string(),
            stat_names: "statNameLookup".to_string(),
            matrix: "mcpaMatrix".to_string(),
            taxon_tree: "taxonTree".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerConfig {
    pub url_template: String,
    pub attribution: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            url_template: "http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap".to_string(),
            min_zoom: 2,
            max_zoom: 12,
        }
    }
}

/// Which draw tools the draw control offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawToolsConfig {
    pub polygon: bool,
    pub rectangle: bool,
    pub polyline: bool,
    pub marker: bool,
    pub circle: bool,
    pub circlemarker: bool,
}

impl Default for DrawToolsConfig {
    fn default() -> Self {
        Self {
            polygon: true,
            rectangle: true,
            polyline: false,
            marker: false,
            circle: false,
            circlemarker: false,
        }
    }
}
