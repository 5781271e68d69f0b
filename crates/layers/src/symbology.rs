use formats::{Category, ColumnIndex, FeatureId, MembershipData};
use scene::SiteSelection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Path options handed to the map widget for one polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonStyle {
    pub fill: bool,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePalette {
    pub positive: String,
    pub negative: String,
    pub mixed: String,
    pub selected: String,
    pub fill_opacity: f64,
}

impl StylePalette {
    pub fn category_color(&self, category: Category) -> &str {
        match category {
            Category::Positive => &self.positive,
            Category::Negative => &self.negative,
            Category::Mixed => &self.mixed,
        }
    }
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            positive: "blue".to_string(),
            negative: "red".to_string(),
            mixed: "purple".to_string(),
            selected: "red".to_string(),
            fill_opacity: 1.0,
        }
    }
}

/// Per-feature styling for one container's current attributes.
///
/// A column match takes precedence over selection membership; categories are
/// tried in `Category::ALL` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleResolver {
    selection: SiteSelection,
    column: Option<ColumnIndex>,
    palette: StylePalette,
}

impl StyleResolver {
    pub fn new(selection: SiteSelection, column: Option<ColumnIndex>, palette: StylePalette) -> Self {
        Self {
            selection,
            column,
            palette,
        }
    }

    pub fn selection(&self) -> &SiteSelection {
        &self.selection
    }

    pub fn column(&self) -> Option<ColumnIndex> {
        self.column
    }

    pub fn resolve(&self, id: Option<&FeatureId>, membership: &MembershipData) -> PolygonStyle {
        if let Some(category) = self.column.and_then(|c| membership.category_of(c)) {
            return self.filled(self.palette.category_color(category));
        }

        let included = id.is_some_and(|id| self.selection.contains(id));
        PolygonStyle {
            fill: included,
            ..self.filled(&self.palette.selected)
        }
    }

    /// Style for the feature being drawn, read from its own id and
    /// properties so duplicate ids never borrow another feature's membership.
    pub fn style_for(&self, id: Option<&FeatureId>, properties: &Map<String, Value>) -> PolygonStyle {
        self.resolve(id, &MembershipData::from_properties(properties))
    }

    fn filled(&self, color: &str) -> PolygonStyle {
        PolygonStyle {
            fill: true,
            fill_color: color.to_string(),
            fill_opacity: self.palette.fill_opacity,
            stroke: false,
        }
    }
}
