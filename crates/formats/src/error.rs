use std::fmt;

/// Failure to read one of the pre-loaded page datasets.
#[derive(Debug)]
pub enum DatasetError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
    InvalidLookup { name: &'static str, reason: String },
    Json(serde_json::Error),
    GeoJson(geojson::Error),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            DatasetError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
            DatasetError::InvalidLookup { name, reason } => {
                write!(f, "invalid {name} lookup: {reason}")
            }
            DatasetError::Json(err) => write!(f, "JSON parse error: {err}"),
            DatasetError::GeoJson(err) => write!(f, "GeoJSON error: {err}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Json(err) => Some(err),
            DatasetError::GeoJson(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::Json(err)
    }
}

impl From<geojson::Error> for DatasetError {
    fn from(err: geojson::Error) -> Self {
        DatasetError::GeoJson(err)
    }
}
