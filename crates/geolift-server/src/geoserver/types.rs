//! GeoServer REST payload types

use geolift_common::naming::layer_title;
use serde::Serialize;

/// Envelope for `POST .../featuretypes.json`.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureTypeBody {
    #[serde(rename = "featureType")]
    pub feature_type: FeatureType,
}

/// Registration payload for one vector layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureType {
    pub name: String,
    /// Must match the PostGIS table name exactly; GeoServer binds the
    /// feature type to the table through it.
    pub native_name: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_: String,
    pub enabled: bool,
    pub srs: String,
    #[serde(rename = "nativeCRS")]
    pub native_crs: String,
    /// `FORCE_DECLARED` tells GeoServer to trust the declared SRS instead
    /// of inferring one from the data.
    pub projection_policy: String,
}

impl FeatureType {
    /// Build the registration payload for an imported table.
    pub fn for_table(layer_name: &str, srs: &str) -> Self {
        Self {
            name: layer_name.to_string(),
            native_name: layer_name.to_string(),
            title: layer_title(layer_name),
            abstract_: format!("Feature type for {layer_name}"),
            enabled: true,
            srs: srs.to_string(),
            native_crs: srs.to_string(),
            projection_policy: "FORCE_DECLARED".to_string(),
        }
    }
}
