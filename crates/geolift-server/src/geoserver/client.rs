//! GeoServer REST client

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use crate::config::GeoServerConfig;

use super::types::{FeatureType, FeatureTypeBody};

/// Result type for GeoServer transport operations
pub type Result<T> = std::result::Result<T, GeoServerError>;

/// Transport-level failures talking to GeoServer
#[derive(Debug, thiserror::Error)]
pub enum GeoServerError {
    #[error("GeoServer request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin client over the two GeoServer REST calls the pipeline needs:
/// probing a feature type and registering one. Both authenticate with the
/// configured basic-auth pair.
#[derive(Debug, Clone)]
pub struct GeoServerClient {
    http: Client,
    config: GeoServerConfig,
}

impl GeoServerClient {
    /// Create a client; the registration timeout doubles as the client-wide
    /// default, the shorter probe timeout is applied per request.
    pub fn new(config: GeoServerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.publish_timeout_secs))
            .user_agent("geolift-server/0.1")
            .build()?;

        Ok(Self { http, config })
    }

    fn feature_types_url(&self, workspace: &str, datastore: &str) -> String {
        format!(
            "{}/rest/workspaces/{}/datastores/{}/featuretypes",
            self.config.base_url, workspace, datastore
        )
    }

    /// Ask GeoServer whether a feature type is already registered.
    ///
    /// Returns the raw status; interpreting it (200 = exists, 404 = absent,
    /// anything else = inconclusive) is the caller's policy.
    pub async fn probe_feature_type(
        &self,
        workspace: &str,
        datastore: &str,
        layer: &str,
    ) -> Result<StatusCode> {
        let url = format!(
            "{}/{}.json",
            self.feature_types_url(workspace, datastore),
            layer
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(Duration::from_secs(self.config.probe_timeout_secs))
            .send()
            .await?;

        Ok(response.status())
    }

    /// Register a feature type under the given workspace and datastore.
    ///
    /// Returns the raw response so the caller can apply its status-code
    /// policy (409-as-success in particular).
    pub async fn create_feature_type(
        &self,
        workspace: &str,
        datastore: &str,
        feature_type: FeatureType,
    ) -> Result<Response> {
        let url = format!("{}.json", self.feature_types_url(workspace, datastore));

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&FeatureTypeBody { feature_type })
            .send()
            .await?;

        Ok(response)
    }
}
