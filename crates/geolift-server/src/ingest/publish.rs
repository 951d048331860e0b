//! Idempotent layer publication on GeoServer

use reqwest::StatusCode;
use tracing::{info, warn};

use crate::geoserver::{FeatureType, GeoServerClient, GeoServerError};

/// Result of one publication attempt. A layer that is already registered
/// is a success, not a conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created { layer_name: String },
    AlreadyExists { layer_name: String },
}

impl PublishOutcome {
    pub fn layer_name(&self) -> &str {
        match self {
            PublishOutcome::Created { layer_name }
            | PublishOutcome::AlreadyExists { layer_name } => layer_name,
        }
    }
}

/// Publication failures surfaced to the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("GeoServer rejected the layer configuration. Check if the table '{layer}' exists in PostGIS and has the correct structure.")]
    Rejected { layer: String },

    #[error("Workspace '{workspace}' or datastore '{datastore}' not found in GeoServer.")]
    TargetNotFound { workspace: String, datastore: String },

    #[error("Failed to publish layer: {status} - {body}")]
    Unexpected { status: StatusCode, body: String },

    #[error(transparent)]
    Transport(#[from] GeoServerError),
}

/// Registers imported tables as GeoServer feature types.
///
/// Probes for an existing registration first; the probe is advisory, so an
/// inconclusive answer falls through to registration rather than failing
/// the upload.
#[derive(Debug, Clone)]
pub struct LayerPublisher {
    client: GeoServerClient,
    srs: String,
}

impl LayerPublisher {
    pub fn new(client: GeoServerClient, srs: impl Into<String>) -> Self {
        Self {
            client,
            srs: srs.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn publish(
        &self,
        workspace: &str,
        datastore: &str,
        layer_name: &str,
    ) -> Result<PublishOutcome, PublishError> {
        match self
            .client
            .probe_feature_type(workspace, datastore, layer_name)
            .await
        {
            Ok(status) if status.is_success() => {
                info!("layer already exists, skipping registration");
                return Ok(PublishOutcome::AlreadyExists {
                    layer_name: layer_name.to_string(),
                });
            }
            Ok(status) if status == StatusCode::NOT_FOUND => {}
            Ok(status) => {
                warn!(%status, "inconclusive existence probe, registering anyway");
            }
            Err(err) => {
                warn!(error = %err, "existence probe failed, registering anyway");
            }
        }

        let feature_type = FeatureType::for_table(layer_name, &self.srs);
        let response = self
            .client
            .create_feature_type(workspace, datastore, feature_type)
            .await?;
        let status = response.status();

        if status.is_success() {
            info!(%status, "layer published");
            Ok(PublishOutcome::Created {
                layer_name: layer_name.to_string(),
            })
        } else if status == StatusCode::CONFLICT {
            warn!("layer already exists in GeoServer, treating as success");
            Ok(PublishOutcome::AlreadyExists {
                layer_name: layer_name.to_string(),
            })
        } else if status == StatusCode::BAD_REQUEST {
            Err(PublishError::Rejected {
                layer: layer_name.to_string(),
            })
        } else if status == StatusCode::NOT_FOUND {
            Err(PublishError::TargetNotFound {
                workspace: workspace.to_string(),
                datastore: datastore.to_string(),
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PublishError::Unexpected { status, body })
        }
    }
}
