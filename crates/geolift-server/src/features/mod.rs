//! Feature modules implementing the GeoLift API
//!
//! Each feature is a vertical slice owning its routes, request types and
//! error mapping.
//!
//! # Features
//!
//! - **upload**: shapefile archive ingestion and GeoServer publication

pub mod upload;

use std::sync::Arc;

use axum::Router;

use crate::ingest::UploadPipeline;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Fully wired ingestion pipeline, shared across requests
    pub pipeline: Arc<UploadPipeline>,
}

/// Creates the API router with all feature routes mounted
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest("/upload", upload::upload_routes().with_state(state.pipeline.clone()))
}
