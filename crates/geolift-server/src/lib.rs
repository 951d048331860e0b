//! GeoLift Server Library
//!
//! HTTP service that turns uploaded shapefile archives into published
//! GeoServer layers.
//!
//! # Overview
//!
//! A single `POST /upload` endpoint accepts a zipped shapefile together
//! with the target GeoServer workspace and datastore. The ingest pipeline
//! then runs in strict sequence:
//!
//! 1. stage the archive under the scratch directory
//! 2. extract it with the external `unzip` tool
//! 3. locate the `.shp` and its mandatory `.shx`/`.dbf` siblings and
//!    derive the canonical layer name
//! 4. import into PostGIS via `ogr2ogr`
//! 5. verify the table against the schema catalog
//! 6. register the layer through the GeoServer REST API
//!
//! Staged files are removed on every exit path, success or failure.
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP surface (multipart upload handling)
//! - **SQLx**: PostGIS schema catalog access
//! - **Reqwest**: GeoServer REST client
//! - **Tower-HTTP**: middleware (CORS, request tracing)

pub mod api;
pub mod config;
pub mod features;
pub mod geoserver;
pub mod ingest;
pub mod middleware;

// Re-export commonly used types
pub use config::Config;
