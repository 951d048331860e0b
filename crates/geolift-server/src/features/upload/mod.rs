//! Archive upload feature
//!
//! `POST /upload` accepts a multipart form with a zipped shapefile plus
//! the target GeoServer workspace and datastore, and hands it to the
//! ingestion pipeline.

pub mod routes;
pub mod types;

pub use routes::upload_routes;
