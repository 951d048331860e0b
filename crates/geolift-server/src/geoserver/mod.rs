//! GeoServer REST integration
//!
//! Transport lives in [`client`], payload shapes in [`types`]. The
//! publish-stage policy (probe-then-register, conflict tolerance) sits in
//! `crate::ingest::publish` on top of this module.

pub mod client;
pub mod types;

// Re-export main types
pub use client::{GeoServerClient, GeoServerError};
pub use types::{FeatureType, FeatureTypeBody};
