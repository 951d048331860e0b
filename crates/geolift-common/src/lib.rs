//! GeoLift Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared functionality for the GeoLift workspace members:
//!
//! - **Logging**: tracing subscriber configuration and initialization
//! - **Naming**: canonical layer-name derivation for imported datasets
//!
//! # Example
//!
//! ```
//! use geolift_common::naming::sanitize_layer_name;
//!
//! assert_eq!(sanitize_layer_name("2024-Sites"), "_2024_sites");
//! ```

pub mod logging;
pub mod naming;

// Re-export commonly used functions
pub use naming::{layer_title, sanitize_layer_name};
