//! Dataset import behind the `DatasetConverter` capability seam

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{DatabaseConfig, IngestConfig};

use super::tool::run_tool;
use super::{PipelineError, Result};

/// Result of a completed import
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Database table the dataset landed in (equal to the layer name)
    pub table_name: String,
    /// Captured tool output, kept verbatim for the response on failure paths
    pub diagnostics: String,
}

/// Capability seam over the external format conversion. Production shells
/// out to `ogr2ogr`; tests substitute in-process fakes.
#[async_trait]
pub trait DatasetConverter: Send + Sync {
    /// Load the dataset at `shp_path` into the spatial database under
    /// `layer_name`, replacing any previous table of that name.
    async fn import(&self, shp_path: &Path, layer_name: &str) -> Result<ImportOutcome>;
}

/// External `ogr2ogr` invocation targeting PostGIS.
///
/// The connection string is passed as one argv entry; no shell is involved,
/// so layer and path values cannot be interpreted as shell syntax.
#[derive(Debug, Clone)]
pub struct OgrTool {
    program: String,
    pg_connection: String,
    target_srs: String,
    deadline: Duration,
}

impl OgrTool {
    pub fn new(ingest: &IngestConfig, database: &DatabaseConfig) -> Self {
        Self {
            program: ingest.ogr2ogr_program.clone(),
            pg_connection: database.ogr_connection_string(),
            target_srs: ingest.target_srs.clone(),
            deadline: Duration::from_secs(ingest.import_timeout_secs),
        }
    }

    fn import_args(&self, shp_path: &Path, layer_name: &str) -> Vec<OsString> {
        vec![
            OsString::from("-f"),
            OsString::from("PostgreSQL"),
            OsString::from(&self.pg_connection),
            shp_path.as_os_str().to_os_string(),
            OsString::from("-nln"),
            OsString::from(layer_name),
            OsString::from("-overwrite"),
            OsString::from("-lco"),
            OsString::from("GEOMETRY_NAME=geom"),
            OsString::from("-lco"),
            OsString::from("FID=gid"),
            OsString::from("-t_srs"),
            OsString::from(&self.target_srs),
        ]
    }
}

#[async_trait]
impl DatasetConverter for OgrTool {
    async fn import(&self, shp_path: &Path, layer_name: &str) -> Result<ImportOutcome> {
        // The connection string carries the database password; it is never
        // logged, only handed to the child process.
        let args = self.import_args(shp_path, layer_name);

        let output = run_tool(&self.program, args, Some(self.deadline))
            .await
            .map_err(|err| PipelineError::Import(err.diagnostics()))?;

        debug!(layer = layer_name, "dataset imported");

        Ok(ImportOutcome {
            table_name: layer_name.to_string(),
            diagnostics: output.combined(),
        })
    }
}
