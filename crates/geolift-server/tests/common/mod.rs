//! Common test utilities for GeoLift server integration tests
//!
//! Provides fake pipeline capabilities (decompressor, converter, catalog),
//! a wiremock-friendly pipeline builder, a raw multipart body builder for
//! router tests, and a PostgreSQL testcontainer wrapper for the
//! Docker-gated catalog tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

use geolift_server::config::GeoServerConfig;
use geolift_server::geoserver::GeoServerClient;
use geolift_server::ingest::{
    ArchiveStager, ColumnInfo, DatasetConverter, Decompressor, ImportOutcome, LayerPublisher,
    PipelineError, TableCatalog, UploadPipeline,
};

// ============================================================================
// Fake pipeline capabilities
// ============================================================================

/// Decompressor fake that writes a fixed file listing into the extraction
/// directory instead of invoking a real tool.
pub struct FakeDecompressor {
    files: Vec<String>,
}

impl FakeDecompressor {
    pub fn with_files(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// A complete shapefile set for `base`
    pub fn shapefile(base: &str) -> Self {
        Self {
            files: vec![
                format!("{base}.shp"),
                format!("{base}.shx"),
                format!("{base}.dbf"),
            ],
        }
    }
}

#[async_trait]
impl Decompressor for FakeDecompressor {
    async fn decompress(&self, _archive: &Path, dest: &Path) -> Result<(), PipelineError> {
        for name in &self.files {
            tokio::fs::write(dest.join(name), b"fake").await?;
        }
        Ok(())
    }
}

/// Decompressor fake that always fails, standing in for a corrupt archive
pub struct FailingDecompressor;

#[async_trait]
impl Decompressor for FailingDecompressor {
    async fn decompress(&self, _archive: &Path, _dest: &Path) -> Result<(), PipelineError> {
        Err(PipelineError::Extraction(
            "unzip exited with exit status: 9: End-of-central-directory signature not found"
                .to_string(),
        ))
    }
}

/// Converter fake that records every layer name it was asked to import
pub struct FakeConverter {
    imported: Mutex<Vec<String>>,
    fail_with: Option<String>,
}

impl FakeConverter {
    pub fn succeeding() -> Self {
        Self {
            imported: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(diagnostics: &str) -> Self {
        Self {
            imported: Mutex::new(Vec::new()),
            fail_with: Some(diagnostics.to_string()),
        }
    }

    pub fn imported_layers(&self) -> Vec<String> {
        self.imported.lock().unwrap().clone()
    }
}

#[async_trait]
impl DatasetConverter for FakeConverter {
    async fn import(
        &self,
        _shp_path: &Path,
        layer_name: &str,
    ) -> Result<ImportOutcome, PipelineError> {
        self.imported.lock().unwrap().push(layer_name.to_string());

        if let Some(diagnostics) = &self.fail_with {
            return Err(PipelineError::Import(diagnostics.clone()));
        }

        Ok(ImportOutcome {
            table_name: layer_name.to_string(),
            diagnostics: String::new(),
        })
    }
}

/// Catalog fake serving a fixed column set and counting lookups
pub struct FakeCatalog {
    rows: Vec<ColumnInfo>,
    lookups: Mutex<Vec<String>>,
}

impl FakeCatalog {
    /// Catalog that reports a standard imported table with a geometry column
    pub fn with_geometry() -> Self {
        Self {
            rows: vec![
                column("gid", "integer"),
                column("name", "character varying"),
                column("geom", "USER-DEFINED"),
            ],
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Catalog that reports no table at all
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl TableCatalog for FakeCatalog {
    async fn table_columns(&self, table_name: &str) -> Result<Vec<ColumnInfo>, PipelineError> {
        self.lookups.lock().unwrap().push(table_name.to_string());
        Ok(self.rows.clone())
    }
}

pub fn column(name: &str, data_type: &str) -> ColumnInfo {
    ColumnInfo {
        column_name: name.to_string(),
        data_type: data_type.to_string(),
    }
}

// ============================================================================
// Pipeline and publisher builders
// ============================================================================

/// GeoServer client pointed at `base_url` with short test timeouts
pub fn test_geoserver_client(base_url: &str) -> GeoServerClient {
    let config = GeoServerConfig {
        base_url: base_url.to_string(),
        username: "admin".to_string(),
        password: "geoserver".to_string(),
        probe_timeout_secs: 5,
        publish_timeout_secs: 5,
    };
    GeoServerClient::new(config).expect("client construction should not fail")
}

pub fn test_publisher(base_url: &str) -> LayerPublisher {
    LayerPublisher::new(test_geoserver_client(base_url), "EPSG:4326")
}

/// Assemble a pipeline from fakes. `geoserver_url` usually points at a
/// wiremock server; tests that fail before publication can pass an
/// unreachable address.
pub fn build_pipeline(
    scratch_dir: &Path,
    decompressor: Arc<dyn Decompressor>,
    converter: Arc<dyn DatasetConverter>,
    catalog: Arc<dyn TableCatalog>,
    geoserver_url: &str,
) -> UploadPipeline {
    UploadPipeline::new(
        ArchiveStager::new(scratch_dir),
        decompressor,
        converter,
        catalog,
        test_publisher(geoserver_url),
    )
}

/// Address no listener is bound to; publish attempts against it fail fast
pub const UNREACHABLE_GEOSERVER: &str = "http://127.0.0.1:9";

/// Immediate entries of `dir`, sorted, for cleanup assertions
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("scratch dir should exist")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Multipart body builder
// ============================================================================

pub const MULTIPART_BOUNDARY: &str = "geolift-test-boundary";

/// Content-Type header value matching [`multipart_body`]
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

/// One part of a hand-built multipart body
pub enum Part<'a> {
    Text { name: &'a str, value: &'a str },
    File { name: &'a str, file_name: &'a str, bytes: &'a [u8] },
}

/// Build a raw multipart/form-data body for router tests
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/zip\r\n\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

// ============================================================================
// PostgreSQL test container
// ============================================================================

/// PostgreSQL test container wrapper for the Docker-gated catalog tests
pub struct TestPostgres {
    container: ContainerAsync<Postgres>,
    pool: PgPool,
}

impl TestPostgres {
    pub async fn start() -> Result<Self> {
        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?;
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .await
            .context("Failed to get container port")?;

        let connection_string = format!("postgresql://postgres:postgres@{host}:{port}/postgres");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&connection_string)
            .await
            .context("Failed to connect to PostgreSQL")?;

        Ok(Self { container, pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn pool_clone(&self) -> PgPool {
        self.pool.clone()
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// Initialize tracing for tests
pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,geolift_server=debug,sqlx=warn,testcontainers=info")
        }))
        .with_test_writer()
        .try_init();
}
