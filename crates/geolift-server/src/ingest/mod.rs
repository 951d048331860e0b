//! Archive ingestion pipeline
//!
//! Everything between "multipart body arrived" and "layer is live on
//! GeoServer" lives here, split by stage:
//!
//! - `staging`: persist the uploaded archive under the scratch directory
//! - `extract`: unpack the archive with the external unzip tool
//! - `locate`: find and validate the shapefile inside the extraction
//! - `import`: load the dataset into PostGIS via ogr2ogr
//! - `verify`: confirm the imported table against `information_schema`
//! - `publish`: register the layer with GeoServer
//! - `pipeline`: drive the stages in order and guarantee cleanup
//! - `tool`: shared subprocess runner with deadline enforcement

pub mod extract;
pub mod import;
pub mod locate;
pub mod pipeline;
pub mod publish;
pub mod staging;
pub mod tool;
pub mod verify;

pub use extract::{Decompressor, UnzipTool};
pub use import::{DatasetConverter, ImportOutcome, OgrTool};
pub use locate::{DatasetDescriptor, DatasetLocator, ExtractedFileSet};
pub use pipeline::{PipelineReport, UploadPipeline, UploadRequest};
pub use publish::{LayerPublisher, PublishError, PublishOutcome};
pub use staging::{ArchiveStager, StagedArchive};
pub use tool::{ToolError, ToolOutput};
pub use verify::{ColumnInfo, ImportVerifier, PgCatalog, TableCatalog, VerificationResult};

/// Result type for pipeline stages
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Faults a pipeline run can surface, one variant per stage.
///
/// `NoDatasetFound` and `IncompleteDataset` describe a bad archive and map
/// to client errors at the API layer; the rest are server-side faults.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to extract zip file: {0}")]
    Extraction(String),

    #[error("No .shp file found in the archive")]
    NoDatasetFound { extracted_files: Vec<String> },

    #[error("Missing required shapefile component: {file_name}")]
    IncompleteDataset { file_name: String },

    #[error("Failed to import to PostGIS: {0}")]
    Import(String),

    #[error("Table was not created in PostGIS: {0}")]
    Verification(String),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
