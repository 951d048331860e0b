//! Upload pipeline orchestration
//!
//! The stages run in a fixed order with no retries; the first fault wins.
//! Staged paths are removed exactly once per request, after the inner run
//! finishes, on the success and the failure path alike.

use std::sync::Arc;

use tracing::{error, info};

use super::{
    ArchiveStager, DatasetConverter, DatasetLocator, Decompressor, ImportVerifier, LayerPublisher,
    PublishOutcome, Result, StagedArchive, TableCatalog, VerificationResult,
};

/// One accepted upload, owned by the pipeline for the request's lifetime
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub workspace: String,
    pub datastore: String,
}

/// What a successful run produced
#[derive(Debug)]
pub struct PipelineReport {
    pub layer_name: String,
    pub verification: VerificationResult,
    pub publish: PublishOutcome,
}

/// Drives an upload through staging, extraction, location, import,
/// verification and publication.
pub struct UploadPipeline {
    stager: ArchiveStager,
    decompressor: Arc<dyn Decompressor>,
    converter: Arc<dyn DatasetConverter>,
    catalog: Arc<dyn TableCatalog>,
    publisher: LayerPublisher,
}

impl UploadPipeline {
    pub fn new(
        stager: ArchiveStager,
        decompressor: Arc<dyn Decompressor>,
        converter: Arc<dyn DatasetConverter>,
        catalog: Arc<dyn TableCatalog>,
        publisher: LayerPublisher,
    ) -> Self {
        Self {
            stager,
            decompressor,
            converter,
            catalog,
            publisher,
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            file = %request.file_name,
            workspace = %request.workspace,
            datastore = %request.datastore,
        )
    )]
    pub async fn run(&self, request: UploadRequest) -> Result<PipelineReport> {
        info!("Step 1/6: staging uploaded archive");
        let staged = self
            .stager
            .stage(&request.file_name, &request.bytes)
            .await?;

        let result = self.run_staged(&staged, &request).await;

        // Cleanup runs once, whatever the inner result, and never
        // replaces it.
        self.stager.cleanup_staged(&staged).await;

        match &result {
            Ok(report) => info!(layer = %report.layer_name, "upload pipeline completed"),
            Err(err) => error!(error = %err, "upload pipeline failed"),
        }

        result
    }

    async fn run_staged(
        &self,
        staged: &StagedArchive,
        request: &UploadRequest,
    ) -> Result<PipelineReport> {
        info!("Step 2/6: extracting archive");
        self.decompressor
            .decompress(&staged.archive_path, &staged.extract_dir)
            .await?;

        info!("Step 3/6: locating shapefile");
        let descriptor = DatasetLocator::locate(&staged.extract_dir).await?;

        info!(layer = %descriptor.layer_name, "Step 4/6: importing dataset into PostGIS");
        let outcome = self
            .converter
            .import(&descriptor.shp_path, &descriptor.layer_name)
            .await?;

        info!("Step 5/6: verifying imported table");
        let verification =
            ImportVerifier::verify(self.catalog.as_ref(), &outcome.table_name).await?;

        info!("Step 6/6: publishing layer on GeoServer");
        let publish = self
            .publisher
            .publish(&request.workspace, &request.datastore, &descriptor.layer_name)
            .await?;

        Ok(PipelineReport {
            layer_name: descriptor.layer_name,
            verification,
            publish,
        })
    }
}
