use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::api::response::{UploadAccepted, UploadRejection};
use crate::ingest::{PipelineError, UploadPipeline, UploadRequest};

use super::types::{UploadForm, DEFAULT_ARCHIVE_NAME};

/// Shapefile archives routinely run to hundreds of megabytes; axum's
/// default 2 MB body cap would reject them.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

pub fn upload_routes() -> Router<Arc<UploadPipeline>> {
    Router::new()
        .route("/", post(upload_archive))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[tracing::instrument(skip(pipeline, multipart))]
async fn upload_archive(
    State(pipeline): State<Arc<UploadPipeline>>,
    multipart: Multipart,
) -> Result<Response, UploadApiError> {
    let form = UploadForm::from_multipart(multipart)
        .await
        .map_err(|err| UploadApiError::Malformed(err.to_string()))?;

    let bytes = form.bytes.ok_or(UploadApiError::NoFile)?;
    let file_name = form
        .file_name
        .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string());

    let (workspace, datastore) = match (form.workspace, form.datastore) {
        (Some(workspace), Some(datastore)) => (workspace, datastore),
        _ => return Err(UploadApiError::MissingTarget),
    };

    let report = pipeline
        .run(UploadRequest {
            file_name,
            bytes,
            workspace,
            datastore,
        })
        .await?;

    tracing::info!(
        layer = %report.layer_name,
        has_geometry = report.verification.has_geometry,
        "Upload and publish completed successfully"
    );

    Ok((StatusCode::OK, Json(UploadAccepted::new(report.layer_name))).into_response())
}

#[derive(Debug)]
enum UploadApiError {
    NoFile,
    MissingTarget,
    Malformed(String),
    Pipeline(PipelineError),
}

impl From<PipelineError> for UploadApiError {
    fn from(err: PipelineError) -> Self {
        Self::Pipeline(err)
    }
}

impl IntoResponse for UploadApiError {
    fn into_response(self) -> Response {
        match self {
            UploadApiError::NoFile => {
                let body = UploadRejection::new("No file uploaded");
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            UploadApiError::MissingTarget => {
                let body = UploadRejection::new("Workspace and datastore are required");
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            UploadApiError::Malformed(detail) => {
                let body = UploadRejection::with_details("Malformed upload request", detail);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            UploadApiError::Pipeline(PipelineError::NoDatasetFound { extracted_files }) => {
                let body = UploadRejection::with_extracted_files(
                    "No .shp file found in the archive",
                    extracted_files,
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            UploadApiError::Pipeline(err @ PipelineError::IncompleteDataset { .. }) => {
                let body = UploadRejection::new(err.to_string());
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            UploadApiError::Pipeline(err) => {
                tracing::error!("Upload process error: {err}");
                let body = UploadRejection::with_details("Upload failed", err.to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl std::fmt::Display for UploadApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFile => write!(f, "No file uploaded"),
            Self::MissingTarget => write!(f, "Workspace and datastore are required"),
            Self::Malformed(detail) => write!(f, "Malformed upload request: {detail}"),
            Self::Pipeline(err) => write!(f, "{err}"),
        }
    }
}
