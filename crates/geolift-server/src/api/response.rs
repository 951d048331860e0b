//! Upload API response bodies
//!
//! Field names (`layerName`, `extractedFiles`) follow the JSON contract the
//! map front end consumes, hence the serde renames.

use serde::Serialize;

/// Body returned when the pipeline completes successfully.
#[derive(Debug, Clone, Serialize)]
pub struct UploadAccepted {
    pub message: String,
    #[serde(rename = "layerName")]
    pub layer_name: String,
}

impl UploadAccepted {
    pub fn new(layer_name: impl Into<String>) -> Self {
        Self {
            message: "Upload and publish completed successfully".to_string(),
            layer_name: layer_name.into(),
        }
    }
}

/// Body returned for rejected or failed uploads.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRejection {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(rename = "extractedFiles", skip_serializing_if = "Option::is_none")]
    pub extracted_files: Option<Vec<String>>,
}

impl UploadRejection {
    /// Rejection with only an error message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            extracted_files: None,
        }
    }

    /// Rejection carrying the failing stage's diagnostic text.
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
            extracted_files: None,
        }
    }

    /// Rejection listing the files that were actually extracted.
    pub fn with_extracted_files(error: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            extracted_files: Some(files),
        }
    }
}
