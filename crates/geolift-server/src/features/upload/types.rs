//! Multipart form assembly for the upload endpoint

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;

/// Fallback filename when the client sends the file part without one
pub const DEFAULT_ARCHIVE_NAME: &str = "upload.zip";

/// Raw multipart fields before validation. Presence checks happen in the
/// handler so each absence maps to its own response.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file_name: Option<String>,
    pub bytes: Option<Vec<u8>>,
    pub workspace: Option<String>,
    pub datastore: Option<String>,
}

impl UploadForm {
    /// Drain the multipart stream into the form. Unknown fields are
    /// ignored; a repeated field keeps its last value.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().map(|s| s.to_string());
                    form.bytes = Some(field.bytes().await?.to_vec());
                }
                "workspace" => form.workspace = non_empty(field.text().await?),
                "datastore" => form.datastore = non_empty(field.text().await?),
                _ => {}
            }
        }

        Ok(form)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
