//! Archive staging
//!
//! Every upload is written to the scratch directory under a fresh UUID so
//! concurrent requests never collide, with a sibling directory reserved for
//! extraction. Cleanup is tolerant: a path that is already gone is not an
//! error, and nothing here ever fails a request after its outcome is known.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use super::Result;

/// Paths reserved for one staged upload
#[derive(Debug, Clone)]
pub struct StagedArchive {
    /// The uploaded archive as written to disk
    pub archive_path: PathBuf,
    /// Directory the archive will be extracted into
    pub extract_dir: PathBuf,
}

/// Writes uploaded archives into the scratch directory and removes them
/// once the pipeline is done with them.
#[derive(Debug, Clone)]
pub struct ArchiveStager {
    scratch_dir: PathBuf,
}

impl ArchiveStager {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Persist the uploaded bytes and reserve an extraction directory.
    ///
    /// If reserving the extraction directory fails the archive written just
    /// before it is removed again, so a failed stage leaves nothing behind.
    pub async fn stage(&self, file_name: &str, bytes: &[u8]) -> Result<StagedArchive> {
        tokio::fs::create_dir_all(&self.scratch_dir).await?;

        let id = Uuid::new_v4().simple().to_string();
        let archive_path = self.scratch_dir.join(format!("{id}.zip"));
        let extract_dir = self.scratch_dir.join(format!("{id}_extracted"));

        tokio::fs::write(&archive_path, bytes).await?;

        if let Err(err) = tokio::fs::create_dir_all(&extract_dir).await {
            remove_file_quiet(&archive_path).await;
            return Err(err.into());
        }

        debug!(
            original_name = file_name,
            size_bytes = bytes.len(),
            archive = %archive_path.display(),
            "staged uploaded archive"
        );

        Ok(StagedArchive {
            archive_path,
            extract_dir,
        })
    }

    /// Remove everything staged for one upload. Missing paths are fine;
    /// anything else is logged and swallowed so cleanup cannot change the
    /// outcome of the request it runs after.
    pub async fn cleanup_staged(&self, staged: &StagedArchive) {
        remove_dir_quiet(&staged.extract_dir).await;
        remove_file_quiet(&staged.archive_path).await;
    }
}

async fn remove_file_quiet(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed staged file"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "failed to remove staged file"),
    }
}

async fn remove_dir_quiet(path: &Path) {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => debug!(path = %path.display(), "removed staged directory"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to remove staged directory")
        }
    }
}
