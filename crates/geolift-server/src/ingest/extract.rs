//! Archive extraction behind the `Decompressor` capability seam

use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::tool::run_tool;
use super::{PipelineError, Result};

/// Capability seam over archive decompression. Production shells out to
/// `unzip`; tests substitute in-process fakes.
#[async_trait]
pub trait Decompressor: Send + Sync {
    /// Unpack `archive` into `dest`, which already exists.
    async fn decompress(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// External `unzip` invocation (`unzip -o <archive> -d <dest>`)
#[derive(Debug, Clone)]
pub struct UnzipTool {
    program: String,
}

impl UnzipTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for UnzipTool {
    fn default() -> Self {
        Self::new("unzip")
    }
}

#[async_trait]
impl Decompressor for UnzipTool {
    async fn decompress(&self, archive: &Path, dest: &Path) -> Result<()> {
        let args = [
            OsStr::new("-o"),
            archive.as_os_str(),
            OsStr::new("-d"),
            dest.as_os_str(),
        ];

        run_tool(&self.program, args, None)
            .await
            .map_err(|err| PipelineError::Extraction(err.diagnostics()))?;

        debug!(archive = %archive.display(), dest = %dest.display(), "archive extracted");
        Ok(())
    }
}
