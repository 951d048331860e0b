//! Shapefile location and validation inside an extraction directory
//!
//! A shapefile is really three files sharing a base name: the geometry
//! (`.shp`), the index (`.shx`) and the attribute table (`.dbf`). The
//! locator picks the first `.shp` in lexical order, demands its two
//! siblings, and derives the sanitized layer name everything downstream
//! runs under.

use std::path::{Path, PathBuf};

use geolift_common::naming::sanitize_layer_name;
use tracing::debug;

use super::{PipelineError, Result};

/// Component extensions every usable shapefile must carry
const REQUIRED_EXTENSIONS: [&str; 3] = [".shp", ".shx", ".dbf"];

/// Lexically sorted listing of an extraction directory
#[derive(Debug, Clone)]
pub struct ExtractedFileSet {
    names: Vec<String>,
}

impl ExtractedFileSet {
    /// List the immediate entries of `dir`, sorted by name. Shapefile
    /// archives keep their components flat, so no recursion.
    pub async fn read_dir(dir: &Path) -> Result<Self> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Everything the import and publish stages need to know about the dataset
#[derive(Debug, Clone)]
pub struct DatasetDescriptor {
    /// Path of the primary `.shp` file
    pub shp_path: PathBuf,
    /// Paths of the required components, `.shp` first
    pub component_paths: Vec<PathBuf>,
    /// Base name exactly as it appeared in the archive
    pub base_name: String,
    /// Sanitized name used for the database table and the published layer
    pub layer_name: String,
}

/// Finds and validates the shapefile in an extraction directory
pub struct DatasetLocator;

impl DatasetLocator {
    pub async fn locate(extract_dir: &Path) -> Result<DatasetDescriptor> {
        let files = ExtractedFileSet::read_dir(extract_dir).await?;

        let shp_name = files
            .names()
            .iter()
            .find(|name| name.ends_with(".shp"))
            .cloned()
            .ok_or_else(|| PipelineError::NoDatasetFound {
                extracted_files: files.names().to_vec(),
            })?;

        let base_name = shp_name
            .strip_suffix(".shp")
            .unwrap_or(shp_name.as_str())
            .to_string();

        let mut component_paths = Vec::with_capacity(REQUIRED_EXTENSIONS.len());
        for ext in REQUIRED_EXTENSIONS {
            let expected = format!("{base_name}{ext}");
            if !files.contains(&expected) {
                return Err(PipelineError::IncompleteDataset {
                    file_name: expected,
                });
            }
            component_paths.push(extract_dir.join(expected));
        }

        let layer_name = sanitize_layer_name(&base_name);
        debug!(shapefile = %shp_name, layer = %layer_name, "located dataset");

        Ok(DatasetDescriptor {
            shp_path: extract_dir.join(&shp_name),
            component_paths,
            base_name,
            layer_name,
        })
    }
}
