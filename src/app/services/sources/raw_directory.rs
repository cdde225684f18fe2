//! File-backed payload provider over the raw data directory

use super::{PayloadFormat, PayloadRef, RawPayload, SourceProvider};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Provider reading payload files from one directory
///
/// Files directly inside the directory are payloads; the extension decides
/// the format and unsupported extensions are ignored.
#[derive(Debug, Clone)]
pub struct RawDataDirectory {
    dir: PathBuf,
}

impl RawDataDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SourceProvider for RawDataDirectory {
    /// Payload files in filename order; an absent directory lists nothing
    fn list_payloads(&self) -> Result<Vec<PayloadRef>> {
        if !self.dir.is_dir() {
            warn!("Raw data directory {} does not exist", self.dir.display());
            return Ok(Vec::new());
        }

        let mut payloads = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(format!("Failed to scan {}", self.dir.display()), e)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let format = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(PayloadFormat::from_extension);
            let name = entry.file_name().to_string_lossy().into_owned();

            match format {
                Some(format) => payloads.push(PayloadRef { name, format }),
                None => debug!("Ignoring unsupported raw file {}", name),
            }
        }

        debug!(
            "Found {} payloads in {}",
            payloads.len(),
            self.dir.display()
        );
        Ok(payloads)
    }

    fn fetch(&self, payload: &PayloadRef) -> Result<RawPayload> {
        let path = self.dir.join(&payload.name);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::provider_failure(&payload.name, format!("failed to read {}: {}", path.display(), e))
        })?;

        Ok(RawPayload {
            name: payload.name.clone(),
            format: payload.format,
            content,
        })
    }
}
