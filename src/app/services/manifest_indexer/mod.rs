//! Manifest index maintenance
//!
//! This module rebuilds the manifest index from the record files on disk.
//! The manifest is an explicit value: it is loaded, transformed by the pure
//! [`rebuild_manifest`] function, and persisted, in that order.
//!
//! A rebuild always starts `organized` from scratch, so running it twice
//! over the same files yields byte-identical `organized` and `statistics`.

use crate::app::models::manifest::Manifest;
use crate::config::{Config, DatasetConfig};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod indexer;
pub mod scanner;

#[cfg(test)]
pub mod tests;

pub use indexer::{IndexStats, rebuild_manifest};
pub use scanner::{IndexScan, IndexedFile, scan_records};

/// Load-transform-persist driver for the manifest
#[derive(Debug, Clone)]
pub struct ManifestIndexer {
    base_dir: PathBuf,
    manifest_path: PathBuf,
    dataset: DatasetConfig,
}

impl ManifestIndexer {
    /// Create an indexer for the dataset described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_dir: config.paths.base_dir.clone(),
            manifest_path: config.manifest_path(),
            dataset: config.dataset.clone(),
        }
    }

    /// Manifest file location
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Load the manifest from disk
    ///
    /// # Arguments
    ///
    /// * `init_if_missing` - Create a fresh manifest when no file exists
    ///
    /// # Returns
    ///
    /// The parsed manifest, or `ManifestCorrupt` when it is missing (and not
    /// initialised) or cannot be parsed
    pub fn load(&self, init_if_missing: bool) -> Result<Manifest> {
        load_manifest(&self.manifest_path, init_if_missing.then_some(&self.dataset))
    }

    /// Write the manifest to disk as pretty JSON
    pub fn persist(&self, manifest: &Manifest) -> Result<()> {
        persist_manifest(&self.manifest_path, manifest)
    }

    /// Scan the record directories
    pub fn scan(&self) -> Result<IndexScan> {
        scan_records(&self.base_dir)
    }

    /// Rebuild the manifest from disk and persist it
    pub fn reindex(&self, init_if_missing: bool) -> Result<IndexStats> {
        let manifest = self.load(init_if_missing)?;
        let scan = self.scan()?;

        for name in &scan.skipped {
            warn!("Skipping unrecognized record filename: {}", name);
        }

        let previous = manifest.clone();
        let mut rebuilt = rebuild_manifest(manifest, &scan);
        let stats = IndexStats::from_rebuild(&previous, &rebuilt, &scan);

        rebuilt.touch();
        self.persist(&rebuilt)?;

        info!("{}", stats.summary());
        Ok(stats)
    }
}

/// Read a manifest file, optionally initialising a missing one
pub fn load_manifest(path: &Path, init: Option<&DatasetConfig>) -> Result<Manifest> {
    let source = path.display().to_string();

    if !path.exists() {
        return match init {
            Some(dataset) => {
                info!("No manifest at {}, initialising a new one", source);
                Ok(Manifest::new(&dataset.name, &dataset.version))
            }
            None => Err(Error::manifest_corrupt(
                source,
                "manifest not found (use --init-manifest to create one)",
            )),
        };
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::manifest_corrupt(&source, format!("unreadable: {}", e)))?;

    Manifest::from_json_str(&content, &source)
}

/// Write a manifest file, replacing any existing one in a single rename
pub fn persist_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let mut content = manifest.to_json_string()?;
    content.push('\n');

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, content)
        .map_err(|e| Error::io(format!("Failed to write manifest {}", temp_path.display()), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| Error::io(format!("Failed to replace manifest {}", path.display()), e))
}
