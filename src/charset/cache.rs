/*!
 * Disk cache for the charset catalog.
 *
 * Cache-aside: read the snapshot if one is there, otherwise build the
 * catalog and try to write it back. Nothing here makes a missing or broken
 * cache fatal; only a failed build is.
 */

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use super::{CatalogSnapshot, CharsetCatalog};
use crate::errors::CatalogError;

const DEFAULT_CACHE_DIRNAME: &str = "tmclean";
const DEFAULT_CACHE_FILENAME: &str = "charsets.json";
const FALLBACK_CACHE_PATH: &str = ".charsets.json";

/// Where a loaded catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Read back from a snapshot on disk
    Snapshot,
    /// Built from the Unicode tables in this run
    Built,
}

/// Result of `load_or_build`
#[derive(Debug)]
pub struct LoadedCatalog {
    /// The catalog, ready to be handed to filter factories
    pub catalog: Arc<CharsetCatalog>,
    pub origin: CatalogOrigin,
    /// Set when a freshly built catalog could not be written to disk
    pub persist_error: Option<CatalogError>,
}

impl LoadedCatalog {
    /// Wrap a catalog that was built without touching the disk
    pub fn built(catalog: CharsetCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            origin: CatalogOrigin::Built,
            persist_error: None,
        }
    }
}

/// Get the default snapshot path
pub fn default_cache_path() -> PathBuf {
    match dirs::cache_dir() {
        Some(base_dir) => base_dir
            .join(DEFAULT_CACHE_DIRNAME)
            .join(DEFAULT_CACHE_FILENAME),
        None => PathBuf::from(FALLBACK_CACHE_PATH),
    }
}

/// Load the catalog snapshot at `path`, or build the catalog and cache it there.
pub fn load_or_build(path: &Path) -> Result<LoadedCatalog, CatalogError> {
    if path.exists() {
        match read_snapshot(path) {
            Ok(catalog) => {
                debug!("Loaded charset catalog from {}", path.display());
                return Ok(LoadedCatalog {
                    catalog: Arc::new(catalog),
                    origin: CatalogOrigin::Snapshot,
                    persist_error: None,
                });
            }
            Err(e) => {
                warn!(
                    "Ignoring unusable charset snapshot at {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    info!("Building charset catalog, this takes a moment on first use");
    let catalog = CharsetCatalog::build()?;

    let persist_error = match write_snapshot(&catalog, path) {
        Ok(()) => {
            debug!("Saved charset catalog to {}", path.display());
            None
        }
        Err(e) => {
            warn!(
                "Could not save cached character sets to {}: {}. Cleaning is unaffected, but the catalog will be rebuilt on the next run.",
                path.display(),
                e
            );
            Some(e)
        }
    };

    Ok(LoadedCatalog {
        catalog: Arc::new(catalog),
        origin: CatalogOrigin::Built,
        persist_error,
    })
}

/// Read and validate a snapshot file
pub fn read_snapshot(path: &Path) -> Result<CharsetCatalog, CatalogError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: CatalogSnapshot = serde_json::from_reader(reader)?;
    CharsetCatalog::from_snapshot(snapshot)
}

/// Write a snapshot, replacing any existing file atomically
pub fn write_snapshot(catalog: &CharsetCatalog, path: &Path) -> Result<(), CatalogError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer(&mut writer, &catalog.to_snapshot())?;
        writer.flush()?;
    }
    temp.persist(path).map_err(|e| CatalogError::Io(e.error))?;

    Ok(())
}
