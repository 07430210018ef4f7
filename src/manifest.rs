use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::core::BundleError;
use crate::utils::webpath::Webpath;

/// One `(logical path, real location)` pair as it appears in a manifest file.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    webpath: String,
    path: PathBuf,
}

/// Mapping from logical webpaths to the files that hold their content,
/// assembled once before processing begins and never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    entries: HashMap<Webpath, PathBuf>,
}

impl Manifest {
    pub fn new() -> Manifest {
        Manifest::default()
    }

    /// Reads and merges the given manifest files in order.
    ///
    /// A manifest file is a JSON array of `{"webpath": …, "path": …}`
    /// entries. A logical path defined more than once resolves to its last
    /// definition, so later manifest files override earlier ones.
    pub fn load(manifest_files: &[PathBuf]) -> Result<Manifest, BundleError> {
        let mut manifest = Manifest::new();

        for manifest_file in manifest_files {
            let data = fs::read_to_string(manifest_file).map_err(|e| BundleError::Manifest {
                path: manifest_file.clone(),
                detail: e.to_string(),
            })?;
            let entries: Vec<ManifestEntry> =
                serde_json::from_str(&data).map_err(|e| BundleError::Manifest {
                    path: manifest_file.clone(),
                    detail: e.to_string(),
                })?;

            for entry in entries {
                manifest.insert(Webpath::new(&entry.webpath), entry.path);
            }
        }

        Ok(manifest)
    }

    pub fn insert(&mut self, webpath: Webpath, path: PathBuf) {
        self.entries.insert(webpath, path);
    }

    pub fn get(&self, webpath: &Webpath) -> Option<&PathBuf> {
        self.entries.get(webpath)
    }

    pub fn contains(&self, webpath: &Webpath) -> bool {
        self.entries.contains_key(webpath)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
