// Version-tag cache: collection id -> ETag, persisted as one JSON object
//
// Loaded once at run start and saved once at run end. A crash in between
// leaves the previous file untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::errors::AcquisitionError;
use super::models::{CollectionId, VersionTag};

#[derive(Debug, Clone, Default)]
pub struct VersionTagCache {
    path: PathBuf,
    tags: BTreeMap<CollectionId, VersionTag>,
}

impl VersionTagCache {
    /// Read the cache file. Missing or unreadable storage yields an empty map.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tags = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<CollectionId, VersionTag>>(&raw) {
                Ok(tags) => tags,
                Err(e) => {
                    warn!("[Cache] Ignoring corrupt cache {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) => {
                debug!("[Cache] No cache at {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        debug!("[Cache] Loaded {} version tags", tags.len());
        Self { path, tags }
    }

    pub fn get(&self, id: &str) -> Option<&VersionTag> {
        self.tags.get(id)
    }

    pub fn put(&mut self, id: impl Into<CollectionId>, tag: impl Into<VersionTag>) {
        self.tags.insert(id.into(), tag.into());
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole map through a temp file and rename it into place
    pub fn save(&self) -> Result<(), AcquisitionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_vec_pretty(&self.tags)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, raw)?;
        fs::rename(&tmp_path, &self.path)?;

        info!("[Cache] Version tags saved to {}", self.path.display());
        Ok(())
    }
}
