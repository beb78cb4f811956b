//! Template persistence.
//!
//! [`RonTemplateStore`] writes each artifact as a pretty-printed RON file under
//! a root directory; [`MemoryTemplateStore`] keeps them in memory for dry runs
//! and tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, trace};

use crate::artifact::Artifact;

/// Errors raised while persisting templates.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A folder could not be created.
    #[error("failed to create folder {}", .path.display())]
    Folder {
        /// Folder path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be serialized.
    #[error("failed to serialize template")]
    Serialize(#[source] ron::Error),

    /// The template file could not be written.
    #[error("failed to write template {}", .path.display())]
    Write {
        /// Template path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination folder was never created.
    #[error("folder {} does not exist", .path.display())]
    MissingFolder {
        /// Folder path.
        path: PathBuf,
    },
}

/// Where a template was stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateHandle {
    path: PathBuf,
}

impl TemplateHandle {
    /// Path the template was saved under, as requested by the caller.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File stem of the template, i.e. the artifact name.
    pub fn name(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// Persistent template storage.
pub trait TemplateStore {
    /// Create `folder` and any missing parents. Existing folders are fine.
    fn ensure_folder(&self, folder: &Path) -> Result<(), StoreError>;

    /// Persist `artifact` at `path`, replacing any previous template.
    fn save(&self, artifact: &Artifact, path: &Path) -> Result<TemplateHandle, StoreError>;
}

// ---------------------------------------------------------------------------
// RON files
// ---------------------------------------------------------------------------

/// File-backed store rooted at a directory.
#[derive(Clone, Debug)]
pub struct RonTemplateStore {
    root: PathBuf,
}

impl RonTemplateStore {
    /// Store resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pretty() -> ron::ser::PrettyConfig {
        ron::ser::PrettyConfig::new()
            .depth_limit(6)
            .separate_tuple_members(true)
            .enumerate_arrays(false)
    }
}

impl TemplateStore for RonTemplateStore {
    fn ensure_folder(&self, folder: &Path) -> Result<(), StoreError> {
        let path = self.root.join(folder);
        std::fs::create_dir_all(&path).map_err(|source| StoreError::Folder { path, source })
    }

    fn save(&self, artifact: &Artifact, path: &Path) -> Result<TemplateHandle, StoreError> {
        let target = self.root.join(path);
        let serialized =
            ron::ser::to_string_pretty(artifact, Self::pretty()).map_err(StoreError::Serialize)?;

        // A failed save must not leave a truncated template at `target`.
        let tmp = target.with_extension("ron.tmp");
        if let Err(source) = write_synced(&tmp, serialized.as_bytes()) {
            let _ = std::fs::remove_file(&tmp);
            return Err(StoreError::Write { path: target, source });
        }
        if let Err(source) = std::fs::rename(&tmp, &target) {
            let _ = std::fs::remove_file(&tmp);
            return Err(StoreError::Write { path: target, source });
        }

        debug!(path = %target.display(), role = %artifact.role, "saved template");
        Ok(TemplateHandle {
            path: path.to_path_buf(),
        })
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

/// In-memory store. Folders must be ensured before saving into them.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    folders: Mutex<BTreeSet<PathBuf>>,
    saved: Mutex<BTreeMap<PathBuf, Artifact>>,
}

impl MemoryTemplateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The artifact saved at `path`, if any.
    pub fn get(&self, path: &Path) -> Option<Artifact> {
        lock(&self.saved).get(path).cloned()
    }

    /// Saved paths in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        lock(&self.saved).keys().cloned().collect()
    }

    /// Number of saved templates.
    pub fn len(&self) -> usize {
        lock(&self.saved).len()
    }

    /// `true` when nothing has been saved.
    pub fn is_empty(&self) -> bool {
        lock(&self.saved).is_empty()
    }

    /// Whether `folder` was ensured.
    pub fn has_folder(&self, folder: &Path) -> bool {
        lock(&self.folders).contains(folder)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TemplateStore for MemoryTemplateStore {
    fn ensure_folder(&self, folder: &Path) -> Result<(), StoreError> {
        let mut folders = lock(&self.folders);
        for ancestor in folder.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            folders.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn save(&self, artifact: &Artifact, path: &Path) -> Result<TemplateHandle, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !self.has_folder(parent)
        {
            return Err(StoreError::MissingFolder {
                path: parent.to_path_buf(),
            });
        }
        trace!(path = %path.display(), role = %artifact.role, "stored template in memory");
        lock(&self.saved).insert(path.to_path_buf(), artifact.clone());
        Ok(TemplateHandle {
            path: path.to_path_buf(),
        })
    }
}
