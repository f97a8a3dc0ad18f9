use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::collection::{check_file_name, Collection};
use crate::error::{ConfigError, Result};
use crate::var::VarStore;

/// Directory under the configuration root that holds published env files
pub const ENV_FILES_DIR: &str = "env_files";

/// Where an activation linked a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    /// Name of the activated collection
    pub collection: String,
    /// Published env file the link points at
    pub source: PathBuf,
    /// The link itself
    pub target: PathBuf,
}

/// Renders collections into `env_files/` and links them into place
///
/// Activation is a two step swap. The rendered content is first published as
/// `env_files/<name>.env` by renaming a fully written temporary file over it.
/// Only then is the link at the target path removed and recreated to point at
/// that copy, so a reader going through the link sees either the previous
/// content or the new one, never a partial write.
///
/// The remove-then-link step is not a single syscall. Two activations racing
/// on the same target can leave it missing.
#[derive(Debug, Clone)]
pub struct Materializer {
    env_files_dir: PathBuf,
}

impl Materializer {
    /// Create a materializer publishing under `config_dir/env_files`
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            env_files_dir: config_dir.as_ref().join(ENV_FILES_DIR),
        }
    }

    pub fn env_files_dir(&self) -> &Path {
        &self.env_files_dir
    }

    /// Path of the canonical copy for a collection
    pub fn published_path(&self, collection: &Collection) -> PathBuf {
        self.env_files_dir.join(format!("{}.env", collection.name()))
    }

    /// Write the collection's canonical copy, replacing any previous one
    ///
    /// The content goes to a temporary file next to the published copy which
    /// is then renamed over it.
    pub fn publish(&self, collection: &Collection, store: &VarStore) -> Result<PathBuf> {
        check_file_name(collection.name())?;
        fs::create_dir_all(&self.env_files_dir).map_err(|source| ConfigError::CreateDir {
            path: self.env_files_dir.clone(),
            source,
        })?;

        let published = self.published_path(collection);
        let write_error = |source: std::io::Error| ConfigError::Write {
            path: published.clone(),
            source,
        };

        let mut staged = NamedTempFile::new_in(&self.env_files_dir).map_err(write_error)?;
        staged
            .write_all(collection.render(store).as_bytes())
            .map_err(write_error)?;
        staged
            .persist(&published)
            .map_err(|err| write_error(err.error))?;

        info!("published {:?} to {:?}", collection.name(), published);
        Ok(published)
    }

    /// Publish the collection and point `target_dir/<filename>` at it
    ///
    /// Whatever already sits at the link path is removed first, without
    /// following links. If that entry cannot even be inspected the activation
    /// stops before touching it.
    pub fn activate(
        &self,
        collection: &Collection,
        store: &VarStore,
        target_dir: impl AsRef<Path>,
    ) -> Result<Activation> {
        collection.validate()?;
        let published = self.publish(collection, store)?;
        let source = std::path::absolute(&published).map_err(|source| ConfigError::Inspect {
            path: published.clone(),
            source,
        })?;

        let target = target_dir.as_ref().join(collection.filename());
        match fs::symlink_metadata(&target) {
            Ok(_) => {
                debug!("removing existing entry at {:?}", target);
                fs::remove_file(&target).map_err(|source| ConfigError::Remove {
                    path: target.clone(),
                    source,
                })?;
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ConfigError::Inspect {
                    path: target,
                    source,
                })
            }
        }

        symlink(&source, &target).map_err(|err| ConfigError::Symlink {
            link: target.clone(),
            source_path: source.clone(),
            source: err,
        })?;

        info!("linked {:?} -> {:?}", target, source);
        Ok(Activation {
            collection: collection.name().to_string(),
            source,
            target,
        })
    }
}

#[cfg(unix)]
fn symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(source, link)
}
