use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::materialize::Activation;

/// Lockfile format (similar to Cargo.lock)
/// Records which collections are currently linked where
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lockfile {
    /// Version of the lockfile format
    version: u32,
    /// Metadata about when this was last written
    pub metadata: Metadata,
    /// Links created by `envs use`
    #[serde(default)]
    pub activations: Vec<ActivationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// When the lockfile was last updated
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationEntry {
    /// Collection name at the time of activation
    pub collection: String,
    /// Published env file (in the configuration root)
    pub source: PathBuf,
    /// Symlink path in the target directory
    pub target: PathBuf,
    /// When the link was created
    pub activated_at: String,
}

impl ActivationEntry {
    /// Whether the link still exists and points at the published file
    pub fn is_linked(&self) -> bool {
        fs::read_link(&self.target)
            .map(|points_to| points_to == self.source)
            .unwrap_or(false)
    }
}

impl Default for Lockfile {
    fn default() -> Self {
        Self::new()
    }
}

impl Lockfile {
    /// Create a new lockfile
    pub fn new() -> Self {
        Self {
            version: 1,
            metadata: Metadata {
                updated_at: chrono::Utc::now().to_rfc3339(),
            },
            activations: Vec::new(),
        }
    }

    /// Load lockfile from disk, or an empty one if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lockfile from {:?}", path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse lockfile from {:?}", path))
    }

    /// Save lockfile to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create lockfile directory {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize lockfile")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write lockfile to {:?}", path))?;

        Ok(())
    }

    /// Record an activation, replacing any earlier entry for the same link
    pub fn record_activation(&mut self, activation: &Activation) {
        let now = chrono::Utc::now().to_rfc3339();
        self.activations
            .retain(|entry| entry.target != activation.target);
        self.activations.push(ActivationEntry {
            collection: activation.collection.clone(),
            source: activation.source.clone(),
            target: activation.target.clone(),
            activated_at: now.clone(),
        });
        self.metadata.updated_at = now;
    }

    /// Iterate over all recorded activations
    pub fn activations(&self) -> impl Iterator<Item = &ActivationEntry> {
        self.activations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn activation(collection: &str, source: &str, target: &str) -> Activation {
        Activation {
            collection: collection.to_string(),
            source: PathBuf::from(source),
            target: PathBuf::from(target),
        }
    }

    #[test]
    fn test_lockfile_new() {
        let lockfile = Lockfile::new();
        assert_eq!(lockfile.version, 1);
        assert!(!lockfile.metadata.updated_at.is_empty());
        assert!(lockfile.activations.is_empty());
    }

    #[test]
    fn test_lockfile_load_missing() {
        let temp = TempDir::new().unwrap();
        let lockfile = Lockfile::load(&temp.path().join("envs.lock")).unwrap();
        assert_eq!(lockfile.activations().count(), 0);
    }

    #[test]
    fn test_lockfile_save_load() {
        let temp = TempDir::new().unwrap();
        let lockfile_path = temp.path().join("state/envs.lock");

        let mut lockfile = Lockfile::new();
        lockfile.record_activation(&activation(
            "dev",
            "/cfg/env_files/dev.env",
            "/project/.env",
        ));
        lockfile.save(&lockfile_path).unwrap();

        let loaded = Lockfile::load(&lockfile_path).unwrap();
        assert_eq!(loaded.activations.len(), 1);
        assert_eq!(loaded.activations[0].collection, "dev");
        assert_eq!(loaded.activations[0].target, PathBuf::from("/project/.env"));
        assert!(!loaded.activations[0].activated_at.is_empty());
    }

    #[test]
    fn test_record_replaces_same_target() {
        let mut lockfile = Lockfile::new();

        lockfile.record_activation(&activation("dev", "/cfg/dev.env", "/project/.env"));
        lockfile.record_activation(&activation("other", "/cfg/other.env", "/other/.env"));
        lockfile.record_activation(&activation("prod", "/cfg/prod.env", "/project/.env"));

        let entries: Vec<_> = lockfile.activations().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].collection, "other");
        assert_eq!(entries[1].collection, "prod");
    }

    #[cfg(unix)]
    #[test]
    fn test_is_linked() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("dev.env");
        let target = temp.path().join(".env");
        fs::write(&source, "A=1\n").unwrap();

        let entry = ActivationEntry {
            collection: "dev".to_string(),
            source: source.clone(),
            target: target.clone(),
            activated_at: chrono::Utc::now().to_rfc3339(),
        };
        assert!(!entry.is_linked());

        std::os::unix::fs::symlink(&source, &target).unwrap();
        assert!(entry.is_linked());

        fs::remove_file(&target).unwrap();
        fs::write(&target, "A=1\n").unwrap();
        assert!(!entry.is_linked());
    }
}
