use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::collection::CollectionStore;
use crate::config::Config;
use crate::lockfile::Lockfile;
use crate::materialize::{Activation, Materializer, ENV_FILES_DIR};
use crate::util::xdg;
use crate::var::VarStore;

/// Workspace path types
#[derive(Debug, Clone, Copy)]
pub enum WorkspacePath {
    /// Configuration root: $XDG_CONFIG_HOME/envs
    Root,
    /// Var store: root/vars.json
    Vars,
    /// Collection store: root/collections.json
    Collections,
    /// Published env files: root/env_files
    EnvFiles,
    /// User settings: root/config.toml
    ConfigFile,
    /// Activation lockfile: $XDG_STATE_HOME/envs/envs.lock
    Lockfile,
}

/// Workspace - the on-disk home of vars, collections and published files
///
/// Everything the user edits lives under the configuration root, which is
/// `$XDG_CONFIG_HOME/envs` unless overridden. Local bookkeeping about which
/// links were created lives in the state directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Configuration root (vars, collections, env files, settings)
    root: PathBuf,
    /// State directory (activation lockfile)
    state_dir: PathBuf,
}

impl Workspace {
    /// Create a Workspace
    ///
    /// Uses `config_dir` as the root when given, otherwise the XDG config
    /// directory. The state directory always follows XDG.
    pub fn new(config_dir: Option<PathBuf>) -> Result<Self> {
        let root = match config_dir {
            Some(dir) => dir,
            None => xdg::config_dir()?,
        };
        let state_dir = xdg::state_dir()?;

        debug!("workspace root {:?}, state {:?}", root, state_dir);
        Ok(Self::with_dirs(root, state_dir))
    }

    /// Create a Workspace from explicit directories
    pub fn with_dirs(root: impl Into<PathBuf>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state_dir: state_dir.into(),
        }
    }

    /// Get path for a specific workspace location
    pub fn path(&self, path_type: WorkspacePath) -> PathBuf {
        match path_type {
            WorkspacePath::Root => self.root.clone(),
            WorkspacePath::Vars => self.root.join("vars.json"),
            WorkspacePath::Collections => self.root.join("collections.json"),
            WorkspacePath::EnvFiles => self.root.join(ENV_FILES_DIR),
            WorkspacePath::ConfigFile => self.root.join("config.toml"),
            WorkspacePath::Lockfile => self.state_dir.join("envs.lock"),
        }
    }

    /// Load user settings, defaults when the file is absent
    pub fn config(&self) -> Result<Config> {
        Config::load(&self.path(WorkspacePath::ConfigFile))
    }

    /// Load the var store, creating it on first run
    pub fn vars(&self) -> Result<VarStore> {
        VarStore::open(&self.root).context("Failed to load vars")
    }

    /// Load the collection store, creating it on first run
    pub fn collections(&self) -> Result<CollectionStore> {
        CollectionStore::open(&self.root).context("Failed to load collections")
    }

    pub fn materializer(&self) -> Materializer {
        Materializer::new(&self.root)
    }

    pub fn lockfile(&self) -> Result<Lockfile> {
        Lockfile::load(&self.path(WorkspacePath::Lockfile))
    }

    /// Pick the directory a collection gets linked into
    ///
    /// An explicit directory wins, then `target_dir` from the settings, then
    /// the current working directory.
    pub fn resolve_target_dir(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }

        if let Some(dir) = self.config()?.target_dir()? {
            return Ok(dir);
        }

        env::current_dir().context("Failed to determine current directory")
    }

    /// Activate a collection by name and record the link in the lockfile
    pub fn use_collection(&self, name: &str, target_dir: Option<&Path>) -> Result<Activation> {
        let vars = self.vars()?;
        let collections = self.collections()?;
        let collection = collections
            .find(name)
            .ok_or_else(|| anyhow::anyhow!("Collection '{}' does not exist", name))?;

        let target_dir = self.resolve_target_dir(target_dir)?;
        let activation = self
            .materializer()
            .activate(collection, &vars, &target_dir)
            .with_context(|| format!("Failed to activate collection '{}'", name))?;

        let lockfile_path = self.path(WorkspacePath::Lockfile);
        let mut lockfile = Lockfile::load(&lockfile_path)?;
        lockfile.record_activation(&activation);
        lockfile.save(&lockfile_path)?;

        Ok(activation)
    }
}
