use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::store::{read_json, write_json};

const VARS_FILE: &str = "vars.json";

/// Stable identifier of a var
///
/// Minted by the owning [`VarStore`] and never reused. Collections refer to
/// vars through this id, never through their position in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(u64);

impl VarId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single environment variable entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Var {
    id: VarId,
    pub key: String,
    #[serde(rename = "Val")]
    pub value: String,
    pub description: String,
}

impl Var {
    pub fn id(&self) -> VarId {
        self.id
    }

    /// Render as a single `KEY=VALUE` line without the newline
    pub fn to_env_line(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// Ordered list of vars persisted to `vars.json`
///
/// Insertion order is display order. The store owns the id counter: it starts
/// at 1 on a fresh store and continues after the largest id on load.
#[derive(Debug, Clone)]
pub struct VarStore {
    path: PathBuf,
    vars: Vec<Var>,
    /// `None` once every id has been handed out
    next_id: Option<u64>,
}

impl VarStore {
    /// Create an empty store rooted at the given configuration directory
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            path: config_dir.as_ref().join(VARS_FILE),
            vars: Vec::new(),
            next_id: Some(1),
        }
    }

    /// Create a store and load it from disk
    pub fn open(config_dir: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new(config_dir);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a new var with a fresh id, even if the key already exists
    pub fn add(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&Var> {
        let id = self.next_id.ok_or_else(|| ConfigError::IdsExhausted {
            path: self.path.clone(),
        })?;
        self.next_id = id.checked_add(1);
        let id = VarId(id);

        self.vars.push(Var {
            id,
            key: key.into(),
            value: value.into(),
            description: description.into(),
        });

        let var = &self.vars[self.vars.len() - 1];
        debug!("added var {} with id {}", var.key, var.id);
        Ok(var)
    }

    /// Update the first var matching `key` in place, or add a new one
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&Var> {
        let key = key.into();
        match self.vars.iter().position(|var| var.key == key) {
            Some(index) => {
                let var = &mut self.vars[index];
                var.value = value.into();
                var.description = description.into();
                Ok(&self.vars[index])
            }
            None => self.add(key, value, description),
        }
    }

    /// First var with the given key
    pub fn find(&self, key: &str) -> Option<&Var> {
        self.vars.iter().find(|var| var.key == key)
    }

    /// Value of the first var with the given key
    ///
    /// Returns an empty string when the key is absent, which is
    /// indistinguishable from a var whose value is empty. Use [`find`] when
    /// that matters.
    ///
    /// [`find`]: VarStore::find
    pub fn get(&self, key: &str) -> &str {
        self.find(key).map(|var| var.value.as_str()).unwrap_or("")
    }

    /// Description of the first var with the given key, empty when absent
    pub fn get_description(&self, key: &str) -> &str {
        self.find(key)
            .map(|var| var.description.as_str())
            .unwrap_or("")
    }

    /// Id of the first var with the given key
    pub fn get_id_from_key(&self, key: &str) -> Option<VarId> {
        self.find(key).map(Var::id)
    }

    pub fn get_by_id(&self, id: VarId) -> Option<&Var> {
        self.vars.iter().find(|var| var.id == id)
    }

    pub fn all(&self) -> &[Var] {
        &self.vars
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Write every var to `vars.json`
    pub fn save(&self) -> Result<()> {
        write_json(&self.path, &self.vars)
    }

    /// Replace the in-memory vars with the contents of `vars.json`
    ///
    /// A missing file is treated as a first run and an empty store is saved
    /// in its place.
    pub fn load(&mut self) -> Result<()> {
        match read_json::<Vec<Var>>(&self.path)? {
            Some(vars) => {
                self.next_id = match vars.iter().map(|var| var.id.0).max() {
                    Some(max) => max.checked_add(1),
                    None => Some(1),
                };
                self.vars = vars;
                debug!("loaded {} vars from {:?}", self.vars.len(), self.path);
                Ok(())
            }
            None => {
                debug!("creating empty var store at {:?}", self.path);
                self.vars.clear();
                self.next_id = Some(1);
                self.save()
            }
        }
    }
}
