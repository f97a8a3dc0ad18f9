use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_FILENAME: &str = ".env";

/// User settings stored in `config.toml` under the configuration root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory `envs use` links into when no `--target` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_dir: Option<String>,

    /// Link filename given to new collections
    #[serde(default = "default_filename")]
    pub default_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_dir: None,
            default_filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            toml::to_string_pretty(self).context("Failed to serialize envs config file")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }

    /// Configured activation directory with `~` and `$VARS` expanded
    pub fn target_dir(&self) -> Result<Option<PathBuf>> {
        self.target_dir
            .as_deref()
            .map(|dir| {
                shellexpand::full(dir)
                    .map(|expanded| PathBuf::from(expanded.into_owned()))
                    .with_context(|| format!("Failed to expand target_dir {:?}", dir))
            })
            .transpose()
    }
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}
