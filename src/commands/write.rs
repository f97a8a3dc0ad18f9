use crate::{ui, Workspace};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;

pub fn execute(
    workspace: &Workspace,
    name: String,
    dir: Option<PathBuf>,
    filename: Option<String>,
) -> Result<()> {
    let vars = workspace.vars()?;
    let collections = workspace.collections()?;
    let collection = collections
        .find(&name)
        .ok_or_else(|| anyhow!("Collection '{}' does not exist", name))?;

    let dir = match dir {
        Some(dir) => dir,
        None => env::current_dir().context("Failed to determine current directory")?,
    };
    let filename = filename.unwrap_or_else(|| collection.filename().to_string());

    let path = collection
        .write_to_env_file(&vars, &dir, &filename)
        .with_context(|| format!("Failed to write collection '{}'", name))?;
    ui::success("Wrote", format!("'{name}' to {}", path.display()));
    Ok(())
}
