use crate::{ui, Workspace};
use anyhow::Result;
use std::path::PathBuf;

pub fn execute(workspace: &Workspace, collection: String, target: Option<PathBuf>) -> Result<()> {
    ui::status("Linking", format!("collection '{collection}'"));
    let activation = workspace.use_collection(&collection, target.as_deref())?;
    ui::success(
        "Linked",
        format!(
            "{} -> {}",
            activation.target.display(),
            activation.source.display()
        ),
    );
    println!("Collection '{}' activated.", collection);
    Ok(())
}
