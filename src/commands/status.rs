use crate::{ui, Workspace};
use anyhow::Result;

pub fn execute(workspace: &Workspace) -> Result<()> {
    let lockfile = workspace.lockfile()?;
    let mut any = false;

    for entry in lockfile.activations() {
        any = true;
        let message = format!(
            "{} at {} (since {})",
            entry.collection,
            entry.target.display(),
            entry.activated_at
        );
        if entry.is_linked() {
            ui::success("Active", message);
        } else {
            ui::warn(format!("{message} no longer points at {}", entry.source.display()));
        }
    }

    if !any {
        ui::info("No active collections. Use 'envs use' to link one.");
    }
    Ok(())
}
