use crate::environment::{Environment, Shell};
use crate::{ui, Workspace};
use anyhow::{anyhow, Result};

pub fn execute(workspace: &Workspace, name: String, shell: String) -> Result<()> {
    let vars = workspace.vars()?;
    let collections = workspace.collections()?;
    let collection = collections
        .find(&name)
        .ok_or_else(|| anyhow!("Collection '{}' does not exist", name))?;

    let shell = match Shell::from_name(&shell) {
        Some(shell) => shell,
        None => {
            ui::warn(format!("unknown shell '{shell}', defaulting to zsh"));
            Shell::Zsh
        }
    };

    let environment = Environment::from_collection(collection, &vars);
    if !environment.is_empty() {
        println!("{}", environment.format_for_shell(shell));
    }
    Ok(())
}
