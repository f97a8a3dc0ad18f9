use crate::cli::VarAction;
use crate::{ui, Workspace};
use anyhow::Result;

pub fn execute(workspace: &Workspace, action: VarAction) -> Result<()> {
    let mut vars = workspace.vars()?;

    match action {
        VarAction::Add {
            key,
            value,
            description,
        } => {
            let id = vars.add(key.as_str(), value, description)?.id();
            vars.save()?;
            ui::success("Added", format!("{key} (id {id})"));
        }

        VarAction::Set {
            key,
            value,
            description,
        } => {
            let id = vars.set(key.as_str(), value, description)?.id();
            vars.save()?;
            ui::success("Set", format!("{key} (id {id})"));
        }

        VarAction::Get { key, description } => {
            if vars.find(&key).is_none() {
                ui::warn(format!("variable '{key}' not found"));
            }
            if description {
                println!("{}", vars.get_description(&key));
            } else {
                println!("{}", vars.get(&key));
            }
        }

        VarAction::List => {
            if vars.is_empty() {
                ui::info("No variables yet. Use 'envs var add' to create one.");
            }
            for var in vars.all() {
                if var.description.is_empty() {
                    println!("{:>4}  {}", var.id().get(), var.key);
                } else {
                    println!("{:>4}  {}  # {}", var.id().get(), var.key, var.description);
                }
            }
        }
    }

    Ok(())
}
