use crate::cli::CollectionAction;
use crate::collection::{Collection, CollectionStore};
use crate::var::VarId;
use crate::{ui, Workspace};
use anyhow::{anyhow, Result};

pub fn execute(workspace: &Workspace, action: CollectionAction) -> Result<()> {
    let mut collections = workspace.collections()?;

    match action {
        CollectionAction::New { name, filename } => {
            let filename = match filename {
                Some(filename) => filename,
                None => workspace.config()?.default_filename,
            };
            let collection = Collection::new(name.as_str(), filename.as_str());
            collection.validate()?;
            collections.add(collection);
            collections.save()?;
            ui::success("Created", format!("collection '{name}' linking as {filename}"));
        }

        CollectionAction::List => {
            if collections.is_empty() {
                ui::info("No collections yet. Use 'envs collection new' to create one.");
            }
            for collection in collections.all() {
                println!(
                    "{}  ({}, {} vars)",
                    collection.name(),
                    collection.filename(),
                    collection.var_count()
                );
            }
        }

        CollectionAction::Show { name } => {
            let vars = workspace.vars()?;
            let collection = find(&collections, &name)?;

            for var in collection.vars(&vars) {
                println!("{}", var.to_env_line());
            }

            let stale = collection.stale_ids(&vars);
            if !stale.is_empty() {
                let ids: Vec<_> = stale.iter().map(VarId::to_string).collect();
                ui::warn(format!(
                    "collection '{name}' references missing var ids: {}",
                    ids.join(", ")
                ));
            }
        }

        CollectionAction::Add { name, keys } => {
            let vars = workspace.vars()?;
            let ids = keys
                .iter()
                .map(|key| {
                    vars.get_id_from_key(key)
                        .ok_or_else(|| anyhow!("Variable '{}' does not exist", key))
                })
                .collect::<Result<Vec<_>>>()?;

            let collection = find_mut(&mut collections, &name)?;
            for id in ids {
                collection.add_var(id);
            }
            collections.save()?;
            ui::success("Updated", format!("added {} to '{name}'", keys.join(", ")));
        }

        CollectionAction::Remove { name, keys } => {
            let vars = workspace.vars()?;
            let collection = find_mut(&mut collections, &name)?;
            for key in &keys {
                match vars.get_id_from_key(key) {
                    Some(id) => collection.remove_var(id),
                    None => ui::warn(format!("variable '{key}' not found, skipping")),
                }
            }
            collections.save()?;
            ui::success("Updated", format!("removed {} from '{name}'", keys.join(", ")));
        }

        CollectionAction::Edit {
            name,
            rename,
            filename,
        } => {
            if rename.is_none() && filename.is_none() {
                anyhow::bail!("Nothing to change; pass --rename or --filename");
            }

            let collection = find_mut(&mut collections, &name)?;
            if let Some(filename) = filename {
                collection.set_filename(filename);
            }
            if let Some(rename) = rename {
                collection.set_name(rename);
            }
            collection.validate()?;
            let summary = format!("'{}' linking as {}", collection.name(), collection.filename());
            collections.save()?;
            ui::success("Updated", summary);
        }
    }

    Ok(())
}

fn find<'a>(collections: &'a CollectionStore, name: &str) -> Result<&'a Collection> {
    collections
        .find(name)
        .ok_or_else(|| anyhow!("Collection '{}' does not exist", name))
}

fn find_mut<'a>(collections: &'a mut CollectionStore, name: &str) -> Result<&'a mut Collection> {
    collections
        .find_mut(name)
        .ok_or_else(|| anyhow!("Collection '{}' does not exist", name))
}
