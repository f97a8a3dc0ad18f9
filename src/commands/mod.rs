use crate::cli::{Cli, Commands};
use crate::Workspace;
use anyhow::Result;

mod collection;
mod export;
mod status;
mod use_collection;
mod var;
mod write;

pub fn execute(cli: Cli) -> Result<()> {
    // Create workspace - this is the root entry point
    let workspace = Workspace::new(cli.config_dir)?;

    match cli.command {
        Commands::Var(action) => var::execute(&workspace, action),

        Commands::Collection(action) => collection::execute(&workspace, action),

        Commands::Write {
            collection,
            dir,
            filename,
        } => write::execute(&workspace, collection, dir, filename),

        Commands::Use { collection, target } => {
            use_collection::execute(&workspace, collection, target)
        }

        Commands::Status => status::execute(&workspace),

        Commands::Export { collection, shell } => export::execute(&workspace, collection, shell),
    }
}
