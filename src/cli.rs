use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// envs - Environment variable collections
///
/// envs keeps your environment variables in one place, groups them into
/// named collections and links a collection into a project as a `.env`
/// file. Switching a project between collections is a single symlink swap.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration directory (defaults to $XDG_CONFIG_HOME/envs)
    #[arg(long, global = true, value_name = "DIR", env = "ENVS_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage variables
    #[command(subcommand)]
    Var(VarAction),

    /// Manage collections
    #[command(subcommand)]
    Collection(CollectionAction),

    /// Write a collection to a .env file
    Write {
        /// Collection name
        #[arg(value_name = "COLLECTION")]
        collection: String,

        /// Directory to write into (defaults to the current directory)
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Filename to write (defaults to the collection's filename)
        #[arg(short, long, value_name = "FILE")]
        filename: Option<String>,
    },

    /// Activate a collection by linking it into a directory
    Use {
        /// Collection name
        #[arg(value_name = "COLLECTION")]
        collection: String,

        /// Directory to link into (defaults to target_dir in config.toml, then the
        /// current directory)
        #[arg(short, long, value_name = "DIR")]
        target: Option<PathBuf>,
    },

    /// Show active links
    Status,

    /// Output a collection as shell exports
    Export {
        /// Collection name
        #[arg(value_name = "COLLECTION")]
        collection: String,

        /// Shell type (zsh, bash, fish)
        #[arg(short, long, value_name = "SHELL", default_value = "zsh")]
        shell: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum VarAction {
    /// Add a new variable, even if the key already exists
    Add {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE")]
        value: String,

        /// Short description
        #[arg(short, long, value_name = "TEXT", default_value = "")]
        description: String,
    },

    /// Set a variable, updating the first one with the same key
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE")]
        value: String,

        /// Short description
        #[arg(short, long, value_name = "TEXT", default_value = "")]
        description: String,
    },

    /// Print the value of a variable
    Get {
        #[arg(value_name = "KEY")]
        key: String,

        /// Print the description instead of the value
        #[arg(short, long)]
        description: bool,
    },

    /// List variables
    List,
}

#[derive(Subcommand, Debug)]
pub enum CollectionAction {
    /// Create a collection
    New {
        #[arg(value_name = "NAME")]
        name: String,

        /// Link filename (defaults to default_filename in config.toml)
        #[arg(short, long, value_name = "FILE")]
        filename: Option<String>,
    },

    /// List collections
    List,

    /// Show the variables a collection resolves to
    Show {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Add variables to a collection by key
    Add {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,
    },

    /// Remove variables from a collection by key
    Remove {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,
    },

    /// Rename a collection or change its link filename
    Edit {
        #[arg(value_name = "NAME")]
        name: String,

        /// New name
        #[arg(long, value_name = "NAME")]
        rename: Option<String>,

        /// New link filename
        #[arg(short, long, value_name = "FILE")]
        filename: Option<String>,
    },
}
