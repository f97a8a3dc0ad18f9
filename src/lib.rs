// Public API
pub mod cli;
pub mod commands;

// Core domain types
pub mod collection;
pub mod config;
pub mod environment;
pub mod error;
pub mod lockfile;
pub mod materialize;
pub mod ui;
pub mod util;
pub mod var;
pub mod workspace;

mod store;

// Re-export main types
pub use collection::{Collection, CollectionStore};
pub use config::Config;
pub use environment::{Environment, Shell};
pub use error::ConfigError;
pub use lockfile::{ActivationEntry, Lockfile};
pub use materialize::{Activation, Materializer};
pub use var::{Var, VarId, VarStore};
pub use workspace::{Workspace, WorkspacePath};
