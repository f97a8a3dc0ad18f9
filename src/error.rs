use std::io;
use std::path::PathBuf;

/// Failure while persisting or materializing vars and collections
///
/// Every variant carries the path that was being touched so the caller can
/// report something more useful than a bare I/O error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to create directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {path:?}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to inspect {path:?}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {path:?}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid file name {name:?}: expected a single path component")]
    InvalidName { name: String },

    #[error("no var ids left in {path:?}")]
    IdsExhausted { path: PathBuf },

    #[error("failed to link {link:?} to {source_path:?}")]
    Symlink {
        link: PathBuf,
        source_path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
