use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Read and decode a JSON store file, `Ok(None)` when it does not exist yet
///
/// A missing file is a first run. The caller is expected to write an empty
/// store in its place.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("store file {:?} not found", path);
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Encode a value as pretty JSON and write it, creating the parent directory
///
/// Output uses two-space indentation and ends with a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut contents =
        serde_json::to_string_pretty(value).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    contents.push('\n');

    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("wrote store file {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let value: Option<Vec<u32>> = read_json(&temp.path().join("missing.json")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_creates_parent_and_indents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/data.json");

        write_json(&path, &vec![1, 2]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[\n  1,\n  2\n]\n");
    }

    #[test]
    fn test_read_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Option<Vec<u32>>> = read_json(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_write_fails_when_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = write_json(&blocker.join("data.json"), &Vec::<u32>::new());
        assert!(matches!(result, Err(ConfigError::CreateDir { .. })));
    }
}
