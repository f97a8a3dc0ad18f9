use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::store::{read_json, write_json};
use crate::var::{Var, VarId, VarStore};

const COLLECTIONS_FILE: &str = "collections.json";

/// Named, ordered set of var references plus the filename it links to
///
/// A collection never owns vars. It stores their ids and resolves them
/// against whatever [`VarStore`] the caller hands in, so ids whose var is
/// gone are simply skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Collection {
    name: String,
    #[serde(alias = "Description")]
    filename: String,
    #[serde(default)]
    var_ids: Vec<VarId>,
}

impl Collection {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            var_ids: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Filename of the link created in the target directory on activation
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    /// Check that the name and filename can be used as file names
    ///
    /// Both end up joined onto a directory during activation, so each must be
    /// a single plain path component.
    pub fn validate(&self) -> Result<()> {
        check_file_name(&self.name)?;
        check_file_name(&self.filename)
    }

    /// Append a reference; duplicates are kept
    pub fn add_var(&mut self, id: VarId) {
        self.var_ids.push(id);
    }

    /// Drop the first reference to `id`, if any
    pub fn remove_var(&mut self, id: VarId) {
        if let Some(index) = self.var_ids.iter().position(|&current| current == id) {
            self.var_ids.remove(index);
        }
    }

    pub fn var_ids(&self) -> &[VarId] {
        &self.var_ids
    }

    pub fn var_id(&self, index: usize) -> Option<VarId> {
        self.var_ids.get(index).copied()
    }

    pub fn var_count(&self) -> usize {
        self.var_ids.len()
    }

    /// Resolve references against `store`, in reference order
    pub fn vars<'a>(&self, store: &'a VarStore) -> Vec<&'a Var> {
        self.var_ids
            .iter()
            .filter_map(|&id| {
                let var = store.get_by_id(id);
                if var.is_none() {
                    warn!("collection {:?} references unknown var id {}", self.name, id);
                }
                var
            })
            .collect()
    }

    /// References that do not resolve against `store`
    pub fn stale_ids(&self, store: &VarStore) -> Vec<VarId> {
        self.var_ids
            .iter()
            .copied()
            .filter(|&id| store.get_by_id(id).is_none())
            .collect()
    }

    /// Render the resolved vars as `.env` content, one `KEY=VALUE` per line
    pub fn render(&self, store: &VarStore) -> String {
        self.vars(store)
            .into_iter()
            .map(|var| var.to_env_line() + "\n")
            .collect()
    }

    /// Create or truncate `dir/filename` and write the rendered vars to it
    ///
    /// Nothing is cleaned up if the write fails part way.
    pub fn write_to_env_file(
        &self,
        store: &VarStore,
        dir: impl AsRef<Path>,
        filename: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let path = dir.as_ref().join(filename);
        fs::write(&path, self.render(store)).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        debug!("wrote collection {:?} to {:?}", self.name, path);
        Ok(path)
    }
}

/// Reject anything but a single normal path component
pub(crate) fn check_file_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(ConfigError::InvalidName {
            name: name.to_string(),
        }),
    }
}

/// Ordered list of collections persisted to `collections.json`
///
/// Names are not required to be unique; lookups by name return the first
/// match.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    path: PathBuf,
    collections: Vec<Collection>,
}

impl CollectionStore {
    /// Create an empty store rooted at the given configuration directory
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            path: config_dir.as_ref().join(COLLECTIONS_FILE),
            collections: Vec::new(),
        }
    }

    /// Create a store and load it from disk
    pub fn open(config_dir: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new(config_dir);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add(&mut self, collection: Collection) -> &mut Collection {
        self.collections.push(collection);
        let index = self.collections.len() - 1;
        &mut self.collections[index]
    }

    pub fn all(&self) -> &[Collection] {
        &self.collections
    }

    pub fn get(&self, index: usize) -> Option<&Collection> {
        self.collections.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Collection> {
        self.collections.get_mut(index)
    }

    /// First collection with the given name
    pub fn find(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Write every collection to `collections.json`
    pub fn save(&self) -> Result<()> {
        write_json(&self.path, &self.collections)
    }

    /// Replace the in-memory collections with the contents of
    /// `collections.json`, creating an empty file on first run
    pub fn load(&mut self) -> Result<()> {
        match read_json::<Vec<Collection>>(&self.path)? {
            Some(collections) => {
                self.collections = collections;
                debug!(
                    "loaded {} collections from {:?}",
                    self.collections.len(),
                    self.path
                );
                Ok(())
            }
            None => {
                debug!("creating empty collection store at {:?}", self.path);
                self.collections.clear();
                self.save()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn sample_vars(temp: &TempDir) -> VarStore {
        let mut vars = VarStore::new(temp.path());
        vars.add("A", "1", "first").unwrap();
        vars.add("B", "2", "second").unwrap();
        vars.add("C", "3", "third").unwrap();
        vars
    }

    #[test]
    fn test_add_then_remove_restores_refs() {
        let mut collection = Collection::new("dev", ".env");
        collection.add_var(VarId::new(4));
        let before = collection.var_ids().to_vec();

        collection.add_var(VarId::new(9));
        collection.remove_var(VarId::new(9));

        assert_eq!(collection.var_ids(), before.as_slice());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut collection = Collection::new("dev", ".env");
        collection.add_var(VarId::new(1));

        collection.remove_var(VarId::new(2));

        assert_eq!(collection.var_ids(), &[VarId::new(1)]);
    }

    #[test]
    fn test_remove_only_first_duplicate() {
        let mut collection = Collection::new("dev", ".env");
        collection.add_var(VarId::new(1));
        collection.add_var(VarId::new(2));
        collection.add_var(VarId::new(1));

        collection.remove_var(VarId::new(1));

        assert_eq!(collection.var_ids(), &[VarId::new(2), VarId::new(1)]);
        assert_eq!(collection.var_count(), 2);
        assert_eq!(collection.var_id(0), Some(VarId::new(2)));
        assert_eq!(collection.var_id(5), None);
    }

    #[test]
    fn test_vars_skips_unknown_ids() {
        let temp = TempDir::new().unwrap();
        let vars = sample_vars(&temp);

        let mut collection = Collection::new("dev", ".env");
        collection.add_var(VarId::new(1));
        collection.add_var(VarId::new(9));
        collection.add_var(VarId::new(3));

        let keys: Vec<_> = collection
            .vars(&vars)
            .iter()
            .map(|var| var.key.as_str())
            .collect();
        assert_eq!(keys, vec!["A", "C"]);
        assert_eq!(collection.stale_ids(&vars), vec![VarId::new(9)]);
    }

    #[test]
    fn test_render_follows_reference_order() {
        let temp = TempDir::new().unwrap();
        let mut vars = VarStore::new(temp.path());
        let a = vars.add("A", "1", "").unwrap().id();
        let b = vars.add("B", "2", "").unwrap().id();

        let mut collection = Collection::new("swap", ".env");
        collection.add_var(b);
        collection.add_var(a);
        collection.add_var(b);

        assert_eq!(collection.render(&vars), "B=2\nA=1\nB=2\n");
    }

    #[test]
    fn test_write_to_env_file() {
        let temp = TempDir::new().unwrap();
        let mut vars = VarStore::new(temp.path());
        let a = vars.add("A", "1", "").unwrap().id();
        let b = vars.add("B", "2", "").unwrap().id();

        let mut collection = Collection::new("swap", ".env");
        collection.add_var(b);
        collection.add_var(a);

        fs::write(temp.path().join("out.env"), "STALE=1\nSTALE=2\nSTALE=3\n").unwrap();
        let path = collection
            .write_to_env_file(&vars, temp.path(), "out.env")
            .unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "B=2\nA=1\n");
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        let vars = sample_vars(&temp);
        let collection = Collection::new("dev", ".env");

        let result = collection.write_to_env_file(&vars, temp.path().join("nope"), "x.env");
        assert!(matches!(result, Err(ConfigError::Write { .. })));
    }

    #[test]
    fn test_refs_survive_reordering_of_vars() {
        let temp = TempDir::new().unwrap();
        let vars = sample_vars(&temp);
        let mut collection = Collection::new("dev", ".env");
        collection.add_var(vars.get_id_from_key("C").unwrap());

        // Rewrite the store in a different order; ids stay put
        fs::write(
            vars.path(),
            r#"[{"Id": 3, "Key": "C", "Val": "3", "Description": ""},
                {"Id": 1, "Key": "A", "Val": "1", "Description": ""}]"#,
        )
        .unwrap();
        let reordered = VarStore::open(temp.path()).unwrap();

        assert_eq!(collection.render(&reordered), "C=3\n");
    }

    #[test]
    fn test_store_load_missing_creates_file() {
        let temp = TempDir::new().unwrap();
        let mut store = CollectionStore::new(temp.path());

        store.load().unwrap();

        assert!(store.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]\n");
    }

    #[test]
    fn test_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut store = CollectionStore::new(temp.path());
        let dev = store.add(Collection::new("Development", ".env"));
        dev.add_var(VarId::new(1));
        dev.add_var(VarId::new(2));
        store.add(Collection::new("Development", ".env.local"));
        store.save().unwrap();

        let loaded = CollectionStore::open(temp.path()).unwrap();

        assert_eq!(loaded.all(), store.all());
        let contents = fs::read_to_string(loaded.path()).unwrap();
        assert!(contents.contains("\"Name\": \"Development\""));
        assert!(contents.contains("\"Filename\": \".env.local\""));
        assert!(contents.contains("\"VarIds\": ["));
    }

    #[test]
    fn test_store_find_first_match() {
        let temp = TempDir::new().unwrap();
        let mut store = CollectionStore::new(temp.path());
        store.add(Collection::new("dup", "first.env"));
        store.add(Collection::new("dup", "second.env"));

        assert_eq!(store.find("dup").unwrap().filename(), "first.env");
        store.find_mut("dup").unwrap().set_name("renamed");
        assert_eq!(store.get(0).unwrap().name(), "renamed");
        assert_eq!(store.find("dup").unwrap().filename(), "second.env");
        assert!(store.find("missing").is_none());
    }

    #[test]
    fn test_store_reads_description_as_filename() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(COLLECTIONS_FILE),
            r#"[{"Name": "dev", "Description": ".env.dev", "VarIds": [1]}]"#,
        )
        .unwrap();

        let mut store = CollectionStore::open(temp.path()).unwrap();
        let dev = store.find("dev").unwrap();
        assert_eq!(dev.filename(), ".env.dev");
        assert_eq!(dev.var_ids(), &[VarId::new(1)]);

        store.save().unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("\"Filename\": \".env.dev\""));
        assert!(!contents.contains("Description"));
    }

    #[rstest]
    #[case(".env")]
    #[case(".env.local")]
    #[case("dev")]
    #[case("my collection")]
    fn test_check_file_name_accepts(#[case] name: &str) {
        assert!(check_file_name(name).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("/tmp/precious.txt")]
    #[case("../../escaped")]
    #[case("nested/.env")]
    #[case("trailing/")]
    #[case("./.env")]
    fn test_check_file_name_rejects(#[case] name: &str) {
        assert!(matches!(
            check_file_name(name),
            Err(ConfigError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_validate_checks_name_and_filename() {
        assert!(Collection::new("dev", ".env").validate().is_ok());
        assert!(Collection::new("../dev", ".env").validate().is_err());
        assert!(Collection::new("dev", "/etc/passwd").validate().is_err());
    }

    #[test]
    fn test_store_load_malformed_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(COLLECTIONS_FILE), "[{\"Name\": 5}]").unwrap();

        assert!(CollectionStore::open(temp.path()).is_err());
    }
}
