//! Single-document population store.
//!
//! The canonical dataset lives in one JSON document on disk. A fetch reads
//! and parses the whole document, drops the store's internal `_id` field,
//! and hands the remaining fields back untouched; the daemon never reshapes
//! or validates the dataset it serves.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read document: {0}")]
    Read(#[from] io::Error),

    #[error("document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("document root is not an object")]
    NotAnObject,
}

#[derive(Debug, Clone)]
pub struct DocStore {
    path: PathBuf,
}

impl DocStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch the sole population document, minus its `_id` field.
    ///
    /// A missing document is `Ok(None)`: an empty store is a valid state,
    /// not a fault.
    pub fn fetch_population(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let doc: Value = serde_json::from_str(&text)?;
        let Value::Object(mut fields) = doc else {
            return Err(StoreError::NotAnObject);
        };
        fields.remove("_id");
        Ok(Some(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write as _;

    fn temp_doc(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("popraced-store-{name}-{}", std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_document_is_none() {
        let store = DocStore::open("/nonexistent/population.json");
        assert!(store.fetch_population().unwrap().is_none());
    }

    #[test]
    fn id_field_is_stripped() {
        let path = temp_doc(
            "strip",
            r#"{"_id":"abc123","1950":[{"Country_name":"X","Population":1,"Continent":"Asia","Flags":"x"}]}"#,
        );
        let store = DocStore::open(&path);
        let doc = store.fetch_population().unwrap().unwrap();
        assert!(!doc.contains_key("_id"));
        assert!(doc.contains_key("1950"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_document_is_a_parse_error() {
        let path = temp_doc("corrupt", "not json at all");
        let store = DocStore::open(&path);
        assert!(matches!(
            store.fetch_population(),
            Err(StoreError::Parse(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn non_object_root_is_rejected() {
        let path = temp_doc("array", "[1,2,3]");
        let store = DocStore::open(&path);
        assert!(matches!(
            store.fetch_population(),
            Err(StoreError::NotAnObject)
        ));
        let _ = fs::remove_file(path);
    }
}
