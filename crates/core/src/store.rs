//! Document storage.
//!
//! Repositories talk to a [`DocumentStore`]: a minimal collection/id/JSON interface that a
//! hosted document database could implement. [`FileDocumentStore`] keeps documents as JSON
//! files under the configured data directory:
//!
//! ```text
//! <data_dir>/
//!   news/<slug>.json
//!   comments/<slug>/<comment-id>.json
//!   users/<uid>.json
//!   credentials/<email-digest>.json
//! ```

use crate::error::{NewsError, NewsResult};
use crate::validation::{validate_collection_path, validate_path_segment};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Collection-of-JSON-documents storage.
///
/// `collection` may be nested with `/` (for example `comments/<slug>`). Every segment and
/// every id must pass [`validate_path_segment`].
pub trait DocumentStore: Send + Sync {
    fn get(&self, collection: &str, id: &str) -> NewsResult<Option<Value>>;

    /// Insert or replace a document.
    fn put(&self, collection: &str, id: &str, doc: &Value) -> NewsResult<()>;

    /// Delete a document, returning whether it existed.
    fn delete(&self, collection: &str, id: &str) -> NewsResult<bool>;

    /// All documents in a collection as `(id, document)` pairs, in no particular order.
    fn list(&self, collection: &str) -> NewsResult<Vec<(String, Value)>>;

    /// Delete a collection and everything under it.
    fn delete_collection(&self, collection: &str) -> NewsResult<()>;
}

/// JSON-file backed [`DocumentStore`].
#[derive(Clone, Debug)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collection_dir(&self, collection: &str) -> NewsResult<PathBuf> {
        validate_collection_path(collection)?;
        Ok(collection
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment)))
    }

    fn document_path(&self, collection: &str, id: &str) -> NewsResult<PathBuf> {
        validate_path_segment(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{id}.json")))
    }
}

impl DocumentStore for FileDocumentStore {
    fn get(&self, collection: &str, id: &str) -> NewsResult<Option<Value>> {
        let path = self.document_path(collection, id)?;
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(NewsError::FileRead(e)),
        };
        let doc = serde_json::from_str(&contents).map_err(NewsError::Deserialization)?;
        Ok(Some(doc))
    }

    fn put(&self, collection: &str, id: &str, doc: &Value) -> NewsResult<()> {
        let path = self.document_path(collection, id)?;
        let dir = self.collection_dir(collection)?;
        fs::create_dir_all(&dir).map_err(NewsError::StorageDirCreation)?;

        let contents = serde_json::to_string_pretty(doc).map_err(NewsError::Serialization)?;

        // Each write gets its own temp file beside the target; the rename is atomic.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{id}."))
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(NewsError::FileWrite)?;
        tmp.write_all(contents.as_bytes())
            .map_err(NewsError::FileWrite)?;
        tmp.persist(&path).map_err(|e| NewsError::FileWrite(e.error))?;

        tracing::debug!("stored document {}/{}", collection, id);
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> NewsResult<bool> {
        let path = self.document_path(collection, id)?;
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(NewsError::FileDelete)?;
        Ok(true)
    }

    fn list(&self, collection: &str) -> NewsResult<Vec<(String, Value)>> {
        let dir = self.collection_dir(collection)?;
        let mut docs = Vec::new();

        let entries = match fs::read_dir(&dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(docs),
            Err(e) => return Err(NewsError::FileRead(e)),
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(id) = path
                .file_name()
                .and_then(|os| os.to_str())
                .and_then(|name| name.strip_suffix(".json"))
                .filter(|id| validate_path_segment(id).is_ok())
            else {
                continue;
            };

            let contents = match fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("failed to read document: {} - {}", path.display(), e);
                    continue;
                }
            };

            match serde_json::from_str::<Value>(&contents) {
                Ok(doc) => docs.push((id.to_string(), doc)),
                Err(e) => {
                    tracing::warn!("failed to parse document: {} - {}", path.display(), e);
                }
            }
        }

        Ok(docs)
    }

    fn delete_collection(&self, collection: &str) -> NewsResult<()> {
        let dir = self.collection_dir(collection)?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NewsError::FileDelete(e)),
        }
    }
}
