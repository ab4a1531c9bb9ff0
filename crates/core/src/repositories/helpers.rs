//! Repository-related utilities.
//!
//! Conversions between typed records and store documents, and id allocation.

use crate::store::DocumentStore;
use crate::{NewsError, NewsResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub(crate) fn to_document<T: Serialize>(record: &T) -> NewsResult<Value> {
    serde_json::to_value(record).map_err(NewsError::Serialization)
}

pub(crate) fn from_document<T: DeserializeOwned>(doc: Value) -> NewsResult<T> {
    serde_json::from_value(doc).map_err(NewsError::Deserialization)
}

/// Decode every document in a listing, skipping (and logging) the ones that do not fit `T`.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<(String, Value)>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|(id, doc)| match serde_json::from_value::<T>(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("skipping malformed document {}/{}: {}", collection, id, e);
                None
            }
        })
        .collect()
}

/// A fresh 32-character lowercase hex identifier.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Allocates an id not yet used in `collection`.
///
/// Guards against pathological collisions (or documents written by something else) by
/// limiting retries.
///
/// # Errors
///
/// Returns `NewsError::InvalidInput` if no free id is found after 5 attempts, or any store
/// error raised while checking.
pub(crate) fn allocate_document_id(
    store: &dyn DocumentStore,
    collection: &str,
    mut id_source: impl FnMut() -> String,
) -> NewsResult<String> {
    for _attempt in 0..5 {
        let id = id_source();
        if store.get(collection, &id)?.is_none() {
            return Ok(id);
        }
    }

    Err(NewsError::InvalidInput(format!(
        "could not allocate a unique id in collection '{}'",
        collection
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileDocumentStore;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_new_id_is_canonical_hex() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }

    #[test]
    fn test_allocate_skips_taken_ids() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileDocumentStore::new(temp_dir.path());
        store.put("users", "taken", &json!({})).unwrap();

        let mut candidates = vec!["free".to_string(), "taken".to_string()];
        let id = allocate_document_id(&store, "users", || candidates.pop().unwrap())
            .expect("allocation should succeed");

        assert_eq!(id, "free");
    }

    #[test]
    fn test_allocate_gives_up_after_retries() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileDocumentStore::new(temp_dir.path());
        store.put("users", "taken", &json!({})).unwrap();

        let err = allocate_document_id(&store, "users", || "taken".to_string()).unwrap_err();
        assert!(matches!(err, NewsError::InvalidInput(_)));
    }

    #[test]
    fn test_decode_all_skips_mismatched_documents() {
        #[derive(serde::Deserialize)]
        struct Named {
            name: String,
        }

        let docs = vec![
            ("a".to_string(), json!({"name": "ok"})),
            ("b".to_string(), json!({"other": 1})),
        ];
        let decoded: Vec<Named> = decode_all("things", docs);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "ok");
    }
}
