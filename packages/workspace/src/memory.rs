use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailcraft_document::{migrate, EmailDocument};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{newest_first, stamped, DocumentStore};

/// Process-local store keeping raw JSON values, keyed by document id
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with persisted values in any supported schema
    pub fn with_values(values: impl IntoIterator<Item = Value>) -> StoreResult<Self> {
        let mut documents = HashMap::new();
        for value in values {
            let id = value
                .get("id")
                .and_then(Value::as_str)
                .ok_or(StoreError::MissingId)?
                .to_string();
            documents.insert(id, value);
        }
        Ok(Self {
            documents: RwLock::new(documents),
        })
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_all_documents(&self) -> StoreResult<Vec<EmailDocument>> {
        let documents = self.documents.read().await;
        let mut docs = documents
            .values()
            .cloned()
            .map(migrate)
            .collect::<Result<Vec<_>, _>>()?;
        newest_first(&mut docs);
        Ok(docs)
    }

    async fn get_document(&self, id: &str) -> StoreResult<Option<EmailDocument>> {
        let documents = self.documents.read().await;
        match documents.get(id) {
            Some(value) => Ok(Some(migrate(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn save_document(&self, doc: &EmailDocument) -> StoreResult<DateTime<Utc>> {
        let now = Utc::now();
        let value = serde_json::to_value(stamped(doc, now))?;

        self.documents.write().await.insert(doc.id.clone(), value);
        debug!(document_id = %doc.id, "Saved document to memory");
        Ok(now)
    }

    async fn delete_document(&self, id: &str) -> StoreResult<()> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();

        let created = store.create_document("Fresh").await.unwrap();
        let loaded = store.get_document(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded, created);
        assert!(store.get_document("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_stamps_stored_copy_only() {
        let store = MemoryStore::new();
        let doc = EmailDocument::new("Stamp");
        let before = doc.last_modified;

        let stamp = store.save_document(&doc).await.unwrap();

        assert_eq!(doc.last_modified, before);
        let loaded = store.get_document(&doc.id).await.unwrap().unwrap();
        assert_eq!(loaded.last_modified, stamp);
        assert!(stamp >= before);
    }

    #[tokio::test]
    async fn test_legacy_values_migrate_on_load() {
        let store = MemoryStore::with_values([json!({
            "id": "old",
            "name": "Old newsletter",
            "content": [{ "id": "b1", "type": "divider" }],
            "created": "2022-01-01T00:00:00Z",
            "lastModified": "2022-01-01T00:00:00Z"
        })])
        .unwrap();

        let doc = store.get_document("old").await.unwrap().unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].layouts[0].columns[0].blocks[0].id, "b1");
    }

    #[test]
    fn test_seed_without_id_rejected() {
        let result = MemoryStore::with_values([json!({ "name": "anonymous" })]);
        let err = result.err().unwrap();
        assert!(matches!(err, StoreError::MissingId));
        assert_eq!(err.to_string(), r#"Document has no "id" field"#);
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = MemoryStore::new();
        let first = store.create_document("First").await.unwrap();
        let second = store.create_document("Second").await.unwrap();

        let all = store.get_all_documents().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|doc| doc.id == second.id));

        store.delete_document(&first.id).await.unwrap();
        assert_eq!(store.get_all_documents().await.unwrap().len(), 1);
        assert!(matches!(
            store.delete_document(&first.id).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
