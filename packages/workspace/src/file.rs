use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailcraft_document::{migrate_str, EmailDocument};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::{newest_first, stamped, DocumentStore};

const EXTENSION: &str = "json";

/// Directory of `<id>.json` files, one per document
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Use `root` as the store directory, creating it if needed
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        validate_id(id)?;
        Ok(self.root.join(format!("{id}.{EXTENSION}")))
    }
}

/// Ids become file names, so only `[A-Za-z0-9_-]` is allowed
fn validate_id(id: &str) -> StoreResult<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get_all_documents(&self) -> StoreResult<Vec<EmailDocument>> {
        let mut docs = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let source = fs::read_to_string(&path).await?;
            docs.push(migrate_str(&source)?);
        }

        newest_first(&mut docs);
        debug!(count = docs.len(), "Listed documents");
        Ok(docs)
    }

    async fn get_document(&self, id: &str) -> StoreResult<Option<EmailDocument>> {
        let path = self.path_for(id)?;
        let source = match fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        info!(document_id = %id, "Loaded document");
        Ok(Some(migrate_str(&source)?))
    }

    async fn save_document(&self, doc: &EmailDocument) -> StoreResult<DateTime<Utc>> {
        let path = self.path_for(&doc.id)?;
        let now = Utc::now();
        let json = stamped(doc, now).to_json_pretty()?;

        // Write then rename so a crash never leaves a truncated document
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;

        info!(document_id = %doc.id, path = %path.display(), "Saved document");
        Ok(now)
    }

    async fn delete_document(&self, id: &str) -> StoreResult<()> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(document_id = %id, "Deleted document");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("doc-1700000000000-1-ab12").is_ok());
        assert!(validate_id("legacy_doc").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("../escape").is_err());
        assert!(validate_id("a/b").is_err());
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("documents");

        let store = FileStore::open(&root).await.unwrap();

        assert!(store.root().is_dir());
        assert!(store.get_all_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_writes_one_file_per_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let doc = EmailDocument::new("On disk");

        store.save_document(&doc).await.unwrap();

        let path = dir.path().join(format!("{}.json", doc.id));
        assert!(path.is_file());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_invalid_id_never_touches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let mut doc = EmailDocument::new("Bad id");
        doc.id = "../../etc/passwd".to_string();

        let result = store.save_document(&doc).await;

        assert!(matches!(result, Err(StoreError::InvalidId(_))));
        assert!(matches!(
            store.get_document("../x").await,
            Err(StoreError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        assert!(store.get_document("absent").await.unwrap().is_none());
        assert!(matches!(
            store.delete_document("absent").await,
            Err(StoreError::NotFound(_))
        ));
    }
}
