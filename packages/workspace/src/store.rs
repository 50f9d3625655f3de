//! # Persistence Adapter
//!
//! Async boundary between editing and storage. Backends hand out documents
//! already normalized by the migrator, so callers never see legacy shapes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailcraft_document::EmailDocument;

use crate::error::StoreResult;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every stored document, most recently modified first
    async fn get_all_documents(&self) -> StoreResult<Vec<EmailDocument>>;

    async fn get_document(&self, id: &str) -> StoreResult<Option<EmailDocument>>;

    /// Persist a copy of `doc` stamped with the current time.
    ///
    /// Returns the stamp written; `doc` itself is left as it was.
    async fn save_document(&self, doc: &EmailDocument) -> StoreResult<DateTime<Utc>>;

    async fn delete_document(&self, id: &str) -> StoreResult<()>;

    /// Persist a fresh skeleton document named `name`
    async fn create_document(&self, name: &str) -> StoreResult<EmailDocument> {
        let mut doc = EmailDocument::new(name);
        doc.last_modified = self.save_document(&doc).await?;
        Ok(doc)
    }
}

/// Clone of `doc` as it should be written, stamped `now`
pub(crate) fn stamped(doc: &EmailDocument, now: DateTime<Utc>) -> EmailDocument {
    let mut stored = doc.clone();
    stored.touch(now);
    stored
}

pub(crate) fn newest_first(docs: &mut [EmailDocument]) {
    docs.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_newest_first() {
        let now = Utc::now();
        let old = EmailDocument::new_at("Old", now - Duration::days(2));
        let recent = EmailDocument::new_at("Recent", now);
        let middle = EmailDocument::new_at("Middle", now - Duration::days(1));

        let mut docs = vec![old, recent, middle];
        newest_first(&mut docs);

        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Recent", "Middle", "Old"]);
    }

    #[test]
    fn test_stamped_leaves_source() {
        let doc = EmailDocument::new("Source");
        let later = doc.last_modified + Duration::seconds(5);

        let stored = stamped(&doc, later);

        assert_eq!(stored.last_modified, later);
        assert_ne!(doc.last_modified, later);
    }
}
