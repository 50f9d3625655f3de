//! # Workspace
//!
//! Ties a [`DocumentStore`] to an [`EditSession`]. Documents are read through
//! the migrator, edited in memory and written back on `save`, or right away
//! when an applied mutation asks for it and auto-save is on.

use chrono::{DateTime, Utc};
use mailcraft_document::EmailDocument;
use mailcraft_editor::{ApplyOutcome, EditSession, Effect, Mutation, DEFAULT_MAX_LEVELS};
use tracing::{info, warn};

use crate::error::{StoreError, WorkspaceError, WorkspaceResult};
use crate::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceOptions {
    /// Save immediately when a mutation emits [`Effect::Persist`]
    pub auto_save: bool,
    pub history_limit: usize,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            auto_save: true,
            history_limit: DEFAULT_MAX_LEVELS,
        }
    }
}

pub struct Workspace<S> {
    store: S,
    options: WorkspaceOptions,
    session: Option<EditSession>,
}

impl<S: DocumentStore> Workspace<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, WorkspaceOptions::default())
    }

    pub fn with_options(store: S, options: WorkspaceOptions) -> Self {
        Self {
            store,
            options,
            session: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &WorkspaceOptions {
        &self.options
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    /// The open document, if any
    pub fn document(&self) -> Option<&EmailDocument> {
        self.session.as_ref().map(EditSession::document)
    }

    pub async fn list(&self) -> WorkspaceResult<Vec<EmailDocument>> {
        Ok(self.store.get_all_documents().await?)
    }

    /// Load `id` into a fresh session, replacing whatever was open
    pub async fn open(&mut self, id: &str) -> WorkspaceResult<&mut EditSession> {
        let doc = self
            .store
            .get_document(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        info!(document_id = %id, "Opened document");
        Ok(self.start_session(doc))
    }

    /// Create, persist and open a new document
    pub async fn create(&mut self, name: &str) -> WorkspaceResult<&mut EditSession> {
        let doc = self.store.create_document(name).await?;
        info!(document_id = %doc.id, name, "Created document");
        Ok(self.start_session(doc))
    }

    fn start_session(&mut self, doc: EmailDocument) -> &mut EditSession {
        let session = EditSession::with_history_limit(doc, self.options.history_limit);
        self.session.insert(session)
    }

    pub fn close(&mut self) -> Option<EditSession> {
        self.session.take()
    }

    /// Apply `mutation` to the open document.
    ///
    /// If auto-save is on and the mutation emits [`Effect::Persist`], the
    /// document is saved before returning. A failed auto-save is returned as an
    /// error; the edit itself stays applied and the session stays dirty.
    pub async fn apply(&mut self, mutation: &Mutation) -> WorkspaceResult<ApplyOutcome> {
        let session = self.session.as_mut().ok_or(WorkspaceError::NoDocument)?;
        let outcome = session.apply(mutation);

        let persist = outcome.effects().contains(&Effect::Persist);
        if persist && self.options.auto_save {
            if let Err(err) = self.save().await {
                warn!(mutation = mutation.name(), error = %err, "Auto-save failed");
                return Err(err);
            }
        }

        Ok(outcome)
    }

    /// Persist the open document; returns the stamp written to the store
    pub async fn save(&mut self) -> WorkspaceResult<DateTime<Utc>> {
        let session = self.session.as_mut().ok_or(WorkspaceError::NoDocument)?;
        let stamp = self.store.save_document(session.document()).await?;
        session.mark_saved();
        Ok(stamp)
    }

    pub fn undo(&mut self) -> WorkspaceResult<bool> {
        Ok(self.session_or_err()?.undo())
    }

    pub fn redo(&mut self) -> WorkspaceResult<bool> {
        Ok(self.session_or_err()?.redo())
    }

    fn session_or_err(&mut self) -> WorkspaceResult<&mut EditSession> {
        self.session.as_mut().ok_or(WorkspaceError::NoDocument)
    }

    /// Delete a stored document, closing it first if it is open
    pub async fn delete(&mut self, id: &str) -> WorkspaceResult<()> {
        self.store.delete_document(id).await?;
        if self.document().is_some_and(|doc| doc.id == id) {
            self.session = None;
        }
        info!(document_id = %id, "Deleted document");
        Ok(())
    }
}
