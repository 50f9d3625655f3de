use mailcraft_document::DocumentError;
use mailcraft_editor::EditorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid document id: {0:?}")]
    InvalidId(String),

    #[error("Document has no \"id\" field")]
    MissingId,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("No document is open")]
    NoDocument,
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
