//! # Mailcraft Workspace
//!
//! Persistence for email documents and the editing shell on top of it.
//!
//! ```text
//! DocumentStore ──get──► migrate ──► EditSession ──apply──► Mutation
//!       ▲                                 │
//!       └──────────── save / auto-save ◄──┘
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod store;
pub mod workspace;

pub use error::{StoreError, StoreResult, WorkspaceError, WorkspaceResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::DocumentStore;
pub use workspace::{Workspace, WorkspaceOptions};
