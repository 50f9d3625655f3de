//! # Mailcraft Editor
//!
//! Core editing engine for email documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: JSON → migrate → EmailDocument    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Apply mutations (pure, tree → tree)      │
//! │  - Record snapshots for undo/redo           │
//! │  - Derive post-effects (select, persist)    │
//! │  - Turn refusals into user notices          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: stores, explicit save, auto-save │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Documents are values**: a mutation returns a new tree, the old one
//!    stays valid as an undo snapshot
//! 2. **Soft failure at the edge**: refusals and stale ids never panic, the
//!    session decides whether the user hears about them
//! 3. **No I/O**: persistence belongs to the workspace crate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailcraft_editor::{EditSession, Mutation};
//! use mailcraft_document::{BlockType, EmailDocument};
//!
//! let mut session = EditSession::new(EmailDocument::new("Newsletter"));
//!
//! session.apply(&Mutation::AddBlock {
//!     block_type: BlockType::Text,
//!     column_id: None,
//! });
//!
//! session.undo();
//! session.redo();
//! ```

mod errors;
mod mutations;
mod post_effects;
mod session;
mod undo_stack;

pub use errors::EditorError;
pub use mutations::{Direction, Mutation, MutationError, MutationResult};
pub use post_effects::{AutoSaveOnRename, Effect, PostEffect, PostEffectEngine, SelectInsertedBlock};
pub use session::{ApplyOutcome, EditSession, Notice};
pub use undo_stack::{UndoStack, DEFAULT_MAX_LEVELS};

// Re-export document types for convenience
pub use mailcraft_document::{BlockType, EmailDocument};
