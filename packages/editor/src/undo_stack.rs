//! # Undo/Redo Stack
//!
//! Linear history of full document snapshots.
//!
//! ## Design
//!
//! - Every recorded edit stores an independent deep copy of the whole tree
//! - Undo/redo move an index; nothing is recomputed
//! - Recording after an undo discards the redo branch (no history tree)
//! - Loading a document starts a fresh single-entry history
//!
//! Memory grows with edit count times document size, bounded by `max_levels`.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new(doc.clone());
//!
//! let next = mutation.apply(stack.current())?.document;
//! stack.record(&next);
//!
//! let previous = stack.undo();   // Some(&doc)
//! let again = stack.redo();      // Some(&next)
//! ```

use mailcraft_document::EmailDocument;

/// Default number of undo levels kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

#[derive(Debug, Clone)]
struct Snapshot {
    document: EmailDocument,

    /// Label of the edit that produced this snapshot
    description: Option<String>,
}

/// Snapshot-based undo/redo history
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Snapshots, oldest first; never empty
    entries: Vec<Snapshot>,

    /// Position of the current document in `entries`
    index: usize,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Start a history at `initial` with default max levels (100)
    pub fn new(initial: EmailDocument) -> Self {
        Self::with_max_levels(initial, DEFAULT_MAX_LEVELS)
    }

    /// Start a history with custom max levels
    pub fn with_max_levels(initial: EmailDocument, max_levels: usize) -> Self {
        Self {
            entries: vec![Snapshot {
                document: initial,
                description: None,
            }],
            index: 0,
            max_levels,
        }
    }

    /// Record a new current document, discarding any redo entries
    pub fn record(&mut self, doc: &EmailDocument) {
        self.push(Snapshot {
            document: doc.clone(),
            description: None,
        });
    }

    /// Record with a description of the edit
    pub fn record_labeled(&mut self, doc: &EmailDocument, description: impl Into<String>) {
        self.push(Snapshot {
            document: doc.clone(),
            description: Some(description.into()),
        });
    }

    fn push(&mut self, snapshot: Snapshot) {
        // New action invalidates future
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);

        if self.max_levels > 0 && self.entries.len() > self.max_levels + 1 {
            self.entries.remove(0);
        }

        self.index = self.entries.len() - 1;
    }

    /// Step back; `None` if already at the oldest snapshot
    pub fn undo(&mut self) -> Option<&EmailDocument> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step forward; `None` if already at the newest snapshot
    pub fn redo(&mut self) -> Option<&EmailDocument> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    /// Drop all history and start over at `doc`
    pub fn reset(&mut self, doc: EmailDocument) {
        self.entries = vec![Snapshot {
            document: doc,
            description: None,
        }];
        self.index = 0;
    }

    /// Snapshot at the current index
    pub fn current(&self) -> &EmailDocument {
        &self.entries[self.index].document
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.index
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.entries.len() - 1 - self.index
    }

    /// Description of the edit `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries[self.index].description.as_deref()
    }

    /// Description of the edit `redo` would reapply
    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.index + 1)
            .and_then(|snapshot| snapshot.description.as_deref())
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }
}
