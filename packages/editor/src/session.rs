//! # Edit Session
//!
//! State container for one open document: the current tree, its undo
//! history, the selected block and any notices waiting to be shown.
//!
//! Every edit goes through [`EditSession::apply`]. Applied mutations are
//! recorded in history; refusals become notices; stale references are
//! dropped without a trace in the document or history.

use mailcraft_common::contains_block;
use mailcraft_document::{migrate_str, EmailDocument};
use tracing::{debug, warn};

use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationError};
use crate::post_effects::{Effect, PostEffectEngine};
use crate::undo_stack::{UndoStack, DEFAULT_MAX_LEVELS};

/// User-facing explanation of a refused edit
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub reason: MutationError,
}

/// What happened to a mutation handed to the session
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Document replaced and recorded in history
    Applied { effects: Vec<Effect> },

    /// Structural limit hit; document unchanged, notice queued
    Refused(Notice),

    /// Target no longer exists; document unchanged
    Ignored(MutationError),
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }

    /// Effects emitted by an applied mutation
    pub fn effects(&self) -> &[Effect] {
        match self {
            ApplyOutcome::Applied { effects } => effects,
            _ => &[],
        }
    }
}

/// Single-user editing state for one document
#[derive(Debug)]
pub struct EditSession {
    document: EmailDocument,
    history: UndoStack,
    selected_block: Option<String>,
    notices: Vec<Notice>,
    post_effects: PostEffectEngine,
    dirty: bool,
}

impl EditSession {
    /// Open `document` with a fresh history
    pub fn new(document: EmailDocument) -> Self {
        Self::with_history_limit(document, DEFAULT_MAX_LEVELS)
    }

    pub fn with_history_limit(document: EmailDocument, max_levels: usize) -> Self {
        Self {
            history: UndoStack::with_max_levels(document.clone(), max_levels),
            document,
            selected_block: None,
            notices: Vec::new(),
            post_effects: PostEffectEngine::new(),
            dirty: false,
        }
    }

    /// Open a persisted document, migrating legacy JSON first
    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        Ok(Self::new(migrate_str(source)?))
    }

    /// Replace the open document; its history starts over
    pub fn load(&mut self, document: EmailDocument) {
        self.history.reset(document.clone());
        self.document = document;
        self.selected_block = None;
        self.notices.clear();
        self.dirty = false;
    }

    /// Apply a mutation, classifying failures into refusals and stale references
    pub fn apply(&mut self, mutation: &Mutation) -> ApplyOutcome {
        match self.apply_mutation(mutation) {
            Ok(effects) => ApplyOutcome::Applied { effects },
            Err(error) => match error.notice() {
                Some(message) => {
                    warn!(mutation = mutation.name(), notice = %message, "Mutation refused");
                    let notice = Notice {
                        message,
                        reason: error,
                    };
                    self.notices.push(notice.clone());
                    ApplyOutcome::Refused(notice)
                }
                None => {
                    debug!(mutation = mutation.name(), %error, "Ignoring stale mutation");
                    ApplyOutcome::Ignored(error)
                }
            },
        }
    }

    /// Apply a mutation, surfacing every failure as an error
    pub fn try_apply(&mut self, mutation: &Mutation) -> Result<Vec<Effect>, EditorError> {
        Ok(self.apply_mutation(mutation)?)
    }

    fn apply_mutation(&mut self, mutation: &Mutation) -> Result<Vec<Effect>, MutationError> {
        let result = mutation.apply(&self.document)?;
        let effects = self.post_effects.analyze(mutation, &result);

        self.history
            .record_labeled(&result.document, mutation.describe());
        self.document = result.document;
        self.dirty = true;

        for effect in &effects {
            if let Effect::Select(block_id) = effect {
                self.selected_block = Some(block_id.clone());
            }
        }
        self.drop_stale_selection();

        Ok(effects)
    }

    /// Revert to the previous snapshot; false if there is none
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.document = snapshot.clone();
                self.after_history_move();
                true
            }
            None => false,
        }
    }

    /// Reapply the next snapshot; false if there is none
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.document = snapshot.clone();
                self.after_history_move();
                true
            }
            None => false,
        }
    }

    fn after_history_move(&mut self) {
        self.dirty = true;
        self.drop_stale_selection();
    }

    fn drop_stale_selection(&mut self) {
        if let Some(block_id) = &self.selected_block {
            if !contains_block(&self.document, block_id) {
                self.selected_block = None;
            }
        }
    }

    /// Select an existing block; false if the id is not in the document
    pub fn select(&mut self, block_id: &str) -> bool {
        if contains_block(&self.document, block_id) {
            self.selected_block = Some(block_id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_block = None;
    }

    pub fn selected_block(&self) -> Option<&str> {
        self.selected_block.as_deref()
    }

    pub fn document(&self) -> &EmailDocument {
        &self.document
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drain queued notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// True if the document changed since it was loaded or last saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Serialize the current document to its persisted JSON shape
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(self.document.to_json_pretty()?)
    }
}
