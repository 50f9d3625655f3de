//! # Post-Effect System
//!
//! Some mutations imply work outside the document itself:
//! - Adding or copying a block → the new block becomes the selection
//! - Renaming the email → the document is saved right away
//!
//! Effects are derived, never applied here. The session handles selection;
//! persisting is up to whoever owns a store.

use crate::mutations::{Mutation, MutationResult};

/// Shell-level side effect of an applied mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Make this block the active selection
    Select(String),

    /// Save the document now instead of waiting for an explicit save
    Persist,
}

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug {
    /// Analyze the applied mutation and emit effects if needed
    fn analyze(&self, mutation: &Mutation, result: &MutationResult) -> Vec<Effect>;
}

/// Select the block an add or copy just created
#[derive(Debug)]
pub struct SelectInsertedBlock;

impl PostEffect for SelectInsertedBlock {
    fn analyze(&self, _mutation: &Mutation, result: &MutationResult) -> Vec<Effect> {
        match (&result.inserted_id, result.inserted_block) {
            (Some(block_id), true) => vec![Effect::Select(block_id.clone())],
            _ => vec![],
        }
    }
}

/// Renaming the email saves it immediately
#[derive(Debug)]
pub struct AutoSaveOnRename;

impl PostEffect for AutoSaveOnRename {
    fn analyze(&self, mutation: &Mutation, _result: &MutationResult) -> Vec<Effect> {
        if mutation.renames_document() {
            vec![Effect::Persist]
        } else {
            vec![]
        }
    }
}

/// Post-effect engine that runs all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(SelectInsertedBlock), Box::new(AutoSaveOnRename)],
        }
    }

    /// Engine with no effects registered
    pub fn empty() -> Self {
        Self { effects: vec![] }
    }

    pub fn register(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    /// Collect the effects every registered analyzer emits, in order
    pub fn analyze(&self, mutation: &Mutation, result: &MutationResult) -> Vec<Effect> {
        self.effects
            .iter()
            .flat_map(|effect| effect.analyze(mutation, result))
            .collect()
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_document::{BlockType, EmailDocument};

    #[test]
    fn test_add_block_selects_new_block() {
        let doc = EmailDocument::new("Effects");
        let mutation = Mutation::AddBlock {
            block_type: BlockType::Button,
            column_id: None,
        };
        let result = mutation.apply(&doc).unwrap();
        let block_id = result.inserted_id.clone().unwrap();

        let effects = PostEffectEngine::new().analyze(&mutation, &result);
        assert_eq!(effects, vec![Effect::Select(block_id)]);
    }

    #[test]
    fn test_rename_persists() {
        let doc = EmailDocument::new("Old name");
        let mutation = Mutation::RenameDocument {
            name: "New name".to_string(),
        };
        let result = mutation.apply(&doc).unwrap();

        let effects = PostEffectEngine::new().analyze(&mutation, &result);
        assert_eq!(effects, vec![Effect::Persist]);
    }

    #[test]
    fn test_add_section_has_no_effects() {
        let doc = EmailDocument::new("Quiet");
        let mutation = Mutation::AddSection { name: None };
        let result = mutation.apply(&doc).unwrap();

        assert!(PostEffectEngine::new().analyze(&mutation, &result).is_empty());
    }

    #[test]
    fn test_batch_selects_block_added_before_rename() {
        let doc = EmailDocument::new("Batch");
        let mutation = Mutation::Batch {
            mutations: vec![
                Mutation::AddBlock {
                    block_type: BlockType::Text,
                    column_id: None,
                },
                Mutation::RenameDocument {
                    name: "Renamed".to_string(),
                },
            ],
        };
        let result = mutation.apply(&doc).unwrap();
        let block_id = result.inserted_id.clone().unwrap();
        assert!(result.inserted_block);

        let effects = PostEffectEngine::new().analyze(&mutation, &result);
        assert_eq!(effects, vec![Effect::Select(block_id), Effect::Persist]);
    }

    #[test]
    fn test_batch_ending_in_section_selects_nothing() {
        let doc = EmailDocument::new("Batch");
        let mutation = Mutation::Batch {
            mutations: vec![
                Mutation::AddBlock {
                    block_type: BlockType::Text,
                    column_id: None,
                },
                Mutation::AddSection { name: None },
            ],
        };
        let result = mutation.apply(&doc).unwrap();
        let section_id = result.inserted_id.clone().unwrap();
        assert_eq!(result.document.sections[1].id, section_id);
        assert!(!result.inserted_block);

        assert!(PostEffectEngine::new().analyze(&mutation, &result).is_empty());
    }

    #[test]
    fn test_empty_engine() {
        let doc = EmailDocument::new("None");
        let mutation = Mutation::RenameDocument { name: "x".into() };
        let result = mutation.apply(&doc).unwrap();

        let mut engine = PostEffectEngine::empty();
        assert!(engine.analyze(&mutation, &result).is_empty());

        engine.register(Box::new(AutoSaveOnRename));
        assert_eq!(engine.analyze(&mutation, &result), vec![Effect::Persist]);
    }
}
