//! # Document Mutations
//!
//! Edit intents over an email document.
//!
//! ## Design Principles
//!
//! 1. **Pure**: `apply` reads the input document and returns a new one; the
//!    input is never touched, so a failed mutation leaves nothing behind
//! 2. **Explicit failure**: refusals and stale ids come back as
//!    [`MutationError`] instead of silently succeeding
//! 3. **Fresh ids**: every node created or duplicated gets a new id
//!
//! ## Failure classes
//!
//! ### Refusal
//! Structural limits: deleting the last section or layout, a fourth column,
//! removing the only column. Expected outcomes, reported to the user as a
//! notice via [`MutationError::notice`].
//!
//! ### Stale reference
//! The id (or section index) no longer exists. Callers holding UI state
//! usually treat these as no-ops, see [`MutationError::is_stale`].

use chrono::{DateTime, Utc};
use mailcraft_common::{
    find_column, find_column_mut, find_layout_mut, with_block_mut, with_parent_list_mut,
};
use mailcraft_document::ast::{DEFAULT_SECTION_NAME, MAX_COLUMNS};
use mailcraft_document::{
    BlockNode, BlockType, Column, EmailDocument, GlobalStyles, Layout, Props, Section,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Direction for reordering a block among its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
}

/// Semantic edit intents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Merge partial props into a block anywhere in the tree
    UpdateBlock { block_id: String, props: Props },

    /// Append a default block to a column, or to the last column in the document
    AddBlock {
        block_type: BlockType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_id: Option<String>,
    },

    /// Append a default block inside a container block
    AddChildBlock {
        container_id: String,
        block_type: BlockType,
    },

    /// Insert a deep copy right after the original
    CopyBlock { block_id: String },

    DeleteBlock { block_id: String },

    /// Relocate a block to the end of another column
    MoveBlock { block_id: String, column_id: String },

    /// Swap a block with its previous or next sibling
    ReorderBlock { block_id: String, direction: Direction },

    AddLayout { section_id: String },

    DeleteLayout { section_id: String, layout_id: String },

    DuplicateLayout { section_id: String, layout_id: String },

    /// Set layout attributes; omitted fields stay as they are
    UpdateLayout {
        layout_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background_color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_dynamic: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mobile_order: Option<Vec<usize>>,
    },

    AddColumn { layout_id: String },

    RemoveColumn { layout_id: String, column_id: String },

    /// Direct width override, no normalization across the layout
    SetColumnWidth { column_id: String, width: u32 },

    AddSection {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    DeleteSection { section_id: String },

    DuplicateSection { section_id: String },

    MoveSection { from: usize, to: usize },

    RenameSection {
        section_id: String,
        #[serde(default)]
        name: Option<String>,
    },

    RenameDocument { name: String },

    /// Set email metadata; omitted fields stay as they are
    UpdateMetadata {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_to_email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subject: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preheader: Option<String>,
    },

    /// Field-wise merge into the document's global styles
    UpdateGlobalStyles { styles: GlobalStyles },

    /// Apply several mutations as one step; the first failure aborts all
    Batch { mutations: Vec<Mutation> },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Layout not found: {0}")]
    LayoutNotFound(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Section index {index} out of bounds for {len} sections")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot delete the last section")]
    LastSection,

    #[error("Cannot delete the last layout of a section")]
    LastLayout,

    #[error("Layout already has the maximum number of columns")]
    ColumnLimit,

    #[error("Cannot remove the last column of a layout")]
    LastColumn,

    #[error("Column width {0} is over 100")]
    InvalidWidth(u32),

    #[error("Block is not a container: {0}")]
    NotAContainer(String),
}

impl MutationError {
    /// Structural limit hit; the user should be told why nothing happened
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            MutationError::LastSection
                | MutationError::LastLayout
                | MutationError::ColumnLimit
                | MutationError::LastColumn
                | MutationError::InvalidWidth(_)
                | MutationError::NotAContainer(_)
        )
    }

    /// The target no longer exists
    pub fn is_stale(&self) -> bool {
        !self.is_refusal()
    }

    /// User-facing explanation for a refusal
    pub fn notice(&self) -> Option<String> {
        let message = match self {
            MutationError::LastSection => "An email needs at least one section.".to_string(),
            MutationError::LastLayout => "A section needs at least one layout.".to_string(),
            MutationError::ColumnLimit => {
                format!("A layout can have at most {MAX_COLUMNS} columns.")
            }
            MutationError::LastColumn => "A layout needs at least one column.".to_string(),
            MutationError::InvalidWidth(width) => {
                format!("Column width must be between 0 and 100, got {width}.")
            }
            MutationError::NotAContainer(_) => {
                "Blocks can only be nested inside a container.".to_string()
            }
            _ => return None,
        };
        Some(message)
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// The new document
    pub document: EmailDocument,

    /// Id of the node the mutation created, if it created one
    pub inserted_id: Option<String>,

    /// Whether `inserted_id` names a block rather than a layout, column or section
    pub inserted_block: bool,
}

/// Node created by a single step
struct Inserted {
    id: String,
    block: bool,
}

impl Mutation {
    /// Apply to a copy of `doc`, stamping `last_modified` with the current time
    pub fn apply(&self, doc: &EmailDocument) -> Result<MutationResult, MutationError> {
        self.apply_at(doc, Utc::now())
    }

    /// Apply to a copy of `doc`, stamping `last_modified` with `now`
    pub fn apply_at(
        &self,
        doc: &EmailDocument,
        now: DateTime<Utc>,
    ) -> Result<MutationResult, MutationError> {
        let mut document = doc.clone();
        let inserted = self.apply_tracked(&mut document)?;
        document.touch(now);
        let inserted_block = inserted.as_ref().is_some_and(|i| i.block);
        let inserted_id = inserted.map(|i| i.id);

        debug!(
            mutation = self.name(),
            document_id = %document.id,
            inserted_id = ?inserted_id,
            "Applied mutation"
        );

        Ok(MutationResult {
            document,
            inserted_id,
            inserted_block,
        })
    }

    /// The last step of a batch that creates a node decides what was inserted
    fn apply_tracked(&self, doc: &mut EmailDocument) -> Result<Option<Inserted>, MutationError> {
        if let Mutation::Batch { mutations } = self {
            let mut inserted = None;
            for mutation in mutations {
                if let Some(step) = mutation.apply_tracked(doc)? {
                    inserted = Some(step);
                }
            }
            return Ok(inserted);
        }

        let block = self.inserts_block();
        Ok(self.apply_in_place(doc)?.map(|id| Inserted { id, block }))
    }

    fn apply_in_place(&self, doc: &mut EmailDocument) -> Result<Option<String>, MutationError> {
        match self {
            Mutation::UpdateBlock { block_id, props } => {
                with_block_mut(doc, block_id, |block| block.merge_props(props))
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                Ok(None)
            }

            Mutation::AddBlock {
                block_type,
                column_id,
            } => Self::apply_add_block(doc, *block_type, column_id.as_deref()).map(Some),

            Mutation::AddChildBlock {
                container_id,
                block_type,
            } => Self::apply_add_child(doc, container_id, *block_type).map(Some),

            Mutation::CopyBlock { block_id } => {
                let copy_id = with_parent_list_mut(doc, block_id, |list, index| {
                    let copy = list[index].duplicate();
                    let copy_id = copy.id.clone();
                    list.insert(index + 1, copy);
                    copy_id
                })
                .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                Ok(Some(copy_id))
            }

            Mutation::DeleteBlock { block_id } => {
                Self::take_block(doc, block_id)?;
                Ok(None)
            }

            Mutation::MoveBlock {
                block_id,
                column_id,
            } => {
                if find_column(doc, column_id).is_none() {
                    return Err(MutationError::ColumnNotFound(column_id.clone()));
                }
                let block = Self::take_block(doc, block_id)?;
                find_column_mut(doc, column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?
                    .blocks
                    .push(block);
                Ok(None)
            }

            Mutation::ReorderBlock {
                block_id,
                direction,
            } => {
                with_parent_list_mut(doc, block_id, |list, index| {
                    let target = match direction {
                        Direction::Up => index.checked_sub(1),
                        Direction::Down => Some(index + 1).filter(|&i| i < list.len()),
                    };
                    if let Some(target) = target {
                        list.swap(index, target);
                    }
                })
                .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                Ok(None)
            }

            Mutation::AddLayout { section_id } => {
                let section = Self::section_mut(doc, section_id)?;
                let layout = Layout::new();
                let layout_id = layout.id.clone();
                section.layouts.push(layout);
                Ok(Some(layout_id))
            }

            Mutation::DeleteLayout {
                section_id,
                layout_id,
            } => {
                let section = Self::section_mut(doc, section_id)?;
                if section.layouts.len() == 1 {
                    return Err(MutationError::LastLayout);
                }
                let index = Self::layout_index(section, layout_id)?;
                section.layouts.remove(index);
                Ok(None)
            }

            Mutation::DuplicateLayout {
                section_id,
                layout_id,
            } => {
                let section = Self::section_mut(doc, section_id)?;
                let index = Self::layout_index(section, layout_id)?;
                let copy = section.layouts[index].duplicate();
                let copy_id = copy.id.clone();
                section.layouts.insert(index + 1, copy);
                Ok(Some(copy_id))
            }

            Mutation::UpdateLayout {
                layout_id,
                background_color,
                is_dynamic,
                mobile_order,
            } => {
                let layout = find_layout_mut(doc, layout_id)
                    .ok_or_else(|| MutationError::LayoutNotFound(layout_id.clone()))?;
                if let Some(color) = background_color {
                    layout.background_color = Some(color.clone());
                }
                if let Some(dynamic) = is_dynamic {
                    layout.is_dynamic = *dynamic;
                }
                if let Some(order) = mobile_order {
                    layout.mobile_order = Some(order.clone());
                }
                Ok(None)
            }

            Mutation::AddColumn { layout_id } => {
                let layout = find_layout_mut(doc, layout_id)
                    .ok_or_else(|| MutationError::LayoutNotFound(layout_id.clone()))?;
                if layout.columns.len() >= MAX_COLUMNS {
                    return Err(MutationError::ColumnLimit);
                }
                let column = Column::new(0);
                let column_id = column.id.clone();
                layout.columns.push(column);
                layout.redistribute_widths();
                // Indices changed, a stored stacking order no longer matches
                layout.mobile_order = None;
                Ok(Some(column_id))
            }

            Mutation::RemoveColumn {
                layout_id,
                column_id,
            } => {
                let layout = find_layout_mut(doc, layout_id)
                    .ok_or_else(|| MutationError::LayoutNotFound(layout_id.clone()))?;
                if layout.columns.len() == 1 {
                    return Err(MutationError::LastColumn);
                }
                let index = layout
                    .columns
                    .iter()
                    .position(|c| c.id == *column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                layout.columns.remove(index);
                layout.redistribute_widths();
                layout.mobile_order = None;
                Ok(None)
            }

            Mutation::SetColumnWidth { column_id, width } => {
                if *width > 100 {
                    return Err(MutationError::InvalidWidth(*width));
                }
                find_column_mut(doc, column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?
                    .width = *width;
                Ok(None)
            }

            Mutation::AddSection { name } => {
                let section = Section::new(name.clone());
                let section_id = section.id.clone();
                doc.sections.push(section);
                Ok(Some(section_id))
            }

            Mutation::DeleteSection { section_id } => {
                if doc.sections.len() == 1 {
                    return Err(MutationError::LastSection);
                }
                let index = Self::section_index(doc, section_id)?;
                doc.sections.remove(index);
                Ok(None)
            }

            Mutation::DuplicateSection { section_id } => {
                let index = Self::section_index(doc, section_id)?;
                let copy = doc.sections[index].duplicate();
                let copy_id = copy.id.clone();
                doc.sections.insert(index + 1, copy);
                Ok(Some(copy_id))
            }

            Mutation::MoveSection { from, to } => {
                let len = doc.sections.len();
                for &index in [from, to] {
                    if index >= len {
                        return Err(MutationError::IndexOutOfBounds { index, len });
                    }
                }
                let section = doc.sections.remove(*from);
                doc.sections.insert(*to, section);
                Ok(None)
            }

            Mutation::RenameSection { section_id, name } => {
                Self::section_mut(doc, section_id)?.name = name.clone();
                Ok(None)
            }

            Mutation::RenameDocument { name } => {
                doc.name = name.clone();
                Ok(None)
            }

            Mutation::UpdateMetadata {
                from_name,
                from_email,
                reply_to_email,
                subject,
                preheader,
            } => {
                let fields = [
                    (&mut doc.from_name, from_name),
                    (&mut doc.from_email, from_email),
                    (&mut doc.reply_to_email, reply_to_email),
                    (&mut doc.subject, subject),
                    (&mut doc.preheader, preheader),
                ];
                for (target, value) in fields {
                    if value.is_some() {
                        target.clone_from(value);
                    }
                }
                Ok(None)
            }

            Mutation::UpdateGlobalStyles { styles } => {
                doc.global_styles
                    .get_or_insert_with(GlobalStyles::empty)
                    .merge(styles);
                Ok(None)
            }

            Mutation::Batch { .. } => Ok(self.apply_tracked(doc)?.map(|i| i.id)),
        }
    }

    fn apply_add_block(
        doc: &mut EmailDocument,
        block_type: BlockType,
        column_id: Option<&str>,
    ) -> Result<String, MutationError> {
        let block = BlockNode::new(block_type);
        let block_id = block.id.clone();

        let column = match column_id {
            Some(column_id) => find_column_mut(doc, column_id)
                .ok_or_else(|| MutationError::ColumnNotFound(column_id.to_string()))?,
            None => {
                let section = last_or_push(&mut doc.sections, || {
                    Section::new(Some(DEFAULT_SECTION_NAME.to_string()))
                });
                let layout = last_or_push(&mut section.layouts, Layout::new);
                last_or_push(&mut layout.columns, || Column::new(100))
            }
        };

        column.blocks.push(block);
        Ok(block_id)
    }

    fn apply_add_child(
        doc: &mut EmailDocument,
        container_id: &str,
        block_type: BlockType,
    ) -> Result<String, MutationError> {
        let block = BlockNode::new(block_type);
        let block_id = block.id.clone();

        with_block_mut(doc, container_id, |container| {
            if !container.is_container() {
                return Err(MutationError::NotAContainer(container_id.to_string()));
            }
            container.children.get_or_insert_with(Vec::new).push(block);
            Ok(())
        })
        .ok_or_else(|| MutationError::BlockNotFound(container_id.to_string()))??;

        Ok(block_id)
    }

    /// Detach a block from whichever list holds it
    fn take_block(doc: &mut EmailDocument, block_id: &str) -> Result<BlockNode, MutationError> {
        with_parent_list_mut(doc, block_id, |list, index| list.remove(index))
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
    }

    fn section_index(doc: &EmailDocument, section_id: &str) -> Result<usize, MutationError> {
        doc.sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))
    }

    fn section_mut<'a>(
        doc: &'a mut EmailDocument,
        section_id: &str,
    ) -> Result<&'a mut Section, MutationError> {
        doc.section_mut(section_id)
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))
    }

    fn layout_index(section: &Section, layout_id: &str) -> Result<usize, MutationError> {
        section
            .layouts
            .iter()
            .position(|l| l.id == layout_id)
            .ok_or_else(|| MutationError::LayoutNotFound(layout_id.to_string()))
    }

    /// Debug name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::AddBlock { .. } => "add_block",
            Mutation::AddChildBlock { .. } => "add_child_block",
            Mutation::CopyBlock { .. } => "copy_block",
            Mutation::DeleteBlock { .. } => "delete_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::ReorderBlock { .. } => "reorder_block",
            Mutation::AddLayout { .. } => "add_layout",
            Mutation::DeleteLayout { .. } => "delete_layout",
            Mutation::DuplicateLayout { .. } => "duplicate_layout",
            Mutation::UpdateLayout { .. } => "update_layout",
            Mutation::AddColumn { .. } => "add_column",
            Mutation::RemoveColumn { .. } => "remove_column",
            Mutation::SetColumnWidth { .. } => "set_column_width",
            Mutation::AddSection { .. } => "add_section",
            Mutation::DeleteSection { .. } => "delete_section",
            Mutation::DuplicateSection { .. } => "duplicate_section",
            Mutation::MoveSection { .. } => "move_section",
            Mutation::RenameSection { .. } => "rename_section",
            Mutation::RenameDocument { .. } => "rename_document",
            Mutation::UpdateMetadata { .. } => "update_metadata",
            Mutation::UpdateGlobalStyles { .. } => "update_global_styles",
            Mutation::Batch { .. } => "batch",
        }
    }

    /// Human-readable label for the history entry this mutation produces
    pub fn describe(&self) -> String {
        match self {
            Mutation::UpdateBlock { .. } => "Edit block".to_string(),
            Mutation::AddBlock { block_type, .. } | Mutation::AddChildBlock { block_type, .. } => {
                format!("Add {block_type} block")
            }
            Mutation::CopyBlock { .. } => "Copy block".to_string(),
            Mutation::DeleteBlock { .. } => "Delete block".to_string(),
            Mutation::MoveBlock { .. } | Mutation::ReorderBlock { .. } => "Move block".to_string(),
            Mutation::AddLayout { .. } => "Add layout".to_string(),
            Mutation::DeleteLayout { .. } => "Delete layout".to_string(),
            Mutation::DuplicateLayout { .. } => "Duplicate layout".to_string(),
            Mutation::UpdateLayout { .. } => "Edit layout".to_string(),
            Mutation::AddColumn { .. } => "Add column".to_string(),
            Mutation::RemoveColumn { .. } => "Remove column".to_string(),
            Mutation::SetColumnWidth { .. } => "Resize column".to_string(),
            Mutation::AddSection { .. } => "Add section".to_string(),
            Mutation::DeleteSection { .. } => "Delete section".to_string(),
            Mutation::DuplicateSection { .. } => "Duplicate section".to_string(),
            Mutation::MoveSection { .. } => "Move section".to_string(),
            Mutation::RenameSection { .. } => "Rename section".to_string(),
            Mutation::RenameDocument { .. } => "Rename email".to_string(),
            Mutation::UpdateMetadata { .. } => "Edit email settings".to_string(),
            Mutation::UpdateGlobalStyles { .. } => "Edit global styles".to_string(),
            Mutation::Batch { mutations } => match mutations.as_slice() {
                [single] => single.describe(),
                _ => format!("{} edits", mutations.len()),
            },
        }
    }

    /// True if this mutation (or any step of a batch) creates a block
    pub fn inserts_block(&self) -> bool {
        match self {
            Mutation::AddBlock { .. }
            | Mutation::AddChildBlock { .. }
            | Mutation::CopyBlock { .. } => true,
            Mutation::Batch { mutations } => mutations.iter().any(Mutation::inserts_block),
            _ => false,
        }
    }

    /// True if this mutation (or any step of a batch) renames the document
    pub fn renames_document(&self) -> bool {
        match self {
            Mutation::RenameDocument { .. } => true,
            Mutation::Batch { mutations } => mutations.iter().any(Mutation::renames_document),
            _ => false,
        }
    }
}

/// Last element of `items`, pushing one from `make` first if empty
fn last_or_push<T>(items: &mut Vec<T>, make: impl FnOnce() -> T) -> &mut T {
    if items.is_empty() {
        items.push(make());
    }
    let last = items.len() - 1;
    &mut items[last]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::AddBlock {
            block_type: BlockType::SocialShare,
            column_id: Some("column-1".to_string()),
        };

        let json = serde_json::to_value(&mutation).unwrap();
        assert_eq!(
            json,
            json!({ "type": "addBlock", "blockType": "social-share", "columnId": "column-1" })
        );

        let deserialized: Mutation = serde_json::from_value(json).unwrap();
        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_mutation_from_json_defaults() {
        let mutation: Mutation =
            serde_json::from_str(r#"{ "type": "addBlock", "blockType": "text" }"#).unwrap();
        assert_eq!(
            mutation,
            Mutation::AddBlock {
                block_type: BlockType::Text,
                column_id: None
            }
        );
    }

    #[test]
    fn test_input_document_untouched() {
        let doc = EmailDocument::new("Pure");
        let before = doc.clone();

        let result = Mutation::AddBlock {
            block_type: BlockType::Text,
            column_id: None,
        }
        .apply(&doc)
        .unwrap();

        assert_eq!(doc, before);
        assert_eq!(result.document.block_count(), 1);
    }

    #[test]
    fn test_apply_at_stamps_last_modified() {
        let doc = EmailDocument::new("Stamp");
        let later = doc.last_modified + chrono::Duration::seconds(30);

        let result = Mutation::RenameDocument {
            name: "Stamped".to_string(),
        }
        .apply_at(&doc, later)
        .unwrap();

        assert_eq!(result.document.last_modified, later);
        assert_eq!(result.document.created, doc.created);
    }

    #[test]
    fn test_error_classes() {
        assert!(MutationError::LastSection.is_refusal());
        assert!(MutationError::ColumnLimit.notice().is_some());
        assert!(MutationError::BlockNotFound("b".into()).is_stale());
        assert!(MutationError::BlockNotFound("b".into()).notice().is_none());
        assert!(MutationError::IndexOutOfBounds { index: 4, len: 1 }.is_stale());
    }

    #[test]
    fn test_batch_describe() {
        let single = Mutation::Batch {
            mutations: vec![Mutation::AddSection { name: None }],
        };
        assert_eq!(single.describe(), "Add section");

        let many = Mutation::Batch {
            mutations: vec![
                Mutation::AddSection { name: None },
                Mutation::RenameDocument { name: "x".into() },
            ],
        };
        assert_eq!(many.describe(), "2 edits");
        assert!(many.renames_document());
        assert!(!many.inserts_block());
    }
}
