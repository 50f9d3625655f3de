//! Structural checks over a document.
//!
//! The model does not enforce these itself; mutations maintain them and
//! `validate` reports anything that slipped through (hand-edited JSON,
//! direct width writes).

use std::collections::HashSet;

use mailcraft_document::ast::MAX_COLUMNS;
use mailcraft_document::{BlockNode, Column, EmailDocument, Layout, Section};
use thiserror::Error;

use crate::visitor::{walk_block, walk_layout, walk_section, Visitor};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Layout {layout_id} has {count} columns (expected 1-3)")]
    ColumnCount { layout_id: String, count: usize },

    #[error("Column {column_id} has width {width} (expected 0-100)")]
    WidthOutOfRange { column_id: String, width: u32 },

    #[error("Column widths in layout {layout_id} sum to {sum}, over 100")]
    WidthSum { layout_id: String, sum: u32 },

    #[error("Block {block_id} is not a container but has children")]
    UnexpectedChildren { block_id: String },

    #[error("Layout {layout_id} has a mobile order that is not a permutation of its columns")]
    MobileOrder { layout_id: String },
}

#[derive(Default)]
struct Validator {
    seen: HashSet<String>,
    violations: Vec<Violation>,
}

impl Validator {
    fn check_id(&mut self, id: &str) {
        if !self.seen.insert(id.to_string()) {
            self.violations.push(Violation::DuplicateId(id.to_string()));
        }
    }
}

impl Visitor for Validator {
    fn visit_section(&mut self, section: &Section) {
        self.check_id(&section.id);
        walk_section(self, section);
    }

    fn visit_layout(&mut self, layout: &Layout) {
        self.check_id(&layout.id);

        let count = layout.columns.len();
        if count == 0 || count > MAX_COLUMNS {
            self.violations.push(Violation::ColumnCount {
                layout_id: layout.id.clone(),
                count,
            });
        }

        let sum = layout.width_sum();
        if sum > 100 {
            self.violations.push(Violation::WidthSum {
                layout_id: layout.id.clone(),
                sum,
            });
        }

        if let Some(order) = &layout.mobile_order {
            let mut sorted = order.clone();
            sorted.sort_unstable();
            if sorted != (0..count).collect::<Vec<_>>() {
                self.violations.push(Violation::MobileOrder {
                    layout_id: layout.id.clone(),
                });
            }
        }

        walk_layout(self, layout);
    }

    fn visit_column(&mut self, column: &Column) {
        self.check_id(&column.id);
        if column.width > 100 {
            self.violations.push(Violation::WidthOutOfRange {
                column_id: column.id.clone(),
                width: column.width,
            });
        }
        for block in &column.blocks {
            self.visit_block(block);
        }
    }

    fn visit_block(&mut self, block: &BlockNode) {
        self.check_id(&block.id);
        if !block.is_container() && block.children.as_ref().is_some_and(|c| !c.is_empty()) {
            self.violations.push(Violation::UnexpectedChildren {
                block_id: block.id.clone(),
            });
        }
        walk_block(self, block);
    }
}

/// Report every structural problem in `doc`, in document order
pub fn validate(doc: &EmailDocument) -> Vec<Violation> {
    let mut validator = Validator::default();
    validator.check_id(&doc.id);
    validator.visit_document(doc);
    validator.violations
}

pub fn is_valid(doc: &EmailDocument) -> bool {
    validate(doc).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_document::BlockType;

    #[test]
    fn test_new_document_is_valid() {
        assert!(is_valid(&EmailDocument::new("Fresh")));
    }

    #[test]
    fn test_duplicate_block_id_reported() {
        let mut doc = EmailDocument::new("Dupes");
        let block = BlockNode::new(BlockType::Text);
        let column = &mut doc.sections[0].layouts[0].columns[0];
        column.blocks.push(block.clone());
        column.blocks.push(block.clone());

        assert_eq!(validate(&doc), vec![Violation::DuplicateId(block.id)]);
    }

    #[test]
    fn test_floor_division_sum_is_allowed() {
        let mut doc = EmailDocument::new("Thirds");
        let layout = &mut doc.sections[0].layouts[0];
        layout.columns.push(Column::new(0));
        layout.columns.push(Column::new(0));
        layout.redistribute_widths();

        assert!(is_valid(&doc));
    }

    #[test]
    fn test_width_problems_reported() {
        let mut doc = EmailDocument::new("Wide");
        let layout = &mut doc.sections[0].layouts[0];
        layout.columns[0].width = 120;
        let layout_id = layout.id.clone();
        let column_id = layout.columns[0].id.clone();

        let violations = validate(&doc);
        assert!(violations.contains(&Violation::WidthSum { layout_id, sum: 120 }));
        assert!(violations.contains(&Violation::WidthOutOfRange { column_id, width: 120 }));
    }

    #[test]
    fn test_column_count_reported() {
        let mut doc = EmailDocument::new("Empty row");
        doc.sections[0].layouts[0].columns.clear();
        let layout_id = doc.sections[0].layouts[0].id.clone();

        assert_eq!(validate(&doc), vec![Violation::ColumnCount { layout_id, count: 0 }]);
    }

    #[test]
    fn test_children_on_leaf_block() {
        let mut doc = EmailDocument::new("Leaf");
        let mut text = BlockNode::new(BlockType::Text);
        text.children = Some(vec![BlockNode::new(BlockType::Spacer)]);
        let block_id = text.id.clone();
        doc.sections[0].layouts[0].columns[0].blocks.push(text);

        assert_eq!(validate(&doc), vec![Violation::UnexpectedChildren { block_id }]);
    }

    #[test]
    fn test_mobile_order_must_be_permutation() {
        let mut doc = EmailDocument::new("Mobile");
        let layout = &mut doc.sections[0].layouts[0];
        layout.columns.push(Column::new(50));
        layout.columns[0].width = 50;
        layout.mobile_order = Some(vec![1, 0]);
        assert!(is_valid(&doc));

        doc.sections[0].layouts[0].mobile_order = Some(vec![0, 0]);
        assert_eq!(validate(&doc).len(), 1);
    }
}
