//! Id-based search over the document tree.
//!
//! Blocks live in *block lists*: a column's `blocks` or a container's
//! `children`. Every lookup goes through [`try_for_each_block_list`] or its
//! mutable twin, so nothing forgets to descend into containers. Callbacks
//! return [`ControlFlow::Break`] with a result to stop the walk.

use std::ops::ControlFlow;

use mailcraft_document::{BlockNode, Column, EmailDocument, Layout};

/// Depth-first walk over every block list, column lists first, then children
pub fn try_for_each_block_list<'a, B, F>(doc: &'a EmailDocument, mut f: F) -> Option<B>
where
    F: FnMut(&'a [BlockNode]) -> ControlFlow<B>,
{
    for column in doc
        .sections
        .iter()
        .flat_map(|s| &s.layouts)
        .flat_map(|l| &l.columns)
    {
        if let ControlFlow::Break(found) = walk_list(&column.blocks, &mut f) {
            return Some(found);
        }
    }
    None
}

fn walk_list<'a, B, F>(blocks: &'a [BlockNode], f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&'a [BlockNode]) -> ControlFlow<B>,
{
    f(blocks)?;
    for block in blocks {
        if let Some(children) = &block.children {
            walk_list(children, f)?;
        }
    }
    ControlFlow::Continue(())
}

/// Mutable variant of [`try_for_each_block_list`].
///
/// A callback that edits the list must break; the walk does not revisit it.
pub fn try_for_each_block_list_mut<B, F>(doc: &mut EmailDocument, mut f: F) -> Option<B>
where
    F: FnMut(&mut Vec<BlockNode>) -> ControlFlow<B>,
{
    for column in doc
        .sections
        .iter_mut()
        .flat_map(|s| s.layouts.iter_mut())
        .flat_map(|l| l.columns.iter_mut())
    {
        if let ControlFlow::Break(found) = walk_list_mut(&mut column.blocks, &mut f) {
            return Some(found);
        }
    }
    None
}

fn walk_list_mut<B, F>(blocks: &mut Vec<BlockNode>, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&mut Vec<BlockNode>) -> ControlFlow<B>,
{
    f(blocks)?;
    for block in blocks.iter_mut() {
        if let Some(children) = block.children.as_mut() {
            walk_list_mut(children, f)?;
        }
    }
    ControlFlow::Continue(())
}

/// Run `f` on every block, container children included
pub fn try_for_each_block_mut<B, F>(doc: &mut EmailDocument, mut f: F) -> Option<B>
where
    F: FnMut(&mut BlockNode) -> ControlFlow<B>,
{
    try_for_each_block_list_mut(doc, |list| {
        for block in list.iter_mut() {
            f(block)?;
        }
        ControlFlow::Continue(())
    })
}

/// Apply `f` to the block with `block_id`; `None` if it does not exist
pub fn with_block_mut<R>(
    doc: &mut EmailDocument,
    block_id: &str,
    f: impl FnOnce(&mut BlockNode) -> R,
) -> Option<R> {
    let mut f = Some(f);
    try_for_each_block_mut(doc, |block| {
        if block.id == block_id {
            if let Some(f) = f.take() {
                return ControlFlow::Break(f(block));
            }
        }
        ControlFlow::Continue(())
    })
}

/// Apply `f` to the list holding `block_id`, passing the block's index
pub fn with_parent_list_mut<R>(
    doc: &mut EmailDocument,
    block_id: &str,
    f: impl FnOnce(&mut Vec<BlockNode>, usize) -> R,
) -> Option<R> {
    let mut f = Some(f);
    try_for_each_block_list_mut(doc, |list| {
        if let Some(index) = list.iter().position(|b| b.id == block_id) {
            if let Some(f) = f.take() {
                return ControlFlow::Break(f(list, index));
            }
        }
        ControlFlow::Continue(())
    })
}

pub fn find_block<'a>(doc: &'a EmailDocument, block_id: &str) -> Option<&'a BlockNode> {
    try_for_each_block_list(doc, |list| match list.iter().find(|b| b.id == block_id) {
        Some(block) => ControlFlow::Break(block),
        None => ControlFlow::Continue(()),
    })
}

pub fn contains_block(doc: &EmailDocument, block_id: &str) -> bool {
    find_block(doc, block_id).is_some()
}

pub fn find_layout<'a>(doc: &'a EmailDocument, layout_id: &str) -> Option<&'a Layout> {
    doc.sections
        .iter()
        .flat_map(|s| &s.layouts)
        .find(|l| l.id == layout_id)
}

pub fn find_layout_mut<'a>(doc: &'a mut EmailDocument, layout_id: &str) -> Option<&'a mut Layout> {
    doc.sections
        .iter_mut()
        .flat_map(|s| s.layouts.iter_mut())
        .find(|l| l.id == layout_id)
}

pub fn find_column<'a>(doc: &'a EmailDocument, column_id: &str) -> Option<&'a Column> {
    doc.sections
        .iter()
        .flat_map(|s| &s.layouts)
        .flat_map(|l| &l.columns)
        .find(|c| c.id == column_id)
}

pub fn find_column_mut<'a>(doc: &'a mut EmailDocument, column_id: &str) -> Option<&'a mut Column> {
    doc.sections
        .iter_mut()
        .flat_map(|s| s.layouts.iter_mut())
        .flat_map(|l| l.columns.iter_mut())
        .find(|c| c.id == column_id)
}

/// Last column of the last layout of the last section, if any
pub fn last_column_mut(doc: &mut EmailDocument) -> Option<&mut Column> {
    doc.sections
        .last_mut()
        .and_then(|s| s.layouts.last_mut())
        .and_then(|l| l.columns.last_mut())
}
