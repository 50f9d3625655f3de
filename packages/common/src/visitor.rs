use mailcraft_document::{BlockNode, Column, EmailDocument, Layout, Section};

/// Visitor pattern for traversing the document tree immutably
///
/// Default implementations walk the entire tree, descending into container
/// children. Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &EmailDocument) {
        walk_document(self, doc);
    }

    fn visit_section(&mut self, section: &Section) {
        walk_section(self, section);
    }

    fn visit_layout(&mut self, layout: &Layout) {
        walk_layout(self, layout);
    }

    fn visit_column(&mut self, column: &Column) {
        walk_column(self, column);
    }

    fn visit_block(&mut self, block: &BlockNode) {
        walk_block(self, block);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &EmailDocument) {
    for section in &doc.sections {
        visitor.visit_section(section);
    }
}

pub fn walk_section<V: Visitor>(visitor: &mut V, section: &Section) {
    for layout in &section.layouts {
        visitor.visit_layout(layout);
    }
}

pub fn walk_layout<V: Visitor>(visitor: &mut V, layout: &Layout) {
    for column in &layout.columns {
        visitor.visit_column(column);
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column) {
    for block in &column.blocks {
        visitor.visit_block(block);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &BlockNode) {
    if let Some(children) = &block.children {
        for child in children {
            visitor.visit_block(child);
        }
    }
}

/// Collects every id in document order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl Visitor for IdCollector {
    fn visit_section(&mut self, section: &Section) {
        self.ids.push(section.id.clone());
        walk_section(self, section);
    }

    fn visit_layout(&mut self, layout: &Layout) {
        self.ids.push(layout.id.clone());
        walk_layout(self, layout);
    }

    fn visit_column(&mut self, column: &Column) {
        self.ids.push(column.id.clone());
        walk_column(self, column);
    }

    fn visit_block(&mut self, block: &BlockNode) {
        self.ids.push(block.id.clone());
        walk_block(self, block);
    }
}

/// Every section, layout, column and block id in the document
pub fn collect_ids(doc: &EmailDocument) -> Vec<String> {
    let mut collector = IdCollector::default();
    collector.visit_document(doc);
    collector.ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_document::BlockType;

    #[derive(Default)]
    struct BlockCounter {
        blocks: usize,
        containers: usize,
    }

    impl Visitor for BlockCounter {
        fn visit_block(&mut self, block: &BlockNode) {
            self.blocks += 1;
            if block.is_container() {
                self.containers += 1;
            }
            walk_block(self, block);
        }
    }

    #[test]
    fn test_walk_descends_into_children() {
        let mut doc = EmailDocument::new("Nested");
        let mut outer = BlockNode::new(BlockType::Container);
        let mut inner = BlockNode::new(BlockType::Container);
        inner.children = Some(vec![BlockNode::new(BlockType::Text)]);
        outer.children = Some(vec![inner, BlockNode::new(BlockType::Image)]);
        doc.sections[0].layouts[0].columns[0].blocks.push(outer);

        let mut counter = BlockCounter::default();
        counter.visit_document(&doc);

        assert_eq!(counter.blocks, 4);
        assert_eq!(counter.containers, 2);
    }

    #[test]
    fn test_collect_ids_in_document_order() {
        let doc = EmailDocument::new("Ids");
        let ids = collect_ids(&doc);

        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], doc.sections[0].id);
        assert_eq!(ids[1], doc.sections[0].layouts[0].id);
        assert_eq!(ids[2], doc.sections[0].layouts[0].columns[0].id);
    }
}
