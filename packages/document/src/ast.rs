use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blocks::{BlockType, Props};
use crate::id_generator::{new_id, IdKind};

/// Name given to the section every new or migrated document starts with
pub const DEFAULT_SECTION_NAME: &str = "Main Content";

pub const DEFAULT_FROM_NAME: &str = "Your Name";
pub const DEFAULT_FROM_EMAIL: &str = "you@example.com";
pub const DEFAULT_REPLY_TO_EMAIL: &str = "you@example.com";

/// Maximum number of side-by-side columns in one layout
pub const MAX_COLUMNS: usize = 3;

/// Root document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDocument {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_styles: Option<GlobalStyles>,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Named top-level grouping of layouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub layouts: Vec<Layout>,
}

/// One horizontal row of columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: String,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Reserved for conditional content, currently inert
    #[serde(default)]
    pub is_dynamic: bool,
    /// Column indices in the order they stack on narrow screens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_order: Option<Vec<usize>>,
}

/// Percentage-width vertical slot holding blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub width: u32,
    pub blocks: Vec<BlockNode>,
}

/// A content unit. Only containers carry children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BlockNode>>,
}

/// Document-wide style overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_color: Option<String>,
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            body_background_color: Some("#f4f4f4".to_string()),
            font_family: Some("Arial, sans-serif".to_string()),
            font_size: Some("16px".to_string()),
            text_color: Some("#333333".to_string()),
            link_color: Some("#0066cc".to_string()),
            heading_color: Some("#111111".to_string()),
        }
    }
}

impl GlobalStyles {
    /// Styles with every field unset
    pub fn empty() -> Self {
        Self {
            body_background_color: None,
            font_family: None,
            font_size: None,
            text_color: None,
            link_color: None,
            heading_color: None,
        }
    }

    /// Overlay every field set in `other` onto `self`
    pub fn merge(&mut self, other: &GlobalStyles) {
        fn overlay(target: &mut Option<String>, source: &Option<String>) {
            if source.is_some() {
                target.clone_from(source);
            }
        }

        overlay(&mut self.body_background_color, &other.body_background_color);
        overlay(&mut self.font_family, &other.font_family);
        overlay(&mut self.font_size, &other.font_size);
        overlay(&mut self.text_color, &other.text_color);
        overlay(&mut self.link_color, &other.link_color);
        overlay(&mut self.heading_color, &other.heading_color);
    }
}

impl EmailDocument {
    /// Create an empty document: one section, one layout, one full-width column
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_at(name, Utc::now())
    }

    pub fn new_at(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(IdKind::Document),
            name: name.into(),
            from_name: Some(DEFAULT_FROM_NAME.to_string()),
            from_email: Some(DEFAULT_FROM_EMAIL.to_string()),
            reply_to_email: Some(DEFAULT_REPLY_TO_EMAIL.to_string()),
            subject: Some(String::new()),
            preheader: Some(String::new()),
            sections: vec![Section::new(Some(DEFAULT_SECTION_NAME.to_string()))],
            global_styles: Some(GlobalStyles::default()),
            created: now,
            last_modified: now,
        }
    }

    /// Refresh `last_modified`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    /// Number of content blocks, container children included
    pub fn block_count(&self) -> usize {
        fn count(blocks: &[BlockNode]) -> usize {
            blocks
                .iter()
                .map(|b| 1 + b.children.as_deref().map_or(0, count))
                .sum()
        }

        self.sections
            .iter()
            .flat_map(|s| &s.layouts)
            .flat_map(|l| &l.columns)
            .map(|c| count(&c.blocks))
            .sum()
    }

    /// Serialize to the persisted JSON shape
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Section {
    /// New section holding one layout with a single full-width column
    pub fn new(name: Option<String>) -> Self {
        Self {
            id: new_id(IdKind::Section),
            name,
            layouts: vec![Layout::new()],
        }
    }

    /// Deep copy with fresh ids at every level
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(IdKind::Section),
            name: self.name.clone(),
            layouts: self.layouts.iter().map(Layout::duplicate).collect(),
        }
    }
}

impl Layout {
    /// New layout with one empty full-width column
    pub fn new() -> Self {
        Self::with_columns(vec![Column::new(100)])
    }

    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self {
            id: new_id(IdKind::Layout),
            columns,
            background_color: None,
            is_dynamic: false,
            mobile_order: None,
        }
    }

    /// Deep copy with fresh ids for the layout, its columns and their blocks
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(IdKind::Layout),
            columns: self.columns.iter().map(Column::duplicate).collect(),
            background_color: self.background_color.clone(),
            is_dynamic: self.is_dynamic,
            mobile_order: self.mobile_order.clone(),
        }
    }

    /// Give every column `floor(100 / n)` percent.
    ///
    /// The integer remainder is dropped, so three columns sum to 99.
    pub fn redistribute_widths(&mut self) {
        if self.columns.is_empty() {
            return;
        }
        let width = even_width(self.columns.len());
        for column in &mut self.columns {
            column.width = width;
        }
    }

    pub fn width_sum(&self) -> u32 {
        self.columns.iter().map(|c| c.width).sum()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

/// Width each of `count` evenly sized columns receives
pub fn even_width(count: usize) -> u32 {
    match u32::try_from(count) {
        Ok(0) | Err(_) => 0,
        Ok(n) => 100 / n,
    }
}

impl Column {
    pub fn new(width: u32) -> Self {
        Self {
            id: new_id(IdKind::Column),
            width,
            blocks: Vec::new(),
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(IdKind::Column),
            width: self.width,
            blocks: self.blocks.iter().map(BlockNode::duplicate).collect(),
        }
    }
}

impl BlockNode {
    /// New block of `block_type` with its default props
    pub fn new(block_type: BlockType) -> Self {
        Self {
            id: new_id(IdKind::Block),
            block_type,
            props: block_type.default_props(),
            children: block_type.is_container().then(Vec::new),
        }
    }

    /// Deep copy; the copy and every nested child get fresh ids
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(IdKind::Block),
            block_type: self.block_type,
            props: self.props.clone(),
            children: self
                .children
                .as_ref()
                .map(|children| children.iter().map(BlockNode::duplicate).collect()),
        }
    }

    /// Shallow-merge `patch` into the existing props
    pub fn merge_props(&mut self, patch: &Props) {
        for (key, value) in patch {
            self.props.insert(key.clone(), value.clone());
        }
    }

    pub fn is_container(&self) -> bool {
        self.block_type.is_container()
    }
}
