//! # Schema Migration
//!
//! Normalizes persisted documents into the sectioned schema.
//!
//! Two shapes are accepted:
//! - **Current**: has a `sections` array. Returned as-is, so migrating twice
//!   is the same as migrating once.
//! - **Legacy**: a flat `content` array of blocks. Each top-level block gets
//!   its own layout holding one full-width column, all inside a single
//!   "Main Content" section, in the original order.
//!
//! Inputs are expected to come from this system's own stores or bundled
//! fixtures, so anything else only fails as a deserialization error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::ast::{
    BlockNode, Column, EmailDocument, GlobalStyles, Layout, Section, DEFAULT_FROM_EMAIL,
    DEFAULT_FROM_NAME, DEFAULT_REPLY_TO_EMAIL, DEFAULT_SECTION_NAME,
};
use crate::error::DocumentResult;
use crate::id_generator::{new_id, IdKind};

/// Pre-section document shape
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDocument {
    id: String,
    name: String,
    #[serde(default)]
    from_name: Option<String>,
    #[serde(default)]
    from_email: Option<String>,
    #[serde(default)]
    reply_to_email: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    preheader: Option<String>,
    #[serde(default)]
    content: Vec<BlockNode>,
    #[serde(default)]
    global_styles: Option<GlobalStyles>,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

/// True if `value` lacks a `sections` array and needs migrating
pub fn is_legacy(value: &Value) -> bool {
    !value.get("sections").is_some_and(Value::is_array)
}

/// Normalize a decoded document into the current schema
pub fn migrate(value: Value) -> DocumentResult<EmailDocument> {
    if !is_legacy(&value) {
        debug!("Document already sectioned, no migration needed");
        return Ok(serde_json::from_value(value)?);
    }

    let legacy: LegacyDocument = serde_json::from_value(value)?;
    debug!(
        document_id = %legacy.id,
        blocks = legacy.content.len(),
        "Migrating legacy flat-block document"
    );

    let layouts = legacy
        .content
        .into_iter()
        .map(|block| {
            Layout::with_columns(vec![Column {
                id: new_id(IdKind::Column),
                width: 100,
                blocks: vec![block],
            }])
        })
        .collect();

    let section = Section {
        id: new_id(IdKind::Section),
        name: Some(DEFAULT_SECTION_NAME.to_string()),
        layouts,
    };

    Ok(EmailDocument {
        id: legacy.id,
        name: legacy.name,
        from_name: legacy.from_name.or_else(|| Some(DEFAULT_FROM_NAME.to_string())),
        from_email: legacy.from_email.or_else(|| Some(DEFAULT_FROM_EMAIL.to_string())),
        reply_to_email: legacy
            .reply_to_email
            .or_else(|| Some(DEFAULT_REPLY_TO_EMAIL.to_string())),
        subject: legacy.subject.or_else(|| Some(String::new())),
        preheader: legacy.preheader.or_else(|| Some(String::new())),
        sections: vec![section],
        global_styles: legacy.global_styles.or_else(|| Some(GlobalStyles::default())),
        created: legacy.created,
        last_modified: legacy.last_modified,
    })
}

/// Parse JSON text and migrate it
pub fn migrate_str(source: &str) -> DocumentResult<EmailDocument> {
    migrate(serde_json::from_str(source)?)
}
