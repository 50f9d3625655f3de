use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Process-wide sequence; keeps ids distinct when several are made in one millisecond
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// What kind of node an id is minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Document,
    Section,
    Layout,
    Column,
    Block,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Document => "doc",
            IdKind::Section => "section",
            IdKind::Layout => "layout",
            IdKind::Column => "column",
            IdKind::Block => "block",
        }
    }
}

/// Generate a fresh id: `{prefix}-{millis}-{sequence}-{random}`
pub fn new_id(kind: IdKind) -> String {
    let millis = Utc::now().timestamp_millis();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let suffix: u16 = rand::random();
    format!("{}-{}-{}-{:04x}", kind.prefix(), millis, sequence, suffix)
}
