//! # Mailcraft Document
//!
//! Canonical email template tree:
//!
//! ```text
//! EmailDocument
//!   └─ Section*
//!        └─ Layout*        (one row, 1-3 columns)
//!             └─ Column*   (percentage width)
//!                  └─ BlockNode*  (containers nest further blocks)
//! ```
//!
//! Legacy flat-block documents are normalized by [`migrate`].

pub mod ast;
pub mod blocks;
pub mod error;
pub mod id_generator;
pub mod migrate;

pub use ast::{BlockNode, Column, EmailDocument, GlobalStyles, Layout, Section};
pub use blocks::{BlockType, Props};
pub use error::{DocumentError, DocumentResult};
pub use id_generator::{new_id, IdKind};
pub use migrate::{is_legacy, migrate, migrate_str};
