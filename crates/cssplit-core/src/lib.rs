//! Delimiter-driven stylesheet splitting for cssplit.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A generated stylesheet can mark regions that belong in their own output
//! file with paired bang comments:
//!
//! ```text
//! .base { color: black }
//! /*! start:print.css */
//! @media print { .base { color: gray } }
//! /*! end:print.css */
//! ```
//!
//! Splitting walks the top-level rules once. Rules outside every region stay
//! in the document's own output; rules inside a region go to the region's
//! block. Regions nest. When the document has a source map, every block gets
//! a new map pointing each of its rules back to the original sources.
//!
//! The pieces, leaf first:
//! - [`delimiter`]: recognizing delimiter comments
//! - [`block`] and [`registry`]: output blocks and the stack of open blocks
//! - [`splitter`]: the walk itself
//! - [`serialize`] and [`naming`]: turning blocks into files
//! - [`document`]: the entry points, [`split_document`] and [`split_batch`]

pub mod block;
pub mod config;
pub mod delimiter;
pub mod document;
pub mod error;
pub mod naming;
pub mod registry;
pub mod serialize;
pub mod splitter;

pub use block::{Block, BlockId, MappingEntry};
pub use config::{ConfigError, SplitOptions};
pub use delimiter::{CommentClass, classify_comment};
pub use document::{Document, SplitOutcome, split_batch, split_document, split_document_with};
pub use error::SplitIssue;
pub use naming::{FilenameTemplate, HashDigest, HashOptions, content_hash};
pub use registry::{BlockRegistry, OpenBlock, ReopenPolicy};
pub use serialize::BlockOutput;
pub use splitter::{SplitRun, split_rules};
