//! Error reporting and diagnostic messages for cssplit.
//!
//! This crate provides a structured approach to error reporting, inspired by:
//! - **ariadne**: Visual compiler-quality error messages with source context
//! - **Tidyverse style guide**: Best practices for error message content
//!
//! - [`DiagnosticMessage`]: The main error message structure
//! - [`DetailItem`]: Individual detail bullets with error/info kinds
//! - [`DiagnosticKind`]: Error or Warning
//! - [`catalog`]: Stable error codes and their metadata
//!
//! # Example
//!
//! ```
//! use cssplit_error_reporting::{DiagnosticMessage, SourceLocation};
//!
//! let error = DiagnosticMessage::error("Unclosed block")
//!     .with_code("CS-2-2")
//!     .with_problem("`a.css` was opened but never closed")
//!     .with_location(SourceLocation::new("main.css", 0..18))
//!     .add_hint("Did you forget `/*! end:a.css */`?");
//!
//! assert!(error.to_text(None).starts_with("Error [CS-2-2]: Unclosed block"));
//! ```

pub mod catalog;
pub mod diagnostic;

// Re-export main types for convenience
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, SourceLocation};
