//! Rule-level stylesheet scanning for cssplit.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Splitting a stylesheet only needs to know where each top-level rule
//! starts and ends and which rules are comments. This crate provides that
//! rule stream behind the [`StylesheetParser`] trait, with [`CssParser`] as
//! the built-in implementation.

mod error;
mod parser;
mod rule;

pub use error::ParseDiagnostic;
pub use parser::{CssParser, ParseOutput, StylesheetParser, parse_stylesheet};
pub use rule::{Rule, RuleKind, Stylesheet};
