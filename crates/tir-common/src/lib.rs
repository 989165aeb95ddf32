//! Common types shared across the Relax IR crates.
//!
//! This crate provides the ambient layer every other crate builds on:
//! - Source spans (`Span`)
//! - The core error taxonomy (`CoreError`)
//! - A minimal diagnostic context for non-fatal issues
//! - Centralized limits/thresholds

pub mod diagnostics;
pub mod error;
pub mod limits;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticContext};
pub use error::CoreError;
pub use span::Span;
