//! Non-fatal diagnostics.
//!
//! Structural misuse of the IR is fatal and returned as a [`crate::CoreError`].
//! Everything softer — an operator with no registered inference rule, a
//! builder dropped with an open frame — is recorded here instead so the
//! caller can keep going and inspect what happened afterward.

use std::cell::RefCell;

use crate::span::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(category: DiagnosticCategory, message: impl Into<String>) -> Self {
        Diagnostic {
            category,
            message: message.into(),
            span: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Warning, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// Accumulates [`Diagnostic`]s produced while building or normalizing IR.
///
/// This is the minimal concrete realization of the "diagnostic context"
/// external interface: a real embedding compiler may forward `emit` into its
/// own reporting pipeline, but the core only needs somewhere to put
/// non-fatal observations so callers can inspect them afterward.
#[derive(Debug, Default)]
pub struct DiagnosticContext {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and continue.
    pub fn emit(&self, diagnostic: Diagnostic) {
        tracing::warn!(message = %diagnostic.message, "diagnostic emitted");
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Record a diagnostic alongside the fatal error the caller is about to
    /// propagate with `?`. Returns `err` unchanged so this can be used as
    /// `return Err(diag.emit_fatal(..., CoreError::X))`.
    pub fn emit_fatal<E>(&self, diagnostic: Diagnostic, err: E) -> E {
        tracing::error!(message = %diagnostic.message, "fatal diagnostic emitted");
        self.diagnostics.borrow_mut().push(diagnostic);
        err
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
