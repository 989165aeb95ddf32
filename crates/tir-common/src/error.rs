//! The fatal error taxonomy.
//!
//! Structural misuse of the IR (a dangling binding table lookup, a
//! dataflow-scope violation, `emit` with no open frame) is fatal and
//! returned through `Result<_, CoreError>`, propagated with `?`. Weaker
//! problems — an operator with no registered inference rule, a builder
//! dropped with a frame still open — are non-fatal and routed through
//! [`crate::DiagnosticContext`] instead; they never appear here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A traversal was asked to visit an absent expression.
    #[error("encountered a null node during traversal")]
    NullNode,

    /// No handler, nor a default, existed for this variant.
    #[error("unhandled expression variant: {variant}")]
    UnhandledVariant { variant: &'static str },

    /// `lookup_var` was called on an id with no recorded binding.
    #[error("unknown variable: {name}")]
    UnknownVar { name: String },

    /// `emit_match_shape` was given a value whose type is neither
    /// `DynTensorType` nor `ShapeType`.
    #[error("match_shape operand must be a tensor or shape value, found {found}")]
    BadMatchShapeOperand { found: String },

    /// `emit_output`/`emit_output_binding` was called outside a dataflow
    /// block.
    #[error("emit_output called outside a dataflow block")]
    OutputOutsideDataflow,

    /// A `DataflowVar` was defined outside a dataflow block, or an ordinary
    /// `Var` was used where a `DataflowVar` is required.
    #[error("dataflow scope violation: {reason}")]
    DataflowScopeViolation { reason: String },

    /// `emit`/`lookup_var`/`end_block` was called with no open block frame.
    #[error("operation requires an open block frame")]
    NoOpenFrame,
}
