//! Relax: a functional, ANF tensor-program IR.
//!
//! This crate re-exports the public surface of its constituent crates —
//! the AST and value types ([`tir_ir`]), the generic traversal framework
//! ([`tir_traversal`]), the ANF block builder ([`tir_builder`]), and the
//! scripting bridge adapter ([`tir_bridge`]) — alongside the ambient
//! diagnostics/error/logging layer ([`tir_common`]). Downstream crates
//! needing only one layer should depend on that sub-crate directly; this
//! crate is the one-stop entry point for consumers that want the whole
//! stack.

pub use tir_common::{CoreError, Diagnostic, DiagnosticCategory, DiagnosticContext, Span};

pub use tir_ir::{
    AttrValue, Attrs, Binding, BindingBlock, DType, Expr, ExprData, ExprKind, Id, Literal,
    MatchShapeBinding, PrimExpr, ScalarValue, Type, Var, VarBinding, expr_ptr_eq,
};

pub use tir_traversal::{ExprFunctor, ExprMutator, ExprVisitor, post_order_visit};

pub use tir_builder::{BlockBuilder, EmptyRegistry, NameTable, NormalizingMutator, OperatorRegistry, ShapeEqualityOracle};

pub use tir_bridge::{HOOK_NAMES, HookArg, HookCallback, HostBridge};
