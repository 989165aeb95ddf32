//! External collaborators the builder consumes but does not implement:
//! per-operator shape/type inference, and a symbolic shape-equality
//! oracle.

use tir_common::DiagnosticContext;
use tir_ir::{Expr, PrimExpr, Type};

/// Per-operator shape/type inference, keyed by the call's `Op`.
///
/// Absence of a registered entry for an operator is not an error — both
/// methods simply report "unknown" (`None` / `Type::OpaqueType`).
/// Implementors that detect an actual problem while computing an answer
/// should report it through `diag` rather than panicking.
pub trait OperatorRegistry {
    fn infer_shape(&self, call: &Expr, diag: &DiagnosticContext) -> Option<Expr>;
    fn infer_type(&self, call: &Expr, diag: &DiagnosticContext) -> Type;
}

/// Proves equality between symbolic shape dimensions.
///
/// Must be sound: `true` implies the two expressions are mathematically
/// equal for all values of their free variables; `false` means "unknown",
/// never "known unequal".
pub trait ShapeEqualityOracle {
    fn can_prove_equal(&self, a: &PrimExpr, b: &PrimExpr) -> bool;
}

/// A registry with no entries and an oracle that never proves anything —
/// useful for tests and for embedding contexts that haven't wired in a
/// real operator registry yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRegistry;

impl OperatorRegistry for EmptyRegistry {
    fn infer_shape(&self, _call: &Expr, _diag: &DiagnosticContext) -> Option<Expr> {
        None
    }

    fn infer_type(&self, _call: &Expr, _diag: &DiagnosticContext) -> Type {
        Type::OpaqueType
    }
}

impl ShapeEqualityOracle for EmptyRegistry {
    fn can_prove_equal(&self, _a: &PrimExpr, _b: &PrimExpr) -> bool {
        false
    }
}
