//! Value types of the Relax functional tensor-program IR: identifiers,
//! shapes, types, literals, attribute bags, and the expression AST itself.

pub mod attrs;
pub mod expr;
pub mod id;
pub mod literal;
pub mod shape;
pub mod ty;

pub use attrs::{AttrValue, Attrs};
pub use expr::{
    Binding, BindingBlock, Expr, ExprData, ExprKind, MatchShapeBinding, Var, VarBinding,
    expr_ptr_eq,
};
pub use id::Id;
pub use literal::{Literal, ScalarValue};
pub use shape::PrimExpr;
pub use ty::{DType, Type};

#[cfg(test)]
mod tests;
