//! Symbolic shape expressions.
//!
//! A shape is an ordered sequence of [`PrimExpr`]s — a small arithmetic
//! sublanguage over integer literals and symbolic dimension variables.
//! Shape expressions are values, never `Expr` nodes in their own right;
//! they only ever appear embedded in `ExprKind::ShapeExpr` or in a
//! `MatchShape` binding's pattern.

use std::rc::Rc;

use crate::id::Id;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimExpr {
    Int(i64),
    Var(Id),
    Add(Rc<PrimExpr>, Rc<PrimExpr>),
    Sub(Rc<PrimExpr>, Rc<PrimExpr>),
    Mul(Rc<PrimExpr>, Rc<PrimExpr>),
}

impl PrimExpr {
    pub fn int(v: i64) -> Self {
        PrimExpr::Int(v)
    }

    pub fn var(id: Id) -> Self {
        PrimExpr::Var(id)
    }

    pub fn add(a: PrimExpr, b: PrimExpr) -> Self {
        PrimExpr::Add(Rc::new(a), Rc::new(b))
    }

    pub fn sub(a: PrimExpr, b: PrimExpr) -> Self {
        PrimExpr::Sub(Rc::new(a), Rc::new(b))
    }

    pub fn mul(a: PrimExpr, b: PrimExpr) -> Self {
        PrimExpr::Mul(Rc::new(a), Rc::new(b))
    }

    /// Structural (not proved-equal) comparison, used by the builder's
    /// cheap identity fast path before falling back to the equality oracle.
    pub fn structurally_equal(&self, other: &PrimExpr) -> bool {
        self == other
    }
}

impl std::fmt::Display for PrimExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimExpr::Int(v) => write!(f, "{v}"),
            PrimExpr::Var(id) => write!(f, "{id}"),
            PrimExpr::Add(a, b) => write!(f, "({a} + {b})"),
            PrimExpr::Sub(a, b) => write!(f, "({a} - {b})"),
            PrimExpr::Mul(a, b) => write!(f, "({a} * {b})"),
        }
    }
}
