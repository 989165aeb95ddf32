//! The expression AST.
//!
//! `Expr` is a reference-counted, structurally shared, immutable node plus
//! two publish-once metadata slots (`checked_type`, `shape`) populated by
//! inference. The slots are interior-mutable (`RefCell`) rather than
//! rebuild-on-stamp, per the design's explicit either/or allowance — see
//! the crate-level design ledger for the tradeoff.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use tir_common::Span;

use crate::attrs::Attrs;
use crate::id::Id;
use crate::literal::Literal;
use crate::shape::PrimExpr;
use crate::ty::Type;

pub type Expr = Rc<ExprData>;

#[derive(Debug)]
pub struct ExprData {
    pub kind: ExprKind,
    span: Option<Span>,
    checked_type: RefCell<Option<Type>>,
    shape: RefCell<Option<Expr>>,
}

#[derive(Debug)]
pub enum ExprKind {
    Constant(Literal),
    Tuple(SmallVec<[Expr; 4]>),
    TupleGetItem { tuple: Expr, index: usize },
    Var(Id),
    DataflowVar(Id),
    GlobalVar(Id),
    ExternFunc(String),
    ShapeExpr(Vec<PrimExpr>),
    RuntimeDepShape,
    Op(String),
    Call {
        callee: Expr,
        args: SmallVec<[Expr; 4]>,
        attrs: Attrs,
        type_args: Vec<Type>,
    },
    SeqExpr {
        blocks: Vec<BindingBlock>,
        body: Expr,
    },
    If {
        cond: Expr,
        then_branch: Expr,
        else_branch: Expr,
    },
    Function {
        params: Vec<Var>,
        body: Expr,
        ret_type: Option<Type>,
        attrs: Attrs,
    },
}

impl ExprKind {
    /// Name of the variant, used in `CoreError::UnhandledVariant`.
    pub const fn variant_name(&self) -> &'static str {
        match self {
            ExprKind::Constant(_) => "Constant",
            ExprKind::Tuple(_) => "Tuple",
            ExprKind::TupleGetItem { .. } => "TupleGetItem",
            ExprKind::Var(_) => "Var",
            ExprKind::DataflowVar(_) => "DataflowVar",
            ExprKind::GlobalVar(_) => "GlobalVar",
            ExprKind::ExternFunc(_) => "ExternFunc",
            ExprKind::ShapeExpr(_) => "ShapeExpr",
            ExprKind::RuntimeDepShape => "RuntimeDepShape",
            ExprKind::Op(_) => "Op",
            ExprKind::Call { .. } => "Call",
            ExprKind::SeqExpr { .. } => "SeqExpr",
            ExprKind::If { .. } => "If",
            ExprKind::Function { .. } => "Function",
        }
    }
}

impl ExprData {
    pub fn new(kind: ExprKind) -> Expr {
        Rc::new(ExprData {
            kind,
            span: None,
            checked_type: RefCell::new(None),
            shape: RefCell::new(None),
        })
    }

    pub fn with_span(kind: ExprKind, span: Span) -> Expr {
        Rc::new(ExprData {
            kind,
            span: Some(span),
            checked_type: RefCell::new(None),
            shape: RefCell::new(None),
        })
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn checked_type(&self) -> Option<Type> {
        self.checked_type.borrow().clone()
    }

    /// Publish-once: stamps the slot if empty, otherwise overwrites it —
    /// inference is deterministic, so a re-stamp is always with an equal
    /// value in practice.
    pub fn set_checked_type(&self, ty: Type) {
        *self.checked_type.borrow_mut() = Some(ty);
    }

    pub fn shape(&self) -> Option<Expr> {
        self.shape.borrow().clone()
    }

    pub fn set_shape(&self, shape: Expr) {
        *self.shape.borrow_mut() = Some(shape);
    }
}

/// Reference-identity equality, the core's primary equality notion for
/// traversal/build invariants (e.g. "no child changed" in the mutator's
/// default hooks).
pub fn expr_ptr_eq(a: &Expr, b: &Expr) -> bool {
    Rc::ptr_eq(a, b)
}

/// A binding-site variable: an `Expr` statically known to be
/// `ExprKind::Var` or `ExprKind::DataflowVar`.
///
/// Kept as a thin wrapper rather than a separate node type so that a `Var`
/// can be used anywhere an `Expr` is expected (function bodies reference
/// their params as ordinary use-site `Var` expressions) without a
/// conversion step.
#[derive(Clone, Debug)]
pub struct Var(Expr);

impl Var {
    pub fn new(id: Id) -> Self {
        Var(ExprData::new(ExprKind::Var(id)))
    }

    pub fn new_dataflow(id: Id) -> Self {
        Var(ExprData::new(ExprKind::DataflowVar(id)))
    }

    /// Wrap an existing expression known to be a `Var`/`DataflowVar` node.
    /// Panics (in debug builds only) if `expr` is some other variant.
    pub fn from_expr(expr: Expr) -> Self {
        debug_assert!(matches!(
            expr.kind,
            ExprKind::Var(_) | ExprKind::DataflowVar(_)
        ));
        Var(expr)
    }

    pub fn id(&self) -> &Id {
        match &self.0.kind {
            ExprKind::Var(id) | ExprKind::DataflowVar(id) => id,
            _ => unreachable!("Var always wraps Var/DataflowVar"),
        }
    }

    pub fn is_dataflow(&self) -> bool {
        matches!(self.0.kind, ExprKind::DataflowVar(_))
    }

    pub fn as_expr(&self) -> &Expr {
        &self.0
    }

    pub fn into_expr(self) -> Expr {
        self.0
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        expr_ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug)]
pub struct VarBinding {
    pub var: Var,
    pub value: Expr,
}

#[derive(Clone, Debug)]
pub struct MatchShapeBinding {
    pub value: Expr,
    pub pattern: Vec<PrimExpr>,
    pub var: Option<Var>,
}

#[derive(Clone, Debug)]
pub enum Binding {
    VarBinding(VarBinding),
    MatchShape(MatchShapeBinding),
}

impl Binding {
    pub fn bound_var(&self) -> Option<&Var> {
        match self {
            Binding::VarBinding(b) => Some(&b.var),
            Binding::MatchShape(b) => b.var.as_ref(),
        }
    }
}

/// A straight-line sequence of bindings. `is_dataflow` distinguishes a
/// `DataflowBlock` (all bindings pure, `DataflowVar`s confined here) from
/// an ordinary `BindingBlock`.
#[derive(Clone, Debug)]
pub struct BindingBlock {
    pub bindings: Vec<Binding>,
    is_dataflow: bool,
}

impl BindingBlock {
    pub fn binding(bindings: Vec<Binding>) -> Self {
        BindingBlock {
            bindings,
            is_dataflow: false,
        }
    }

    pub fn dataflow(bindings: Vec<Binding>) -> Self {
        BindingBlock {
            bindings,
            is_dataflow: true,
        }
    }

    pub fn is_dataflow(&self) -> bool {
        self.is_dataflow
    }
}
