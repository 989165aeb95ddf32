//! The generic traversal functor.
//!
//! `ExprFunctor<A, R>` is the shared dispatch mechanism underlying every
//! traversal in this crate: a client picks a return type `R` and an extra
//! argument type `A`, implements whichever per-variant hooks it cares
//! about, and gets a single exhaustive `visit` entry point for free. In a
//! statically typed closed sum, a `match` on the variant tag already is
//! the "compile-time-exhaustive node switch" — there's no separate
//! dispatch table to build or keep in sync, and the compiler's
//! exhaustiveness check on `visit`'s match enforces that every current
//! `ExprKind` variant routes somewhere.
//!
//! `ExprFunctor`'s own hook defaults do *not* recurse into children — they
//! fall through to [`ExprFunctor::visit_default`], which fails with
//! `UnhandledVariant`. Structural recursion is provided by the
//! [`crate::visitor::ExprVisitor`] and [`crate::mutator::ExprMutator`]
//! traits, which are defined independently rather than as a blanket impl
//! over this trait (Rust has no template specialization, so a blanket
//! `impl<A, T: ExprFunctor<A, ()>> ExprVisitor for T` could not be
//! overridden the way a single concrete visitor needs to be).

use tir_common::CoreError;
use tir_ir::{Attrs, Expr, ExprKind, Id, Literal, PrimExpr, Type, Var};

pub trait ExprFunctor<A, R> {
    /// Entry point: dispatch on `expr`'s variant. `None` is a `NullNode`.
    fn visit(&mut self, expr: Option<&Expr>, arg: A) -> Result<R, CoreError> {
        let expr = expr.ok_or(CoreError::NullNode)?;
        match &expr.kind {
            ExprKind::Constant(lit) => self.visit_constant(expr, lit, arg),
            ExprKind::Tuple(fields) => self.visit_tuple(expr, fields, arg),
            ExprKind::TupleGetItem { tuple, index } => {
                self.visit_tuple_get_item(expr, tuple, *index, arg)
            }
            ExprKind::Var(id) => self.visit_var(expr, id, arg),
            ExprKind::DataflowVar(id) => self.visit_dataflow_var(expr, id, arg),
            ExprKind::GlobalVar(id) => self.visit_global_var(expr, id, arg),
            ExprKind::ExternFunc(symbol) => self.visit_extern_func(expr, symbol, arg),
            ExprKind::ShapeExpr(dims) => self.visit_shape_expr(expr, dims, arg),
            ExprKind::RuntimeDepShape => self.visit_runtime_dep_shape(expr, arg),
            ExprKind::Op(key) => self.visit_op(expr, key, arg),
            ExprKind::Call {
                callee,
                args,
                attrs,
                type_args,
            } => self.visit_call(expr, callee, args, attrs, type_args, arg),
            ExprKind::SeqExpr { blocks, body } => self.visit_seq_expr(expr, blocks, body, arg),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.visit_if(expr, cond, then_branch, else_branch, arg),
            ExprKind::Function {
                params,
                body,
                ret_type,
                attrs,
            } => self.visit_function(expr, params, body, ret_type, attrs, arg),
        }
    }

    fn visit_constant(&mut self, expr: &Expr, _lit: &Literal, arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_tuple(&mut self, expr: &Expr, _fields: &[Expr], arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_tuple_get_item(
        &mut self,
        expr: &Expr,
        _tuple: &Expr,
        _index: usize,
        arg: A,
    ) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_var(&mut self, expr: &Expr, _id: &Id, arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_dataflow_var(&mut self, expr: &Expr, _id: &Id, arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_global_var(&mut self, expr: &Expr, _id: &Id, arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_extern_func(&mut self, expr: &Expr, _symbol: &str, arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_shape_expr(&mut self, expr: &Expr, _dims: &[PrimExpr], arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_runtime_dep_shape(&mut self, expr: &Expr, arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_op(&mut self, expr: &Expr, _key: &str, arg: A) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_call(
        &mut self,
        expr: &Expr,
        _callee: &Expr,
        _args: &[Expr],
        _attrs: &Attrs,
        _type_args: &[Type],
        arg: A,
    ) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_seq_expr(
        &mut self,
        expr: &Expr,
        _blocks: &[tir_ir::BindingBlock],
        _body: &Expr,
        arg: A,
    ) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_if(
        &mut self,
        expr: &Expr,
        _cond: &Expr,
        _then_branch: &Expr,
        _else_branch: &Expr,
        arg: A,
    ) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    fn visit_function(
        &mut self,
        expr: &Expr,
        _params: &[Var],
        _body: &Expr,
        _ret_type: &Option<Type>,
        _attrs: &Attrs,
        arg: A,
    ) -> Result<R, CoreError> {
        self.visit_default(expr, arg)
    }

    /// Catch-all: a variant with no specific override and no structural
    /// default falls here. Fails with `UnhandledVariant` by default.
    fn visit_default(&mut self, expr: &Expr, _arg: A) -> Result<R, CoreError> {
        Err(CoreError::UnhandledVariant {
            variant: expr.kind.variant_name(),
        })
    }
}
