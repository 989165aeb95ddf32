//! Read-only structural traversal.
//!
//! `ExprVisitor` is a concrete specialization of the traversal idea with
//! signature `Result<(), CoreError>`. It is defined as its own trait with
//! its own default hooks, rather than derived from
//! [`crate::functor::ExprFunctor`] via a blanket impl, because Rust has no
//! template specialization: a blanket `impl<T: ExprFunctor<(), ()>>
//! ExprVisitor for T` could not be selectively overridden by a single
//! concrete visitor the way this trait's own default methods can.
//!
//! Every `Expr` variant gets its own named hook (`visit_call_`,
//! `visit_tuple_`, ...), each defaulting to a structural recursion that
//! visits children in source order. Binding and block dispatch follow the
//! same "general hook delegates to a specific default" shape:
//! `visit_binding` dispatches to `visit_var_binding_`/`visit_match_shape_`,
//! `visit_binding_block` to `visit_binding_block_`/`visit_dataflow_block_`,
//! and `visit_var_def` to `visit_var_def_`/`visit_dataflow_var_def_`. This
//! fine granularity is what lets [`tir_bridge`]'s scripting adapter
//! override exactly one hook and fall through to the rest unmodified.
//!
//! `Var`/`DataflowVar` *use* sites are visited through `visit_var_`/
//! `visit_dataflow_var_`; binding *definition* sites go through the
//! distinct `visit_var_def`/`visit_var_def_`/`visit_dataflow_var_def_`
//! family. Keeping that split is load-bearing for anything that needs to
//! tell "this is where `x` is bound" apart from "this is a use of `x`".

use tir_common::{CoreError, Span};
use tir_ir::{
    Attrs, Binding, BindingBlock, Expr, ExprKind, Id, Literal, MatchShapeBinding, PrimExpr, Type,
    Var, VarBinding,
};

pub trait ExprVisitor {
    /// Entry point: dispatch on `expr`'s variant to its named hook.
    fn visit_expr(&mut self, expr: Option<&Expr>) -> Result<(), CoreError> {
        let node = expr.ok_or(CoreError::NullNode)?;
        self.visit_type(&node.checked_type());
        if let Some(span) = node.span() {
            self.visit_span(span);
        }
        match &node.kind {
            ExprKind::Constant(lit) => self.visit_constant_(node, lit),
            ExprKind::Tuple(fields) => self.visit_tuple_(node, fields),
            ExprKind::TupleGetItem { tuple, index } => {
                self.visit_tuple_getitem_(node, tuple, *index)
            }
            ExprKind::Var(id) => self.visit_var_(node, id),
            ExprKind::DataflowVar(id) => self.visit_dataflow_var_(node, id),
            ExprKind::GlobalVar(id) => self.visit_global_var_(node, id),
            ExprKind::ExternFunc(symbol) => self.visit_extern_func_(node, symbol),
            ExprKind::ShapeExpr(dims) => self.visit_shape_expr_(node, dims),
            ExprKind::RuntimeDepShape => self.visit_runtime_dep_shape_(node),
            ExprKind::Op(key) => self.visit_op_(node, key),
            ExprKind::Call {
                callee,
                args,
                attrs,
                type_args,
            } => self.visit_call_(node, callee, args, attrs, type_args),
            ExprKind::SeqExpr { blocks, body } => self.visit_seq_expr_(node, blocks, body),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.visit_if_(node, cond, then_branch, else_branch),
            ExprKind::Function {
                params,
                body,
                ret_type,
                attrs,
            } => self.visit_function_(node, params, body, ret_type, attrs),
        }
    }

    /// Hook for the node's annotated type. No-op by default.
    fn visit_type(&mut self, _ty: &Option<Type>) {}

    /// Hook for the node's source span. No-op by default.
    fn visit_span(&mut self, _span: Span) {}

    /// Hook for a dimension inside a `ShapeExpr`/`MatchShape` pattern.
    /// No-op by default.
    fn visit_prim_expr(&mut self, _dim: &PrimExpr) {}

    fn visit_constant_(&mut self, _node: &Expr, _lit: &Literal) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_tuple_(&mut self, _node: &Expr, fields: &[Expr]) -> Result<(), CoreError> {
        for f in fields {
            self.visit_expr(Some(f))?;
        }
        Ok(())
    }

    fn visit_tuple_getitem_(
        &mut self,
        _node: &Expr,
        tuple: &Expr,
        _index: usize,
    ) -> Result<(), CoreError> {
        self.visit_expr(Some(tuple))
    }

    /// Use-site of an ordinary `Var`. Distinct from `visit_var_def`, which
    /// fires at the binding site.
    fn visit_var_(&mut self, _node: &Expr, _id: &Id) -> Result<(), CoreError> {
        Ok(())
    }

    /// Use-site of a `DataflowVar`.
    fn visit_dataflow_var_(&mut self, _node: &Expr, _id: &Id) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_global_var_(&mut self, _node: &Expr, _id: &Id) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_extern_func_(&mut self, _node: &Expr, _symbol: &str) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_shape_expr_(&mut self, _node: &Expr, dims: &[PrimExpr]) -> Result<(), CoreError> {
        for dim in dims {
            self.visit_prim_expr(dim);
        }
        Ok(())
    }

    fn visit_runtime_dep_shape_(&mut self, _node: &Expr) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_op_(&mut self, _node: &Expr, _key: &str) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_call_(
        &mut self,
        _node: &Expr,
        callee: &Expr,
        args: &[Expr],
        _attrs: &Attrs,
        _type_args: &[Type],
    ) -> Result<(), CoreError> {
        self.visit_expr(Some(callee))?;
        for a in args {
            self.visit_expr(Some(a))?;
        }
        Ok(())
    }

    fn visit_seq_expr_(
        &mut self,
        _node: &Expr,
        blocks: &[BindingBlock],
        body: &Expr,
    ) -> Result<(), CoreError> {
        for block in blocks {
            self.visit_binding_block(block)?;
        }
        self.visit_expr(Some(body))
    }

    fn visit_if_(
        &mut self,
        _node: &Expr,
        cond: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
    ) -> Result<(), CoreError> {
        self.visit_expr(Some(cond))?;
        self.visit_expr(Some(then_branch))?;
        self.visit_expr(Some(else_branch))
    }

    fn visit_function_(
        &mut self,
        _node: &Expr,
        params: &[Var],
        body: &Expr,
        _ret_type: &Option<Type>,
        _attrs: &Attrs,
    ) -> Result<(), CoreError> {
        for p in params {
            self.visit_var_def(p)?;
        }
        self.visit_expr(Some(body))
    }

    fn visit_binding(&mut self, binding: &Binding) -> Result<(), CoreError> {
        match binding {
            Binding::VarBinding(b) => self.visit_var_binding_(b),
            Binding::MatchShape(b) => self.visit_match_shape_(b),
        }
    }

    fn visit_var_binding_(&mut self, binding: &VarBinding) -> Result<(), CoreError> {
        self.visit_expr(Some(&binding.value))?;
        self.visit_var_def(&binding.var)
    }

    fn visit_match_shape_(&mut self, binding: &MatchShapeBinding) -> Result<(), CoreError> {
        self.visit_expr(Some(&binding.value))?;
        for dim in &binding.pattern {
            self.visit_prim_expr(dim);
        }
        if let Some(v) = &binding.var {
            self.visit_var_def(v)?;
        }
        Ok(())
    }

    fn visit_binding_block(&mut self, block: &BindingBlock) -> Result<(), CoreError> {
        if block.is_dataflow() {
            self.visit_dataflow_block_(block)
        } else {
            self.visit_binding_block_(block)
        }
    }

    fn visit_binding_block_(&mut self, block: &BindingBlock) -> Result<(), CoreError> {
        for b in &block.bindings {
            self.visit_binding(b)?;
        }
        Ok(())
    }

    fn visit_dataflow_block_(&mut self, block: &BindingBlock) -> Result<(), CoreError> {
        for b in &block.bindings {
            self.visit_binding(b)?;
        }
        Ok(())
    }

    /// Invoked at a binding *definition* site — distinct from `visit_expr`
    /// on a use-site `Var`/`DataflowVar`. Dispatches on dataflow-ness to
    /// `visit_var_def_`/`visit_dataflow_var_def_`.
    fn visit_var_def(&mut self, var: &Var) -> Result<(), CoreError> {
        if var.is_dataflow() {
            self.visit_dataflow_var_def_(var)
        } else {
            self.visit_var_def_(var)
        }
    }

    fn visit_var_def_(&mut self, _var: &Var) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_dataflow_var_def_(&mut self, _var: &Var) -> Result<(), CoreError> {
        Ok(())
    }
}
