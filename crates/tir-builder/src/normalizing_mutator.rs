//! A mutator that enforces ANF by re-emitting bindings into a
//! [`BlockBuilder`] as it rewrites, rather than rewriting bindings in
//! place the way the unnormalized [`tir_traversal::ExprMutator`] default
//! does.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tir_common::CoreError;
use tir_ir::{Expr, ExprData, ExprKind, Type, Var, expr_ptr_eq};
use tir_traversal::ExprMutator;

use crate::builder::BlockBuilder;

fn is_atomic(e: &Expr) -> bool {
    match &e.kind {
        ExprKind::Var(_)
        | ExprKind::DataflowVar(_)
        | ExprKind::GlobalVar(_)
        | ExprKind::Constant(_)
        | ExprKind::Op(_)
        | ExprKind::ShapeExpr(_)
        | ExprKind::ExternFunc(_) => true,
        ExprKind::Tuple(fields) => fields.iter().all(is_atomic),
        _ => false,
    }
}

fn opt_expr_ptr_eq(a: &Option<Expr>, b: &Option<Expr>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => expr_ptr_eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

pub struct NormalizingMutator<'b> {
    builder: &'b mut BlockBuilder,
    remap: FxHashMap<u32, Var>,
}

impl<'b> NormalizingMutator<'b> {
    pub fn new(builder: &'b mut BlockBuilder) -> Self {
        NormalizingMutator {
            builder,
            remap: FxHashMap::default(),
        }
    }

    /// Looks up the binding table entry for `var` through the underlying
    /// builder. Function parameters, which are never emitted through the
    /// builder, correctly report `None`.
    pub fn lookup_binding(&self, var: &Var) -> Option<Expr> {
        self.builder.lookup_var(var).ok()
    }

    /// Returns `var` unchanged if its slots already hold `shape`/`ty`,
    /// otherwise a fresh `Var` sharing `var`'s `Id` with the new slots
    /// pre-stamped.
    pub fn with_shape_and_type(&self, var: &Var, shape: Option<Expr>, ty: Option<Type>) -> Var {
        let cur_ty = var.as_expr().checked_type();
        let cur_shape = var.as_expr().shape();
        if cur_ty == ty && opt_expr_ptr_eq(&cur_shape, &shape) {
            return var.clone();
        }
        let fresh = if var.is_dataflow() {
            Var::new_dataflow(var.id().clone())
        } else {
            Var::new(var.id().clone())
        };
        if let Some(t) = ty {
            fresh.as_expr().set_checked_type(t);
        }
        if let Some(s) = shape {
            fresh.as_expr().set_shape(s);
        }
        fresh
    }

    /// Ensures `e` is a valid `Call` argument, let-binding it through the
    /// builder first if it is not already atomic.
    fn atomize(&mut self, e: Expr) -> Result<Expr, CoreError> {
        if is_atomic(&e) {
            Ok(e)
        } else {
            Ok(self.builder.emit(e, None)?.into_expr())
        }
    }

    /// Pushes a scope matching `is_dataflow`, visits `body` inside it, and
    /// closes the scope — wrapping the result in a `SeqExpr` if the visit
    /// emitted any bindings, or returning the bare visited expression
    /// otherwise.
    fn visit_with_new_scope(&mut self, body: &Expr, is_dataflow: bool) -> Result<Expr, CoreError> {
        if is_dataflow {
            self.builder.begin_dataflow_block();
        } else {
            self.builder.begin_binding_block();
        }
        let visited = self.visit_expr(Some(body))?;
        let block = self.builder.end_block()?;
        if block.bindings.is_empty() {
            Ok(visited)
        } else {
            Ok(ExprData::new(ExprKind::SeqExpr {
                blocks: vec![block],
                body: visited,
            }))
        }
    }
}

impl<'b> ExprMutator for NormalizingMutator<'b> {
    fn visit_expr(&mut self, expr: Option<&Expr>) -> Result<Expr, CoreError> {
        let node = expr.ok_or(CoreError::NullNode)?;
        match &node.kind {
            ExprKind::Var(id) | ExprKind::DataflowVar(id) => {
                if let Some(v) = self.remap.get(&id.unique()) {
                    Ok(v.as_expr().clone())
                } else {
                    Ok(node.clone())
                }
            }

            ExprKind::Call {
                callee,
                args,
                attrs,
                type_args,
            } => {
                let ncallee = self.visit_expr(Some(callee))?;
                let ncallee = self.atomize(ncallee)?;
                let mut new_args: SmallVec<[Expr; 4]> = SmallVec::with_capacity(args.len());
                for a in args {
                    let na = self.visit_expr(Some(a))?;
                    let na = self.atomize(na)?;
                    new_args.push(na);
                }
                let rebuilt = ExprData::new(ExprKind::Call {
                    callee: ncallee,
                    args: new_args,
                    attrs: attrs.clone(),
                    type_args: type_args.clone(),
                });
                // ANF requires every `Call`'s *result* to be atomic too, not
                // just its arguments — let-bind it rather than returning the
                // bare (stamped) call.
                Ok(self
                    .builder
                    .emit(self.builder.normalize(rebuilt), None)?
                    .into_expr())
            }

            ExprKind::Function {
                params,
                body,
                ret_type,
                attrs,
            } => {
                let new_body = self.visit_with_new_scope(body, false)?;
                if expr_ptr_eq(&new_body, body) {
                    Ok(node.clone())
                } else {
                    Ok(ExprData::new(ExprKind::Function {
                        params: params.clone(),
                        body: new_body,
                        ret_type: ret_type.clone(),
                        attrs: attrs.clone(),
                    }))
                }
            }

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let ncond = self.visit_expr(Some(cond))?;
                let nthen = self.visit_with_new_scope(then_branch, false)?;
                let nelse = self.visit_with_new_scope(else_branch, false)?;
                if expr_ptr_eq(&ncond, cond)
                    && expr_ptr_eq(&nthen, then_branch)
                    && expr_ptr_eq(&nelse, else_branch)
                {
                    Ok(node.clone())
                } else {
                    Ok(ExprData::new(ExprKind::If {
                        cond: ncond,
                        then_branch: nthen,
                        else_branch: nelse,
                    }))
                }
            }

            ExprKind::SeqExpr { blocks, body } => {
                let mut new_blocks = Vec::with_capacity(blocks.len());
                for block in blocks {
                    if block.is_dataflow() {
                        self.builder.begin_dataflow_block();
                    } else {
                        self.builder.begin_binding_block();
                    }
                    for binding in &block.bindings {
                        self.visit_binding(binding)?;
                    }
                    new_blocks.push(self.builder.end_block()?);
                }

                let tail_is_dataflow = new_blocks.last().map(|b| b.is_dataflow()).unwrap_or(false);
                if tail_is_dataflow {
                    self.builder.begin_dataflow_block();
                } else {
                    self.builder.begin_binding_block();
                }
                let visited_body = self.visit_expr(Some(body))?;
                let trailing = self.builder.end_block()?;
                if !trailing.bindings.is_empty() {
                    new_blocks.push(trailing);
                }

                Ok(ExprData::new(ExprKind::SeqExpr {
                    blocks: new_blocks,
                    body: visited_body,
                }))
            }

            _ => self.default_visit_expr(Some(node)),
        }
    }

    /// Bindings are emitted via the builder instead of being rewritten in
    /// place: visiting a `VarBinding` rewrites the value, emits a new
    /// binding, and records a var remap from the old id to the freshly
    /// emitted var; visiting a `MatchShape` binding does the same through
    /// `emit_match_shape`.
    fn visit_binding(&mut self, binding: &tir_ir::Binding) -> Result<tir_ir::Binding, CoreError> {
        match binding {
            tir_ir::Binding::VarBinding(b) => {
                let value = self.visit_expr(Some(&b.value))?;
                let new_var = self.builder.emit(value.clone(), Some(b.var.id().name_hint()))?;
                self.remap.insert(b.var.id().unique(), new_var.clone());
                Ok(tir_ir::Binding::VarBinding(tir_ir::VarBinding {
                    var: new_var,
                    value,
                }))
            }
            tir_ir::Binding::MatchShape(b) => {
                let value = self.visit_expr(Some(&b.value))?;
                let hint = b.var.as_ref().map(|v| v.id().name_hint().to_string());
                let new_var =
                    self.builder
                        .emit_match_shape(value.clone(), b.pattern.clone(), hint.as_deref())?;
                if let Some(old_var) = &b.var {
                    self.remap.insert(old_var.id().unique(), new_var.clone());
                }
                Ok(tir_ir::Binding::MatchShape(tir_ir::MatchShapeBinding {
                    value,
                    pattern: b.pattern.clone(),
                    var: Some(new_var),
                }))
            }
        }
    }
}
