//! Rewriting traversal (unnormalized).
//!
//! `ExprMutator` has signature `Result<Expr, CoreError>`. Its default
//! per-variant hooks rebuild a node of the same variant with each child
//! replaced by the result of visiting it — but if no child actually
//! changed (compared by reference, not deep equality), the *original*
//! expression is returned so structural sharing and any already-stamped
//! metadata slots survive the rewrite untouched.
//!
//! This mutator does not open builder scopes; binding blocks are rewritten
//! transparently in place, preserving their dataflow-ness. See
//! [`crate::normalizing_mutator`] for the scope-aware variant used to
//! produce ANF.

use smallvec::SmallVec;
use tir_common::CoreError;
use tir_ir::{
    Binding, BindingBlock, Expr, ExprData, ExprKind, MatchShapeBinding, Type, VarBinding,
    expr_ptr_eq,
};

pub trait ExprMutator {
    /// Entry point. Defaults to [`ExprMutator::default_visit_expr`]; override
    /// this (not the default) to special-case specific variants, calling
    /// `self.default_visit_expr(expr)` for everything you don't want to
    /// change — overriding `visit_expr` itself rather than its body is what
    /// lets that fallback dispatch back through your override when it
    /// recurses into children.
    fn visit_expr(&mut self, expr: Option<&Expr>) -> Result<Expr, CoreError> {
        self.default_visit_expr(expr)
    }

    /// The structural default: rebuild a node of the same variant with each
    /// child replaced by `self.visit_expr(child)`, returning the original
    /// by reference if nothing actually changed.
    fn default_visit_expr(&mut self, expr: Option<&Expr>) -> Result<Expr, CoreError> {
        let node = expr.ok_or(CoreError::NullNode)?;
        match &node.kind {
            ExprKind::Constant(_)
            | ExprKind::Var(_)
            | ExprKind::DataflowVar(_)
            | ExprKind::GlobalVar(_)
            | ExprKind::ExternFunc(_)
            | ExprKind::ShapeExpr(_)
            | ExprKind::RuntimeDepShape
            | ExprKind::Op(_) => Ok(node.clone()),

            ExprKind::Tuple(fields) => {
                let mut changed = false;
                let mut new_fields: SmallVec<[Expr; 4]> = SmallVec::with_capacity(fields.len());
                for f in fields {
                    let nf = self.visit_expr(Some(f))?;
                    changed |= !expr_ptr_eq(&nf, f);
                    new_fields.push(nf);
                }
                if changed {
                    Ok(ExprData::new(ExprKind::Tuple(new_fields)))
                } else {
                    Ok(node.clone())
                }
            }

            ExprKind::TupleGetItem { tuple, index } => {
                let nt = self.visit_expr(Some(tuple))?;
                if expr_ptr_eq(&nt, tuple) {
                    Ok(node.clone())
                } else {
                    Ok(ExprData::new(ExprKind::TupleGetItem {
                        tuple: nt,
                        index: *index,
                    }))
                }
            }

            ExprKind::Call {
                callee,
                args,
                attrs,
                type_args,
            } => {
                let ncallee = self.visit_expr(Some(callee))?;
                let mut changed = !expr_ptr_eq(&ncallee, callee);
                let mut new_args: SmallVec<[Expr; 4]> = SmallVec::with_capacity(args.len());
                for a in args {
                    let na = self.visit_expr(Some(a))?;
                    changed |= !expr_ptr_eq(&na, a);
                    new_args.push(na);
                }
                if changed {
                    Ok(ExprData::new(ExprKind::Call {
                        callee: ncallee,
                        args: new_args,
                        attrs: attrs.clone(),
                        type_args: type_args.clone(),
                    }))
                } else {
                    Ok(node.clone())
                }
            }

            ExprKind::SeqExpr { blocks, body } => {
                let mut changed = false;
                let mut new_blocks = Vec::with_capacity(blocks.len());
                for block in blocks {
                    let nb = self.visit_binding_block(block)?;
                    changed |= !binding_block_unchanged(&nb, block);
                    new_blocks.push(nb);
                }
                let nbody = self.visit_expr(Some(body))?;
                changed |= !expr_ptr_eq(&nbody, body);
                if changed {
                    Ok(ExprData::new(ExprKind::SeqExpr {
                        blocks: new_blocks,
                        body: nbody,
                    }))
                } else {
                    Ok(node.clone())
                }
            }

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let ncond = self.visit_expr(Some(cond))?;
                let nthen = self.visit_expr(Some(then_branch))?;
                let nelse = self.visit_expr(Some(else_branch))?;
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

            ExprKind::Function {
                params,
                body,
                ret_type,
                attrs,
            } => {
                let nbody = self.visit_expr(Some(body))?;
                let nret = self.visit_type(ret_type.clone())?;
                if expr_ptr_eq(&nbody, body) && nret == *ret_type {
                    Ok(node.clone())
                } else {
                    Ok(ExprData::new(ExprKind::Function {
                        params: params.clone(),
                        body: nbody,
                        ret_type: nret,
                        attrs: attrs.clone(),
                    }))
                }
            }
        }
    }

    /// Hook for rewriting a type found inside an annotation (e.g. a
    /// `Function`'s declared return type). Identity by default.
    fn visit_type(&mut self, ty: Option<Type>) -> Result<Option<Type>, CoreError> {
        Ok(ty)
    }

    fn visit_binding_block(&mut self, block: &BindingBlock) -> Result<BindingBlock, CoreError> {
        let mut new_bindings = Vec::with_capacity(block.bindings.len());
        for b in &block.bindings {
            new_bindings.push(self.visit_binding(b)?);
        }
        Ok(if block.is_dataflow() {
            BindingBlock::dataflow(new_bindings)
        } else {
            BindingBlock::binding(new_bindings)
        })
    }

    fn visit_binding(&mut self, binding: &Binding) -> Result<Binding, CoreError> {
        match binding {
            Binding::VarBinding(b) => {
                let value = self.visit_expr(Some(&b.value))?;
                Ok(Binding::VarBinding(VarBinding {
                    var: b.var.clone(),
                    value,
                }))
            }
            Binding::MatchShape(b) => {
                let value = self.visit_expr(Some(&b.value))?;
                Ok(Binding::MatchShape(MatchShapeBinding {
                    value,
                    pattern: b.pattern.clone(),
                    var: b.var.clone(),
                }))
            }
        }
    }
}

fn binding_unchanged(a: &Binding, b: &Binding) -> bool {
    match (a, b) {
        (Binding::VarBinding(x), Binding::VarBinding(y)) => {
            x.var == y.var && expr_ptr_eq(&x.value, &y.value)
        }
        (Binding::MatchShape(x), Binding::MatchShape(y)) => {
            expr_ptr_eq(&x.value, &y.value) && x.pattern == y.pattern && x.var == y.var
        }
        _ => false,
    }
}

fn binding_block_unchanged(a: &BindingBlock, b: &BindingBlock) -> bool {
    a.is_dataflow() == b.is_dataflow()
        && a.bindings.len() == b.bindings.len()
        && a.bindings
            .iter()
            .zip(b.bindings.iter())
            .all(|(x, y)| binding_unchanged(x, y))
}
