//! Iterative post-order traversal.
//!
//! Uses an explicit work stack rather than host-stack recursion so that
//! pathologically deep IR (long chains of nested `Call`s, say) cannot
//! overflow the native call stack the way a naive recursive walk would.

use tir_common::limits::POST_ORDER_STACK_INITIAL_CAPACITY;
use tir_ir::{Expr, ExprKind};

enum Frame {
    Enter(Expr),
    Leave(Expr),
}

/// Apply `visit` to every expression reachable from `root`, in
/// children-before-parent order. Children are pushed in source order so
/// siblings are visited left to right.
pub fn post_order_visit(root: &Expr, mut visit: impl FnMut(&Expr)) {
    let mut stack = Vec::with_capacity(POST_ORDER_STACK_INITIAL_CAPACITY);
    stack.push(Frame::Enter(root.clone()));

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(expr) => {
                stack.push(Frame::Leave(expr.clone()));
                for child in children_of(&expr) {
                    stack.push(Frame::Enter(child));
                }
            }
            Frame::Leave(expr) => visit(&expr),
        }
    }
}

fn children_of(expr: &Expr) -> Vec<Expr> {
    match &expr.kind {
        ExprKind::Constant(_)
        | ExprKind::Var(_)
        | ExprKind::DataflowVar(_)
        | ExprKind::GlobalVar(_)
        | ExprKind::ExternFunc(_)
        | ExprKind::ShapeExpr(_)
        | ExprKind::RuntimeDepShape
        | ExprKind::Op(_) => Vec::new(),
        ExprKind::Tuple(fields) => fields.iter().cloned().collect(),
        ExprKind::TupleGetItem { tuple, .. } => vec![tuple.clone()],
        ExprKind::Call { callee, args, .. } => {
            let mut out = Vec::with_capacity(1 + args.len());
            out.push(callee.clone());
            out.extend(args.iter().cloned());
            out
        }
        ExprKind::SeqExpr { blocks, body } => {
            let mut out = Vec::new();
            for block in blocks {
                for binding in &block.bindings {
                    match binding {
                        tir_ir::Binding::VarBinding(b) => out.push(b.value.clone()),
                        tir_ir::Binding::MatchShape(b) => out.push(b.value.clone()),
                    }
                }
            }
            out.push(body.clone());
            out
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => vec![cond.clone(), then_branch.clone(), else_branch.clone()],
        ExprKind::Function { body, .. } => vec![body.clone()],
    }
}
