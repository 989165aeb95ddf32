use std::cell::RefCell;

use tir_common::CoreError;
use tir_ir::{
    Binding, BindingBlock, Expr, ExprData, ExprKind, Id, Literal, Type, Var, VarBinding,
    expr_ptr_eq,
};

use crate::functor::ExprFunctor;
use crate::mutator::ExprMutator;
use crate::post_order::post_order_visit;
use crate::visitor::ExprVisitor;

fn var_use(v: &Var) -> Expr {
    v.as_expr().clone()
}

fn sample_call(op_name: &str, args: Vec<Expr>) -> Expr {
    let op = ExprData::new(ExprKind::Op(op_name.to_string()));
    ExprData::new(ExprKind::Call {
        callee: op,
        args: args.into_iter().collect(),
        attrs: tir_ir::Attrs::new(),
        type_args: Vec::new(),
    })
}

struct IdentityMutator;
impl ExprMutator for IdentityMutator {}

#[test]
fn identity_mutator_preserves_reference_identity() {
    let a = Var::new(Id::fresh("a"));
    let b = Var::new(Id::fresh("b"));
    let call = sample_call("add", vec![var_use(&a), var_use(&b)]);
    let mut m = IdentityMutator;
    let out = m.visit_expr(Some(&call)).unwrap();
    assert!(expr_ptr_eq(&out, &call));
}

struct CountingVisitor {
    count: RefCell<usize>,
}
impl ExprVisitor for CountingVisitor {
    fn visit_type(&mut self, _ty: &Option<Type>) {
        *self.count.borrow_mut() += 1;
    }
}

#[test]
fn post_order_and_visitor_see_the_same_node_count() {
    let a = Var::new(Id::fresh("a"));
    let b = Var::new(Id::fresh("b"));
    let call = sample_call("add", vec![var_use(&a), var_use(&b)]);

    let mut collected = 0usize;
    post_order_visit(&call, |_e| collected += 1);
    // callee (Op) + a + b + the Call itself
    assert_eq!(collected, 4);

    let mut v = CountingVisitor {
        count: RefCell::new(0),
    };
    v.visit_expr(Some(&call)).unwrap();
    assert_eq!(*v.count.borrow(), 4);
}

struct DefCollectingVisitor {
    defs: RefCell<Vec<Id>>,
}
impl ExprVisitor for DefCollectingVisitor {
    fn visit_var_def(&mut self, var: &Var) -> Result<(), CoreError> {
        self.defs.borrow_mut().push(var.id().clone());
        Ok(())
    }
}

#[test]
fn var_definitions_and_uses_are_disjoint_sets() {
    let x = Var::new(Id::fresh("x"));
    let value = sample_call("const", vec![]);
    let binding = Binding::VarBinding(VarBinding {
        var: x.clone(),
        value,
    });
    let block = BindingBlock::binding(vec![binding]);
    let body = var_use(&x);
    let seq = ExprData::new(ExprKind::SeqExpr {
        blocks: vec![block],
        body,
    });

    let mut v = DefCollectingVisitor {
        defs: RefCell::new(Vec::new()),
    };
    v.visit_expr(Some(&seq)).unwrap();
    let defs = v.defs.borrow();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0], *x.id());

    let mut uses = Vec::new();
    post_order_visit(&seq, |node| {
        if let ExprKind::Var(id) | ExprKind::DataflowVar(id) = &node.kind {
            uses.push(id.clone());
        }
    });
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0], *x.id());
    // the definition site and the use site are the same `Id`, but they
    // were discovered through entirely different hooks.
    assert!(!defs.is_empty() && !uses.is_empty());
}

#[test]
fn null_node_is_rejected() {
    struct V;
    impl ExprVisitor for V {}
    let mut v = V;
    let err = v.visit_expr(None).unwrap_err();
    assert_eq!(err, CoreError::NullNode);
}

struct RefuteEverything;
impl<A> ExprFunctor<A, ()> for RefuteEverything {}

#[test]
fn raw_functor_defaults_to_unhandled_variant() {
    let mut f = RefuteEverything;
    let c = ExprData::new(ExprKind::Constant(Literal::scalar_bool(true)));
    let err = <RefuteEverything as ExprFunctor<(), ()>>::visit(&mut f, Some(&c), ()).unwrap_err();
    assert_eq!(
        err,
        CoreError::UnhandledVariant {
            variant: "Constant"
        }
    );
}
