use std::rc::Rc;

use tir_common::{CoreError, DiagnosticContext};
use tir_ir::{DType, Expr, ExprData, ExprKind, Id, Literal, PrimExpr, Type, Var};

use tir_traversal::ExprMutator;

use crate::builder::BlockBuilder;
use crate::normalizing_mutator::NormalizingMutator;
use crate::registry::{OperatorRegistry, ShapeEqualityOracle};

struct TestRegistry;

fn op_name(call: &Expr) -> Option<String> {
    if let ExprKind::Call { callee, .. } = &call.kind {
        if let ExprKind::Op(name) = &callee.kind {
            return Some(name.clone());
        }
    }
    None
}

impl OperatorRegistry for TestRegistry {
    fn infer_shape(&self, call: &Expr, _diag: &DiagnosticContext) -> Option<Expr> {
        match op_name(call).as_deref() {
            Some("add") => Some(ExprData::new(ExprKind::ShapeExpr(vec![PrimExpr::int(4)]))),
            Some("dyn_op") => Some(ExprData::new(ExprKind::RuntimeDepShape)),
            _ => None,
        }
    }

    fn infer_type(&self, call: &Expr, _diag: &DiagnosticContext) -> Type {
        match op_name(call).as_deref() {
            Some("add") => Type::DynTensorType {
                rank: Some(1),
                dtype: DType::Float32,
            },
            Some("dyn_op") => Type::DynTensorType {
                rank: None,
                dtype: DType::Float32,
            },
            _ => Type::OpaqueType,
        }
    }
}

impl ShapeEqualityOracle for TestRegistry {
    fn can_prove_equal(&self, a: &PrimExpr, b: &PrimExpr) -> bool {
        a == b
    }
}

fn new_builder() -> BlockBuilder {
    BlockBuilder::new(Rc::new(TestRegistry), Rc::new(TestRegistry))
}

fn tensor_var(name: &str, rank: u32, dtype: DType) -> Var {
    let v = Var::new(Id::fresh(name));
    v.as_expr().set_checked_type(Type::DynTensorType {
        rank: Some(rank),
        dtype,
    });
    v
}

fn call_add(args: Vec<Expr>) -> Expr {
    ExprData::new(ExprKind::Call {
        callee: ExprData::new(ExprKind::Op("add".to_string())),
        args: args.into_iter().collect(),
        attrs: tir_ir::Attrs::new(),
        type_args: Vec::new(),
    })
}

fn call_dyn_op(args: Vec<Expr>) -> Expr {
    ExprData::new(ExprKind::Call {
        callee: ExprData::new(ExprKind::Op("dyn_op".to_string())),
        args: args.into_iter().collect(),
        attrs: tir_ir::Attrs::new(),
        type_args: Vec::new(),
    })
}

#[test]
fn simple_dataflow_scenario() {
    let mut b = new_builder();
    let a = tensor_var("a", 1, DType::Float32);
    let c = tensor_var("c", 1, DType::Float32);
    b.begin_dataflow_block();
    let x = b.emit(call_add(vec![a.into_expr(), c.into_expr()]), None).unwrap();
    assert!(x.is_dataflow());
    assert_eq!(x.id().name_hint(), "lv");
    let y = b.emit_output(x.as_expr().clone(), None).unwrap();
    assert!(!y.is_dataflow());
    let block = b.end_block().unwrap();

    assert!(block.is_dataflow());
    assert_eq!(block.bindings.len(), 2);
    assert_eq!(
        x.as_expr().checked_type(),
        Some(Type::DynTensorType {
            rank: Some(1),
            dtype: DType::Float32
        })
    );
}

#[test]
fn shape_match_scenario() {
    let mut b = new_builder();
    let t = tensor_var("t", 2, DType::Float32);
    b.begin_binding_block();
    let n = b
        .emit_match_shape(
            t.into_expr(),
            vec![PrimExpr::var(Id::fresh("N")), PrimExpr::var(Id::fresh("M"))],
            None,
        )
        .unwrap();
    let block = b.end_block().unwrap();

    assert!(!block.is_dataflow());
    assert_eq!(block.bindings.len(), 1);
    assert_eq!(
        n.as_expr().checked_type(),
        Some(Type::DynTensorType {
            rank: Some(2),
            dtype: DType::Float32
        })
    );
    assert!(n.as_expr().shape().is_some());
}

#[test]
fn emit_match_shape_rejects_non_tensor_operand() {
    let mut b = new_builder();
    let opaque = Var::new(Id::fresh("o"));
    opaque.as_expr().set_checked_type(Type::OpaqueType);
    b.begin_binding_block();
    let err = b
        .emit_match_shape(opaque.into_expr(), vec![PrimExpr::int(1)], None)
        .unwrap_err();
    assert!(matches!(err, CoreError::BadMatchShapeOperand { .. }));
}

fn shape_dims(e: &Expr) -> Option<Vec<PrimExpr>> {
    match &e.kind {
        ExprKind::ShapeExpr(dims) => Some(dims.clone()),
        _ => None,
    }
}

#[test]
fn normalize_is_idempotent() {
    let b = new_builder();
    let a = tensor_var("a", 1, DType::Float32);
    let c = tensor_var("c", 1, DType::Float32);
    let call = call_add(vec![a.into_expr(), c.into_expr()]);
    let once = b.normalize(call);
    let shape_once = once.shape().as_ref().and_then(shape_dims);
    let ty_once = once.checked_type();
    let twice = b.normalize(once);
    assert_eq!(twice.shape().as_ref().and_then(shape_dims), shape_once);
    assert_eq!(twice.checked_type(), ty_once);
}

#[test]
fn normalize_drops_non_shape_expr_inferred_shape() {
    // `dyn_op`'s inferred shape is a `RuntimeDepShape`, not a `ShapeExpr` —
    // `normalize` must leave the call's own shape slot unset even though
    // the type slot still gets stamped.
    let b = new_builder();
    let x = tensor_var("x", 1, DType::Float32);
    let call = call_dyn_op(vec![x.into_expr()]);
    let normalized = b.normalize(call);
    assert!(normalized.shape().is_none());
    assert_eq!(
        normalized.checked_type(),
        Some(Type::DynTensorType {
            rank: None,
            dtype: DType::Float32
        })
    );
}

#[test]
fn anf_conversion_via_normalizing_mutator() {
    let mut b = new_builder();
    let x = tensor_var("x", 1, DType::Float32);
    // Call(g, [x]) nested directly as an argument to Call(f=add, ...)
    let inner = call_add(vec![x.into_expr()]);
    let outer = call_add(vec![inner]);

    b.begin_binding_block();
    let mut m = NormalizingMutator::new(&mut b);
    let result = m.visit_expr(Some(&outer)).unwrap();
    let block = b.end_block().unwrap();

    // both the nested call and the outer call get let-bound: a `Call` is
    // never left as the result of `visit_expr`, even at the top level
    assert_eq!(block.bindings.len(), 2);
    assert!(matches!(result.kind, ExprKind::Var(_)));
    if let tir_ir::Binding::VarBinding(b) = &block.bindings[1] {
        if let ExprKind::Call { args, .. } = &b.value.kind {
            assert_eq!(args.len(), 1);
            assert!(matches!(args[0].kind, ExprKind::Var(_)));
        } else {
            panic!("expected the outer binding's value to be a Call");
        }
    } else {
        panic!("expected a VarBinding");
    }
}

#[test]
fn anf_conversion_binds_the_tail_call_of_a_branch() {
    // If(true, Call(add, [Call(add, [x])]), y) must normalize so that
    // *every* call is let-bound, including the branch's own tail call —
    // not just calls nested as arguments.
    let mut b = new_builder();
    let x = tensor_var("x", 1, DType::Float32);
    let y = tensor_var("y", 1, DType::Float32);
    let cond = ExprData::new(ExprKind::Constant(Literal::scalar_bool(true)));
    let inner = call_add(vec![x.into_expr()]);
    let then_branch = call_add(vec![inner]);
    let else_branch = y.into_expr();
    let if_expr = ExprData::new(ExprKind::If {
        cond,
        then_branch,
        else_branch,
    });

    b.begin_binding_block();
    let mut m = NormalizingMutator::new(&mut b);
    let result = m.visit_expr(Some(&if_expr)).unwrap();
    let _ = b.end_block().unwrap();

    if let ExprKind::If { then_branch, .. } = &result.kind {
        if let ExprKind::SeqExpr { blocks, body } = &then_branch.kind {
            assert_eq!(blocks.len(), 1);
            assert_eq!(blocks[0].bindings.len(), 2);
            assert!(matches!(body.kind, ExprKind::Var(_)));
        } else {
            panic!("expected the then-branch to be a SeqExpr after normalization");
        }
    } else {
        panic!("expected an If");
    }
}

#[test]
fn unique_naming_in_a_single_dataflow_block() {
    let mut b = new_builder();
    b.begin_dataflow_block();
    let v0 = b.emit(ExprData::new(ExprKind::Constant(Literal::scalar_bool(true))), None).unwrap();
    let v1 = b.emit(ExprData::new(ExprKind::Constant(Literal::scalar_bool(true))), None).unwrap();
    let v2 = b.emit(ExprData::new(ExprKind::Constant(Literal::scalar_bool(true))), None).unwrap();
    assert_eq!(v0.id().name_hint(), "lv");
    assert_eq!(v1.id().name_hint(), "lv1");
    assert_eq!(v2.id().name_hint(), "lv2");
}

#[test]
fn lookup_var_returns_recorded_rhs() {
    let mut b = new_builder();
    let a = tensor_var("a", 1, DType::Float32);
    let c = tensor_var("c", 1, DType::Float32);
    b.begin_binding_block();
    let call = call_add(vec![a.into_expr(), c.into_expr()]);
    let x = b.emit(call.clone(), None).unwrap();
    let looked_up = b.lookup_var(&x).unwrap();
    assert!(Rc::ptr_eq(&looked_up, &call));
}

#[test]
fn lookup_unknown_var_is_fatal() {
    let b = new_builder();
    let phantom = Var::new(Id::fresh("ghost"));
    let err = b.lookup_var(&phantom).unwrap_err();
    assert!(matches!(err, CoreError::UnknownVar { .. }));
}

#[test]
fn emit_without_open_frame_is_fatal() {
    let mut b = new_builder();
    let err = b
        .emit(ExprData::new(ExprKind::Constant(Literal::scalar_bool(true))), None)
        .unwrap_err();
    assert_eq!(err, CoreError::NoOpenFrame);
}

#[test]
fn end_block_without_open_frame_is_fatal() {
    let mut b = new_builder();
    let err = b.end_block().unwrap_err();
    assert_eq!(err, CoreError::NoOpenFrame);
}

#[test]
fn emit_output_outside_dataflow_is_fatal() {
    let mut b = new_builder();
    b.begin_binding_block();
    let err = b
        .emit_output(ExprData::new(ExprKind::Constant(Literal::scalar_bool(true))), None)
        .unwrap_err();
    assert_eq!(err, CoreError::OutputOutsideDataflow);
}

#[test]
fn emit_binding_rejects_dataflow_var_in_plain_block() {
    let mut b = new_builder();
    b.begin_binding_block();
    let v = Var::new_dataflow(Id::fresh("lv"));
    let value = ExprData::new(ExprKind::Constant(Literal::scalar_bool(true)));
    let err = b
        .emit_binding(tir_ir::VarBinding { var: v, value })
        .unwrap_err();
    assert!(matches!(err, CoreError::DataflowScopeViolation { .. }));
}

#[test]
fn dropping_builder_with_open_frame_emits_a_diagnostic_not_an_error() {
    let mut b = new_builder();
    b.begin_binding_block();
    drop(b);
    // no panic, no Err to observe — the diagnostic went to the (now
    // dropped) context. This test exists to document that the failure
    // mode here is silent-by-design, matching `CoreError::UnclosedBlock`
    // never being returned as an `Err`.
}
