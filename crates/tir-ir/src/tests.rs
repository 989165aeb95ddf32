use crate::attrs::{AttrValue, Attrs};
use crate::expr::{Binding, BindingBlock, ExprData, ExprKind, Var, VarBinding, expr_ptr_eq};
use crate::id::Id;
use crate::literal::Literal;
use crate::shape::PrimExpr;
use crate::ty::{DType, Type};

#[test]
fn ids_are_unique_even_with_same_hint() {
    let a = Id::fresh("x");
    let b = Id::fresh("x");
    assert_ne!(a, b);
    assert_eq!(a.name_hint(), b.name_hint());
}

#[test]
fn var_identity_is_pointer_equality() {
    let v1 = Var::new(Id::fresh("x"));
    let v2 = Var::from_expr(v1.as_expr().clone());
    assert_eq!(v1, v2);

    let v3 = Var::new(Id::fresh("x"));
    assert_ne!(v1, v3);
}

#[test]
fn dataflow_var_is_distinguished_from_ordinary_var() {
    let v = Var::new_dataflow(Id::fresh("lv"));
    assert!(v.is_dataflow());
    let g = Var::new(Id::fresh("gv"));
    assert!(!g.is_dataflow());
}

#[test]
fn expr_metadata_slots_publish_once_and_are_readable() {
    let lit = ExprData::new(ExprKind::Constant(Literal::scalar_int(1, DType::Int32)));
    assert!(lit.checked_type().is_none());
    lit.set_checked_type(Type::DynTensorType {
        rank: Some(0),
        dtype: DType::Int32,
    });
    assert_eq!(
        lit.checked_type(),
        Some(Type::DynTensorType {
            rank: Some(0),
            dtype: DType::Int32
        })
    );
}

#[test]
fn unchanged_rebuild_is_identity_by_reference() {
    let a = ExprData::new(ExprKind::Var(Id::fresh("a")));
    let b = a.clone();
    assert!(expr_ptr_eq(&a, &b));
}

#[test]
fn shape_expr_display_matches_arithmetic_form() {
    let e = PrimExpr::add(PrimExpr::int(1), PrimExpr::var(Id::fresh("n")));
    assert!(e.to_string().starts_with('('));
    assert!(e.to_string().contains('+'));
}

#[test]
fn binding_block_records_dataflow_flag() {
    let var = Var::new_dataflow(Id::fresh("lv"));
    let value = ExprData::new(ExprKind::Constant(Literal::scalar_bool(true)));
    let block = BindingBlock::dataflow(vec![Binding::VarBinding(VarBinding {
        var: var.clone(),
        value,
    })]);
    assert!(block.is_dataflow());
    assert_eq!(block.bindings.len(), 1);
    assert_eq!(block.bindings[0].bound_var(), Some(&var));
}

#[test]
fn attrs_set_overwrites_existing_key() {
    let mut attrs = Attrs::new().with("axis", AttrValue::Int(0));
    attrs.set("axis", AttrValue::Int(1));
    assert_eq!(attrs.get("axis"), Some(&AttrValue::Int(1)));
    assert_eq!(attrs.len(), 1);
}
