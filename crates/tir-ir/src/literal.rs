//! Constant payloads.

use crate::ty::DType;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// The payload of a `Constant` expression: either a scalar or a dense
/// tensor literal. The literal's own dtype is independent of — and should
/// agree with, once inference runs — the owning expression's
/// `checked_type`.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Scalar { value: ScalarValue, dtype: DType },
    Tensor {
        shape: Vec<u64>,
        dtype: DType,
        data: Vec<u8>,
    },
}

impl Literal {
    pub fn dtype(&self) -> DType {
        match self {
            Literal::Scalar { dtype, .. } => *dtype,
            Literal::Tensor { dtype, .. } => *dtype,
        }
    }

    pub fn scalar_bool(v: bool) -> Self {
        Literal::Scalar {
            value: ScalarValue::Bool(v),
            dtype: DType::Bool,
        }
    }

    pub fn scalar_int(v: i64, dtype: DType) -> Self {
        Literal::Scalar {
            value: ScalarValue::Int(v),
            dtype,
        }
    }

    pub fn scalar_float(v: f64, dtype: DType) -> Self {
        Literal::Scalar {
            value: ScalarValue::Float(v),
            dtype,
        }
    }
}
