//! Types and primitive dtypes.

use std::rc::Rc;

/// A primitive element dtype token, independent of the main `Type` sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    Void,
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Void => "void",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// A tensor of statically unknown (or known) rank and a fixed dtype.
    DynTensorType { rank: Option<u32>, dtype: DType },
    /// The type of a (possibly symbolic) shape value.
    ShapeType,
    TupleType(Vec<Type>),
    FuncType {
        arg_types: Vec<Type>,
        ret_type: Rc<Type>,
    },
    /// A type the core does not model further; round-trips opaquely.
    OpaqueType,
}

impl Type {
    pub fn tensor(rank: Option<u32>, dtype: DType) -> Self {
        Type::DynTensorType { rank, dtype }
    }

    pub fn func(arg_types: Vec<Type>, ret_type: Type) -> Self {
        Type::FuncType {
            arg_types,
            ret_type: Rc::new(ret_type),
        }
    }

    pub fn dtype(&self) -> Option<DType> {
        match self {
            Type::DynTensorType { dtype, .. } => Some(*dtype),
            _ => None,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::DynTensorType { rank, dtype } => match rank {
                Some(r) => write!(f, "Tensor(ndim={r}, dtype={dtype})"),
                None => write!(f, "Tensor(ndim=?, dtype={dtype})"),
            },
            Type::ShapeType => write!(f, "Shape"),
            Type::TupleType(elems) => {
                write!(f, "Tuple(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            Type::FuncType {
                arg_types,
                ret_type,
            } => {
                write!(f, "(")?;
                for (i, a) in arg_types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ") -> {ret_type}")
            }
            Type::OpaqueType => write!(f, "Opaque"),
        }
    }
}
