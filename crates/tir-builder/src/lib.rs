//! The block builder: incremental, scope-stack construction of Relax IR
//! in ANF, with eager shape/type inference, plus the normalizing mutator
//! built on top of it.

pub mod builder;
pub mod frame;
pub mod name_table;
pub mod normalizing_mutator;
pub mod registry;

pub use builder::BlockBuilder;
pub use name_table::NameTable;
pub use normalizing_mutator::NormalizingMutator;
pub use registry::{EmptyRegistry, OperatorRegistry, ShapeEqualityOracle};

#[cfg(test)]
mod tests;
