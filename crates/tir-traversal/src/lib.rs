//! Generic traversal over the Relax expression AST: the dispatch functor,
//! a read-only visitor, and a rewriting mutator, plus an iterative
//! post-order walk utility.

pub mod functor;
pub mod mutator;
pub mod post_order;
pub mod visitor;

pub use functor::ExprFunctor;
pub use mutator::ExprMutator;
pub use post_order::post_order_visit;
pub use visitor::ExprVisitor;

#[cfg(test)]
mod tests;
