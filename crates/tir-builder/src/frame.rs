//! A single open block frame on the builder's scope stack.

use tir_ir::Binding;

#[derive(Debug)]
pub struct BlockFrame {
    pub bindings: Vec<Binding>,
    pub is_dataflow: bool,
}

impl BlockFrame {
    pub fn new(is_dataflow: bool) -> Self {
        BlockFrame {
            bindings: Vec::new(),
            is_dataflow,
        }
    }
}
