//! The scripting bridge: a name-keyed callback table wrapped around a host
//! [`ExprVisitor`], used to let an embedding script override a subset of
//! traversal hooks without reimplementing the rest.
//!
//! Each of the 26 canonical hook names corresponds 1:1 to an `ExprVisitor`
//! method. On invocation, [`HostBridge`] checks the table for that name; if
//! present, the registered callback runs instead of the hook; otherwise the
//! call falls back to the wrapped host's own method for that hook (its
//! override if it has one, the trait default otherwise).
//!
//! `visit_expr`'s own fallback does *not* call `host.visit_expr` directly —
//! that would dispatch through the host's own `visit_constant_`/
//! `visit_call_`/etc., bypassing the bridge for every descendant of an
//! unmapped node. Instead it inlines the dispatch match and calls back into
//! `self`'s own per-variant methods, so every node in the tree — mapped or
//! not — is offered to the script before falling through to the host.
//!
//! Adding a new `Expr` variant means adding its hook here too — this crate
//! keeps the canonical name set, it does not derive it from `ExprKind`.

use rustc_hash::FxHashMap;
use tir_common::{CoreError, Span};
use tir_ir::{
    Attrs, Binding, BindingBlock, Expr, ExprKind, Id, Literal, MatchShapeBinding, PrimExpr, Type,
    Var, VarBinding,
};
use tir_traversal::ExprVisitor;

/// The node a callback is handed, wrapped by hook shape. Variants mirror
/// the distinct parameter shapes across the 26 canonical hooks.
pub enum HookArg<'a> {
    Expr(&'a Expr),
    Var(&'a Var),
    Binding(&'a Binding),
    Block(&'a BindingBlock),
    Type(&'a Option<Type>),
    Span(Span),
}

pub type HookCallback = Box<dyn Fn(HookArg) -> Result<(), CoreError>>;

/// All 26 canonical hook names, in the order they appear in the bridge
/// adapter's contract.
pub const HOOK_NAMES: [&str; 26] = [
    "visit_expr",
    "visit_constant_",
    "visit_tuple_",
    "visit_var_",
    "visit_dataflow_var_",
    "visit_shape_expr_",
    "visit_runtime_dep_shape_",
    "visit_extern_func_",
    "visit_global_var_",
    "visit_function_",
    "visit_call_",
    "visit_seq_expr_",
    "visit_if_",
    "visit_op_",
    "visit_tuple_getitem_",
    "visit_binding",
    "visit_var_binding_",
    "visit_match_shape_",
    "visit_binding_block",
    "visit_binding_block_",
    "visit_dataflow_block_",
    "visit_var_def",
    "visit_var_def_",
    "visit_dataflow_var_def_",
    "visit_type",
    "visit_span",
];

pub struct HostBridge<'h, H> {
    host: &'h mut H,
    callbacks: FxHashMap<&'static str, HookCallback>,
}

impl<'h, H: ExprVisitor> HostBridge<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        HostBridge {
            host,
            callbacks: FxHashMap::default(),
        }
    }

    /// Registers a callback for `hook`. `hook` should be one of
    /// [`HOOK_NAMES`]; an unrecognized name is accepted but will simply
    /// never be looked up.
    pub fn register(&mut self, hook: &'static str, callback: HookCallback) {
        self.callbacks.insert(hook, callback);
    }

    pub fn is_overridden(&self, hook: &str) -> bool {
        self.callbacks.contains_key(hook)
    }

    fn dispatch(
        &mut self,
        hook: &'static str,
        arg: HookArg,
        default: impl FnOnce(&mut H) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        if let Some(cb) = self.callbacks.get(hook) {
            tracing::trace!(hook, "scripting hook invoked");
            cb(arg)
        } else {
            default(self.host)
        }
    }
}

impl<'h, H: ExprVisitor> ExprVisitor for HostBridge<'h, H> {
    fn visit_expr(&mut self, expr: Option<&Expr>) -> Result<(), CoreError> {
        let node = expr.ok_or(CoreError::NullNode)?;
        self.visit_type(&node.checked_type());
        if let Some(span) = node.span() {
            self.visit_span(span);
        }
        let dispatch_to_self = |bridge: &mut Self| match &node.kind {
            ExprKind::Constant(lit) => bridge.visit_constant_(node, lit),
            ExprKind::Tuple(fields) => bridge.visit_tuple_(node, fields),
            ExprKind::TupleGetItem { tuple, index } => {
                bridge.visit_tuple_getitem_(node, tuple, *index)
            }
            ExprKind::Var(id) => bridge.visit_var_(node, id),
            ExprKind::DataflowVar(id) => bridge.visit_dataflow_var_(node, id),
            ExprKind::GlobalVar(id) => bridge.visit_global_var_(node, id),
            ExprKind::ExternFunc(symbol) => bridge.visit_extern_func_(node, symbol),
            ExprKind::ShapeExpr(dims) => bridge.visit_shape_expr_(node, dims),
            ExprKind::RuntimeDepShape => bridge.visit_runtime_dep_shape_(node),
            ExprKind::Op(key) => bridge.visit_op_(node, key),
            ExprKind::Call {
                callee,
                args,
                attrs,
                type_args,
            } => bridge.visit_call_(node, callee, args, attrs, type_args),
            ExprKind::SeqExpr { blocks, body } => bridge.visit_seq_expr_(node, blocks, body),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => bridge.visit_if_(node, cond, then_branch, else_branch),
            ExprKind::Function {
                params,
                body,
                ret_type,
                attrs,
            } => bridge.visit_function_(node, params, body, ret_type, attrs),
        };

        if let Some(cb) = self.callbacks.get("visit_expr") {
            tracing::trace!(hook = "visit_expr", "scripting hook invoked");
            cb(HookArg::Expr(node))
        } else {
            dispatch_to_self(self)
        }
    }

    fn visit_type(&mut self, ty: &Option<Type>) {
        let _ = self.dispatch("visit_type", HookArg::Type(ty), |h| {
            h.visit_type(ty);
            Ok(())
        });
    }

    fn visit_span(&mut self, span: Span) {
        let _ = self.dispatch("visit_span", HookArg::Span(span), |h| {
            h.visit_span(span);
            Ok(())
        });
    }

    fn visit_constant_(&mut self, node: &Expr, lit: &Literal) -> Result<(), CoreError> {
        self.dispatch("visit_constant_", HookArg::Expr(node), |h| {
            h.visit_constant_(node, lit)
        })
    }

    fn visit_tuple_(&mut self, node: &Expr, fields: &[Expr]) -> Result<(), CoreError> {
        self.dispatch("visit_tuple_", HookArg::Expr(node), |h| {
            h.visit_tuple_(node, fields)
        })
    }

    fn visit_tuple_getitem_(
        &mut self,
        node: &Expr,
        tuple: &Expr,
        index: usize,
    ) -> Result<(), CoreError> {
        self.dispatch("visit_tuple_getitem_", HookArg::Expr(node), |h| {
            h.visit_tuple_getitem_(node, tuple, index)
        })
    }

    fn visit_var_(&mut self, node: &Expr, id: &Id) -> Result<(), CoreError> {
        self.dispatch("visit_var_", HookArg::Expr(node), |h| {
            h.visit_var_(node, id)
        })
    }

    fn visit_dataflow_var_(&mut self, node: &Expr, id: &Id) -> Result<(), CoreError> {
        self.dispatch("visit_dataflow_var_", HookArg::Expr(node), |h| {
            h.visit_dataflow_var_(node, id)
        })
    }

    fn visit_global_var_(&mut self, node: &Expr, id: &Id) -> Result<(), CoreError> {
        self.dispatch("visit_global_var_", HookArg::Expr(node), |h| {
            h.visit_global_var_(node, id)
        })
    }

    fn visit_extern_func_(&mut self, node: &Expr, symbol: &str) -> Result<(), CoreError> {
        self.dispatch("visit_extern_func_", HookArg::Expr(node), |h| {
            h.visit_extern_func_(node, symbol)
        })
    }

    fn visit_shape_expr_(&mut self, node: &Expr, dims: &[PrimExpr]) -> Result<(), CoreError> {
        self.dispatch("visit_shape_expr_", HookArg::Expr(node), |h| {
            h.visit_shape_expr_(node, dims)
        })
    }

    fn visit_runtime_dep_shape_(&mut self, node: &Expr) -> Result<(), CoreError> {
        self.dispatch("visit_runtime_dep_shape_", HookArg::Expr(node), |h| {
            h.visit_runtime_dep_shape_(node)
        })
    }

    fn visit_op_(&mut self, node: &Expr, key: &str) -> Result<(), CoreError> {
        self.dispatch("visit_op_", HookArg::Expr(node), |h| h.visit_op_(node, key))
    }

    fn visit_call_(
        &mut self,
        node: &Expr,
        callee: &Expr,
        args: &[Expr],
        attrs: &Attrs,
        type_args: &[Type],
    ) -> Result<(), CoreError> {
        self.dispatch("visit_call_", HookArg::Expr(node), |h| {
            h.visit_call_(node, callee, args, attrs, type_args)
        })
    }

    fn visit_seq_expr_(
        &mut self,
        node: &Expr,
        blocks: &[BindingBlock],
        body: &Expr,
    ) -> Result<(), CoreError> {
        self.dispatch("visit_seq_expr_", HookArg::Expr(node), |h| {
            h.visit_seq_expr_(node, blocks, body)
        })
    }

    fn visit_if_(
        &mut self,
        node: &Expr,
        cond: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
    ) -> Result<(), CoreError> {
        self.dispatch("visit_if_", HookArg::Expr(node), |h| {
            h.visit_if_(node, cond, then_branch, else_branch)
        })
    }

    fn visit_function_(
        &mut self,
        node: &Expr,
        params: &[Var],
        body: &Expr,
        ret_type: &Option<Type>,
        attrs: &Attrs,
    ) -> Result<(), CoreError> {
        self.dispatch("visit_function_", HookArg::Expr(node), |h| {
            h.visit_function_(node, params, body, ret_type, attrs)
        })
    }

    fn visit_binding(&mut self, binding: &Binding) -> Result<(), CoreError> {
        self.dispatch("visit_binding", HookArg::Binding(binding), |h| {
            h.visit_binding(binding)
        })
    }

    fn visit_var_binding_(&mut self, binding: &VarBinding) -> Result<(), CoreError> {
        let wrapped = Binding::VarBinding(binding.clone());
        self.dispatch("visit_var_binding_", HookArg::Binding(&wrapped), |h| {
            h.visit_var_binding_(binding)
        })
    }

    fn visit_match_shape_(&mut self, binding: &MatchShapeBinding) -> Result<(), CoreError> {
        let wrapped = Binding::MatchShape(binding.clone());
        self.dispatch("visit_match_shape_", HookArg::Binding(&wrapped), |h| {
            h.visit_match_shape_(binding)
        })
    }

    fn visit_binding_block(&mut self, block: &BindingBlock) -> Result<(), CoreError> {
        self.dispatch("visit_binding_block", HookArg::Block(block), |h| {
            h.visit_binding_block(block)
        })
    }

    fn visit_binding_block_(&mut self, block: &BindingBlock) -> Result<(), CoreError> {
        self.dispatch("visit_binding_block_", HookArg::Block(block), |h| {
            h.visit_binding_block_(block)
        })
    }

    fn visit_dataflow_block_(&mut self, block: &BindingBlock) -> Result<(), CoreError> {
        self.dispatch("visit_dataflow_block_", HookArg::Block(block), |h| {
            h.visit_dataflow_block_(block)
        })
    }

    fn visit_var_def(&mut self, var: &Var) -> Result<(), CoreError> {
        self.dispatch("visit_var_def", HookArg::Var(var), |h| h.visit_var_def(var))
    }

    fn visit_var_def_(&mut self, var: &Var) -> Result<(), CoreError> {
        self.dispatch("visit_var_def_", HookArg::Var(var), |h| {
            h.visit_var_def_(var)
        })
    }

    fn visit_dataflow_var_def_(&mut self, var: &Var) -> Result<(), CoreError> {
        self.dispatch("visit_dataflow_var_def_", HookArg::Var(var), |h| {
            h.visit_dataflow_var_def_(var)
        })
    }
}
