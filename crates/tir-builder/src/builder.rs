//! The block builder: a stack-structured incremental constructor that
//! enforces scoping invariants and performs eager, local shape/type
//! inference via the operator registry as bindings are emitted.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tir_common::{CoreError, Diagnostic, DiagnosticCategory, DiagnosticContext};
use tir_ir::{BindingBlock, Expr, ExprData, ExprKind, MatchShapeBinding, Type, Var, VarBinding};

use crate::frame::BlockFrame;
use crate::name_table::NameTable;
use crate::registry::{OperatorRegistry, ShapeEqualityOracle};

pub struct BlockBuilder {
    frames: Vec<BlockFrame>,
    bindings: FxHashMap<u32, Expr>,
    name_table: NameTable,
    diag: DiagnosticContext,
    registry: Rc<dyn OperatorRegistry>,
    oracle: Rc<dyn ShapeEqualityOracle>,
}

impl BlockBuilder {
    pub fn new(registry: Rc<dyn OperatorRegistry>, oracle: Rc<dyn ShapeEqualityOracle>) -> Self {
        BlockBuilder {
            frames: Vec::new(),
            bindings: FxHashMap::default(),
            name_table: NameTable::new(),
            diag: DiagnosticContext::new(),
            registry,
            oracle,
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticContext {
        &self.diag
    }

    pub fn begin_dataflow_block(&mut self) {
        tracing::trace!("begin_dataflow_block");
        self.frames.push(BlockFrame::new(true));
    }

    pub fn begin_binding_block(&mut self) {
        tracing::trace!("begin_binding_block");
        self.frames.push(BlockFrame::new(false));
    }

    pub fn end_block(&mut self) -> Result<BindingBlock, CoreError> {
        let frame = self.frames.pop().ok_or_else(|| {
            self.diag.emit_fatal(
                Diagnostic::new(DiagnosticCategory::Error, "end_block called with no open frame"),
                CoreError::NoOpenFrame,
            )
        })?;
        tracing::trace!(is_dataflow = frame.is_dataflow, "end_block");
        Ok(if frame.is_dataflow {
            BindingBlock::dataflow(frame.bindings)
        } else {
            BindingBlock::binding(frame.bindings)
        })
    }

    fn current_frame_mut(&mut self) -> Result<&mut BlockFrame, CoreError> {
        let diag = &self.diag;
        self.frames.last_mut().ok_or_else(|| {
            diag.emit_fatal(
                Diagnostic::new(DiagnosticCategory::Error, "binding emitted with no open frame"),
                CoreError::NoOpenFrame,
            )
        })
    }

    fn current_is_dataflow(&self) -> Result<bool, CoreError> {
        self.frames.last().map(|f| f.is_dataflow).ok_or_else(|| {
            self.diag.emit_fatal(
                Diagnostic::new(DiagnosticCategory::Error, "frame query with no open frame"),
                CoreError::NoOpenFrame,
            )
        })
    }

    /// Emit `expr` as a fresh binding, inferring shape/type eagerly if
    /// `expr` is a `Call`. Returns the freshly bound `Var`
    /// (`DataflowVar` inside a dataflow block, ordinary `Var` otherwise).
    pub fn emit(&mut self, expr: Expr, name_hint: Option<&str>) -> Result<Var, CoreError> {
        let is_dataflow = self.current_is_dataflow()?;
        let hint = name_hint.unwrap_or(if is_dataflow { "lv" } else { "gv" });
        let id = self.name_table.get_unique_name(hint);
        let var = if is_dataflow {
            Var::new_dataflow(id.clone())
        } else {
            Var::new(id.clone())
        };

        let stored = if matches!(expr.kind, ExprKind::Call { .. }) {
            self.infer_call(&expr);
            var.as_expr().set_checked_type(
                expr.checked_type()
                    .unwrap_or(Type::OpaqueType),
            );
            if let Some(shape) = expr.shape() {
                var.as_expr().set_shape(shape);
            }
            expr
        } else {
            expr
        };

        self.bindings.insert(id.unique(), stored.clone());
        self.current_frame_mut()?
            .bindings
            .push(tir_ir::Binding::VarBinding(VarBinding {
                var: var.clone(),
                value: stored,
            }));
        tracing::debug!(var = %var.id(), "emit");
        Ok(var)
    }

    /// Append a caller-constructed `VarBinding`, checking that its var's
    /// dataflow-ness matches the current frame.
    pub fn emit_binding(&mut self, binding: VarBinding) -> Result<Var, CoreError> {
        let is_dataflow = self.current_is_dataflow()?;
        if is_dataflow != binding.var.is_dataflow() {
            let reason = format!(
                "expected {} var in {} block",
                if is_dataflow { "DataflowVar" } else { "Var" },
                if is_dataflow { "dataflow" } else { "binding" }
            );
            return Err(self.diag.emit_fatal(
                Diagnostic::new(DiagnosticCategory::Error, reason.clone()),
                CoreError::DataflowScopeViolation { reason },
            ));
        }
        let var = binding.var.clone();
        self.bindings
            .insert(var.id().unique(), binding.value.clone());
        self.current_frame_mut()?
            .bindings
            .push(tir_ir::Binding::VarBinding(binding));
        Ok(var)
    }

    /// Bind (or simply constrain) the shape of `value` against `pattern`,
    /// introducing a fresh var annotated with the pattern's shape.
    pub fn emit_match_shape(
        &mut self,
        value: Expr,
        pattern: Vec<tir_ir::PrimExpr>,
        name_hint: Option<&str>,
    ) -> Result<Var, CoreError> {
        let is_dataflow = self.current_is_dataflow()?;
        let ty = match value.checked_type() {
            Some(Type::ShapeType) => Type::ShapeType,
            Some(Type::DynTensorType { dtype, .. }) => Type::DynTensorType {
                rank: Some(pattern.len() as u32),
                dtype,
            },
            other => {
                let found = other.map(|t| t.to_string()).unwrap_or_else(|| "<unannotated>".to_string());
                return Err(self.diag.emit_fatal(
                    Diagnostic::new(
                        DiagnosticCategory::Error,
                        format!("match_shape operand has non-tensor type {found}"),
                    ),
                    CoreError::BadMatchShapeOperand { found },
                ));
            }
        };

        let hint = name_hint.unwrap_or("sh");
        let id = self.name_table.get_unique_name(hint);
        let var = if is_dataflow {
            Var::new_dataflow(id.clone())
        } else {
            Var::new(id.clone())
        };
        var.as_expr().set_checked_type(ty.clone());
        if !matches!(ty, Type::ShapeType) {
            var.as_expr()
                .set_shape(ExprData::new(ExprKind::ShapeExpr(pattern.clone())));
        }

        self.bindings.insert(id.unique(), value.clone());
        self.current_frame_mut()?
            .bindings
            .push(tir_ir::Binding::MatchShape(MatchShapeBinding {
                value,
                pattern,
                var: Some(var.clone()),
            }));
        Ok(var)
    }

    /// Append a caller-constructed `MatchShape` binding. If the current
    /// frame is a dataflow block, the bound var (if any) must not be a
    /// `DataflowVar` — `MatchShape` introduces a var whose scope can
    /// exceed the block it is bound in.
    pub fn emit_match_shape_binding(
        &mut self,
        binding: MatchShapeBinding,
    ) -> Result<Option<Var>, CoreError> {
        let is_dataflow = self.current_is_dataflow()?;
        if is_dataflow {
            if let Some(v) = &binding.var {
                if v.is_dataflow() {
                    let reason = "match_shape var must not be a DataflowVar".to_string();
                    return Err(self.diag.emit_fatal(
                        Diagnostic::new(DiagnosticCategory::Error, reason.clone()),
                        CoreError::DataflowScopeViolation { reason },
                    ));
                }
            }
        }
        if let Some(v) = &binding.var {
            self.bindings
                .insert(v.id().unique(), binding.value.clone());
        }
        let var = binding.var.clone();
        self.current_frame_mut()?
            .bindings
            .push(tir_ir::Binding::MatchShape(binding));
        Ok(var)
    }

    /// Emit `expr` as an ordinary `Var` exported from the current dataflow
    /// block. Fatal outside a dataflow block.
    pub fn emit_output(&mut self, expr: Expr, name_hint: Option<&str>) -> Result<Var, CoreError> {
        let is_dataflow = self.current_is_dataflow()?;
        if !is_dataflow {
            return Err(self.diag.emit_fatal(
                Diagnostic::new(DiagnosticCategory::Error, "emit_output called outside a dataflow block"),
                CoreError::OutputOutsideDataflow,
            ));
        }
        let hint = name_hint.unwrap_or("gv");
        let id = self.name_table.get_unique_name(hint);
        let var = Var::new(id.clone());
        self.bindings.insert(id.unique(), expr.clone());
        self.current_frame_mut()?
            .bindings
            .push(tir_ir::Binding::VarBinding(VarBinding {
                var: var.clone(),
                value: expr,
            }));
        Ok(var)
    }

    /// Append a caller-constructed output `VarBinding`. The bound var must
    /// not be a `DataflowVar`, and the current frame must be a dataflow
    /// block.
    pub fn emit_output_binding(&mut self, binding: VarBinding) -> Result<Var, CoreError> {
        let is_dataflow = self.current_is_dataflow()?;
        if !is_dataflow {
            return Err(self.diag.emit_fatal(
                Diagnostic::new(
                    DiagnosticCategory::Error,
                    "emit_output_binding called outside a dataflow block",
                ),
                CoreError::OutputOutsideDataflow,
            ));
        }
        if binding.var.is_dataflow() {
            let reason = "emit_output_binding var must not be a DataflowVar".to_string();
            return Err(self.diag.emit_fatal(
                Diagnostic::new(DiagnosticCategory::Error, reason.clone()),
                CoreError::DataflowScopeViolation { reason },
            ));
        }
        let var = binding.var.clone();
        self.bindings
            .insert(var.id().unique(), binding.value.clone());
        self.current_frame_mut()?
            .bindings
            .push(tir_ir::Binding::VarBinding(binding));
        Ok(var)
    }

    pub fn lookup_var(&self, var: &Var) -> Result<Expr, CoreError> {
        self.bindings.get(&var.id().unique()).cloned().ok_or_else(|| {
            let name = var.id().name_hint().to_string();
            self.diag.emit_fatal(
                Diagnostic::new(DiagnosticCategory::Error, format!("unknown var {name}")),
                CoreError::UnknownVar { name },
            )
        })
    }

    pub fn can_prove_shape_equal(&self, a: &Expr, b: &Expr) -> bool {
        if Rc::ptr_eq(a, b) {
            return true;
        }
        match (&a.kind, &b.kind) {
            (ExprKind::ShapeExpr(da), ExprKind::ShapeExpr(db)) => {
                da.len() == db.len()
                    && da
                        .iter()
                        .zip(db.iter())
                        .all(|(x, y)| x == y || self.oracle.can_prove_equal(x, y))
            }
            _ => false,
        }
    }

    fn infer_call(&self, call: &Expr) {
        if let Some(shape) = self.registry.infer_shape(call, &self.diag) {
            call.set_shape(shape);
        }
        let ty = self.registry.infer_type(call, &self.diag);
        call.set_checked_type(ty);
    }

    /// Idempotent: stamp inferred shape/type onto `expr` if it is a
    /// `Call`; pass non-calls through unchanged. Never fails — a missing
    /// inference rule simply leaves the corresponding slot unset and is
    /// not itself reported as a diagnostic (the registry may still choose
    /// to report one through the `DiagnosticContext` it was given).
    ///
    /// Unlike [`Self::emit`], the call's own `shape` slot is stamped only
    /// when the inferred shape is a `ShapeExpr` — other inferred-shape
    /// forms (e.g. `RuntimeDepShape`) are dropped here and left for the
    /// consumer to re-derive once the call is actually bound.
    pub fn normalize(&self, expr: Expr) -> Expr {
        if matches!(expr.kind, ExprKind::Call { .. }) {
            if let Some(shape) = self.registry.infer_shape(&expr, &self.diag) {
                if matches!(shape.kind, ExprKind::ShapeExpr(_)) {
                    expr.set_shape(shape);
                }
            }
            let ty = self.registry.infer_type(&expr, &self.diag);
            expr.set_checked_type(ty);
        }
        expr
    }
}

impl Drop for BlockBuilder {
    fn drop(&mut self) {
        if !self.frames.is_empty() {
            self.diag.emit(Diagnostic::warning(format!(
                "block builder dropped with {} open frame(s)",
                self.frames.len()
            )));
        }
    }
}
