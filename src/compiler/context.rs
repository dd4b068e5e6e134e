use log::debug;

use super::{CompilerCore, CoreError, Expr, ExprNode, SlotId};
use crate::config::{CoreConfig, TypeDefaults};
use crate::dtype::PrimitiveType;

/// A declared argument slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArgDecl {
    pub dtype: PrimitiveType,
    pub is_external_array: bool,
}

/// In-progress signature and expression graph of one kernel.
///
/// Slot ids are assigned densely in declaration order, arguments and
/// returns numbered independently. Dropping the context after a failed
/// declaration discards the partial signature.
pub struct KernelBuildContext {
    name: String,
    config: CoreConfig,
    args: Vec<ArgDecl>,
    rets: Vec<PrimitiveType>,
    exprs: Vec<Expr>,
}

impl KernelBuildContext {
    pub fn new(name: impl Into<String>, config: CoreConfig) -> Self {
        Self {
            name: name.into(),
            config,
            args: Vec::new(),
            rets: Vec::new(),
            exprs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Declared arguments, indexed by slot id.
    pub fn args(&self) -> &[ArgDecl] {
        &self.args
    }

    /// Declared return types, indexed by slot id.
    pub fn rets(&self) -> &[PrimitiveType] {
        &self.rets
    }

    /// Every expression built against this kernel, in creation order.
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    fn record(&mut self, node: ExprNode) -> Expr {
        let expr = Expr::new(node);
        self.exprs.push(expr.clone());
        expr
    }

    fn check_arg_slot(&self, slot: SlotId) {
        debug_assert!(
            slot.index() < self.args.len(),
            "expression references undeclared slot {}",
            slot
        );
    }
}

impl CompilerCore for KernelBuildContext {
    fn type_defaults(&self) -> TypeDefaults {
        self.config.types
    }

    fn declare_argument(
        &mut self,
        dtype: PrimitiveType,
        is_external_array: bool,
    ) -> Result<SlotId, CoreError> {
        if self.args.len() >= self.config.max_num_args {
            return Err(CoreError::new(format!(
                "kernel '{}' exceeds the maximum of {} arguments",
                self.name, self.config.max_num_args
            )));
        }
        let slot = SlotId(self.args.len() as u32);
        self.args.push(ArgDecl {
            dtype,
            is_external_array,
        });
        debug!(
            "{}: arg {} {}{}",
            self.name,
            slot,
            dtype,
            if is_external_array { " (ext_arr)" } else { "" }
        );
        Ok(slot)
    }

    fn declare_return(&mut self, dtype: PrimitiveType) -> Result<SlotId, CoreError> {
        if self.rets.len() >= self.config.max_num_rets {
            return Err(CoreError::new(format!(
                "kernel '{}' exceeds the maximum of {} return values",
                self.name, self.config.max_num_rets
            )));
        }
        let slot = SlotId(self.rets.len() as u32);
        self.rets.push(dtype);
        debug!("{}: ret {} {}", self.name, slot, dtype);
        Ok(slot)
    }

    fn make_arg_load_expr(&mut self, slot: SlotId, dtype: PrimitiveType) -> Expr {
        self.check_arg_slot(slot);
        self.record(ExprNode::ArgLoad { slot, dtype })
    }

    fn make_external_tensor_expr(&mut self, dtype: PrimitiveType, dim: usize, slot: SlotId) -> Expr {
        self.check_arg_slot(slot);
        self.record(ExprNode::ExternalTensor { dtype, dim, slot })
    }
}
