//! Kernel signatures: ordered parameter descriptors plus an optional
//! return type, driving extraction and declaration for a whole kernel.
//!
//! At call time the caller's arguments are extracted positionally. The
//! first call also declares the kernel: one slot per scalar or external
//! array parameter, in parameter order, with external-array element
//! type and rank taken from what was extracted. Template parameters are
//! bound to their extracted value and take no slot.

use std::fmt;

use log::debug;

use crate::args::{ArgKind, Extracted, KernelArg, ScalarArg, TemplateValue};
use crate::compiler::{CompilerCore, Expr, SlotId};
use crate::declare::{declare_ext_arr_arg, declare_scalar_arg, declare_scalar_ret};
use crate::error::ArgError;

/// Formal parameters and return type of a kernel.
#[derive(Clone, Debug)]
pub struct KernelSignature {
    params: Vec<ArgKind>,
    ret: Option<ScalarArg>,
}

/// What a parameter is bound to inside the traced kernel body.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamBinding {
    /// A declared slot, read through this expression.
    Expr(Expr),
    /// A template parameter's resolved value.
    Template(TemplateValue),
}

/// The result of declaring a kernel signature against a compiler core.
#[derive(Clone, Debug)]
pub struct DeclaredKernel {
    params: Vec<ParamBinding>,
    ret: Option<SlotId>,
}

impl KernelSignature {
    pub fn new(params: Vec<ArgKind>, ret: Option<ScalarArg>) -> Self {
        Self { params, ret }
    }

    pub fn params(&self) -> &[ArgKind] {
        &self.params
    }

    pub fn ret(&self) -> Option<&ScalarArg> {
        self.ret.as_ref()
    }

    /// Number of parameters that occupy a typed argument slot.
    pub fn num_declared_args(&self) -> usize {
        self.params.iter().filter(|p| p.is_declared()).count()
    }

    fn check_arity(&self, found: usize) -> Result<(), ArgError> {
        if found != self.params.len() {
            return Err(ArgError::ArityMismatch {
                expected: self.params.len(),
                found,
            });
        }
        Ok(())
    }

    /// Extract every argument through its parameter's descriptor.
    ///
    /// Stops at the first failure; extraction touches no shared state so
    /// there is nothing to undo.
    pub fn extract(&self, args: &[KernelArg<'_>]) -> Result<Vec<Extracted>, ArgError> {
        self.check_arity(args.len())?;
        self.params
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, (param, arg))| param.extract(arg).map_err(|e| e.at(i)))
            .collect()
    }

    /// Declare this signature on `core`, one slot per non-template
    /// parameter in order, then the return slot.
    pub fn declare<C: CompilerCore>(
        &self,
        core: &mut C,
        extracted: &[Extracted],
    ) -> Result<DeclaredKernel, ArgError> {
        self.check_arity(extracted.len())?;
        let mut params = Vec::with_capacity(self.params.len());
        for (i, (param, value)) in self.params.iter().zip(extracted).enumerate() {
            let binding = match (param, value) {
                (ArgKind::Scalar(s), Extracted::Scalar(_)) => {
                    ParamBinding::Expr(declare_scalar_arg(core, s.dtype())?)
                }
                (ArgKind::ExternalArray(_), Extracted::ExternalArray(info)) => {
                    ParamBinding::Expr(declare_ext_arr_arg(core, info.dtype, info.rank)?)
                }
                (ArgKind::Template(_), Extracted::Template(v)) => ParamBinding::Template(v.clone()),
                (ArgKind::Scalar(_), other) => {
                    return Err(ArgError::mismatch("scalar", other.kind_name()).at(i))
                }
                (ArgKind::ExternalArray(_), other) => {
                    return Err(ArgError::mismatch("array", other.kind_name()).at(i))
                }
                (ArgKind::Template(_), other) => {
                    return Err(ArgError::mismatch("template", other.kind_name()).at(i))
                }
            };
            params.push(binding);
        }
        let ret = match &self.ret {
            Some(r) => Some(declare_scalar_ret(core, r.dtype())?),
            None => None,
        };
        debug!("declared kernel {}", self);
        Ok(DeclaredKernel { params, ret })
    }
}

impl fmt::Display for KernelSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "({})", params.join(", "))?;
        if let Some(ret) = &self.ret {
            write!(f, " -> {}", ret.dtype())?;
        }
        Ok(())
    }
}

impl DeclaredKernel {
    /// Bindings in parameter order.
    pub fn params(&self) -> &[ParamBinding] {
        &self.params
    }

    pub fn ret(&self) -> Option<SlotId> {
        self.ret
    }

    /// Number of declared argument slots.
    pub fn num_args(&self) -> usize {
        self.params
            .iter()
            .filter(|p| matches!(p, ParamBinding::Expr(_)))
            .count()
    }

    /// The expression bound to parameter `index`, if it was declared.
    pub fn expr(&self, index: usize) -> Option<&Expr> {
        match self.params.get(index)? {
            ParamBinding::Expr(e) => Some(e),
            ParamBinding::Template(_) => None,
        }
    }
}
