//! The argument block handed to a compiled kernel's native entry point.
//!
//! One [`ArgSlot`] per declared argument: scalar slots hold the 64-bit
//! encoding of the value, external-array slots hold the buffer address
//! and its length in bytes. Template parameters have no slot; the slot
//! counter only advances past declared parameters.

use log::trace;

use crate::args::{ArrayLike, Extracted, KernelArg};
use crate::compiler::{CoreError, ExprNode, SlotId};
use crate::dtype::{PrimitiveType, Value};
use crate::error::ArgError;
use crate::kernel::{DeclaredKernel, ParamBinding};

/// One argument word plus the byte extent of an external array.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ArgSlot {
    /// Scalar bits, or the buffer address for an external array.
    pub bits: u64,
    /// Byte length of an external array; zero for scalars.
    pub extent: u64,
}

/// Arguments and return words for one kernel invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchContext {
    args: Vec<ArgSlot>,
    rets: Vec<u64>,
}

impl LaunchContext {
    pub fn new(num_args: usize, num_rets: usize) -> Self {
        Self {
            args: vec![ArgSlot::default(); num_args],
            rets: vec![0; num_rets],
        }
    }

    /// Build the argument block for one call of a declared kernel.
    ///
    /// `extracted` and `args` are the positional results and inputs of
    /// the same call. Buffers must match the element type and rank the
    /// kernel was declared with.
    pub fn pack(
        kernel: &DeclaredKernel,
        extracted: &[Extracted],
        args: &[KernelArg<'_>],
    ) -> Result<Self, ArgError> {
        let expected = kernel.params().len();
        for found in [extracted.len(), args.len()] {
            if found != expected {
                return Err(ArgError::ArityMismatch { expected, found });
            }
        }

        let mut ctx = Self::new(kernel.num_args(), usize::from(kernel.ret().is_some()));
        for (i, ((binding, value), arg)) in kernel
            .params()
            .iter()
            .zip(extracted)
            .zip(args)
            .enumerate()
        {
            let ParamBinding::Expr(expr) = binding else {
                continue;
            };
            match (value, arg) {
                (Extracted::Scalar(v), _) => ctx.set_arg(expr.slot(), *v)?,
                (Extracted::ExternalArray(info), KernelArg::Array(array)) => {
                    let ExprNode::ExternalTensor { dtype, dim, .. } = *expr.node() else {
                        return Err(ArgError::mismatch("scalar", "array").at(i));
                    };
                    if info.dtype != dtype || info.rank != dim {
                        return Err(ArgError::InvalidBuffer(format!(
                            "argument {}: kernel was declared for a {}-d {} buffer, got {}-d {}",
                            i, dim, dtype, info.rank, info.dtype
                        )));
                    }
                    let bytes = array.as_bytes();
                    ctx.set_arg_external_array(expr.slot(), bytes.as_ptr() as usize, bytes.len())?;
                }
                (Extracted::ExternalArray(_), other) => {
                    return Err(ArgError::mismatch("array", other.kind_name()).at(i))
                }
                (Extracted::Template(_), _) => {
                    return Err(ArgError::mismatch("scalar", "template").at(i))
                }
            }
        }
        Ok(ctx)
    }

    fn slot_mut(&mut self, slot: SlotId) -> Result<&mut ArgSlot, CoreError> {
        let len = self.args.len();
        self.args
            .get_mut(slot.index())
            .ok_or_else(|| CoreError::new(format!("argument slot {} out of range ({} slots)", slot, len)))
    }

    pub fn set_arg(&mut self, slot: SlotId, value: Value) -> Result<(), CoreError> {
        trace!("arg {} = {} ({})", slot, value, value.dtype());
        *self.slot_mut(slot)? = ArgSlot {
            bits: value.to_bits(),
            extent: 0,
        };
        Ok(())
    }

    pub fn set_arg_external_array(
        &mut self,
        slot: SlotId,
        address: usize,
        byte_len: usize,
    ) -> Result<(), CoreError> {
        trace!("arg {} = ext_arr @{:#x} ({} bytes)", slot, address, byte_len);
        *self.slot_mut(slot)? = ArgSlot {
            bits: address as u64,
            extent: byte_len as u64,
        };
        Ok(())
    }

    pub fn arg(&self, slot: SlotId) -> Option<ArgSlot> {
        self.args.get(slot.index()).copied()
    }

    /// Decode a scalar argument slot as `dtype`.
    pub fn get_arg(&self, slot: SlotId, dtype: PrimitiveType) -> Option<Value> {
        self.arg(slot).map(|s| Value::from_bits(dtype, s.bits))
    }

    pub fn args(&self) -> &[ArgSlot] {
        &self.args
    }

    /// The packed argument block.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.args)
    }

    /// Written by the kernel when it returns.
    pub fn set_ret(&mut self, slot: SlotId, value: Value) -> Result<(), CoreError> {
        let len = self.rets.len();
        let word = self
            .rets
            .get_mut(slot.index())
            .ok_or_else(|| CoreError::new(format!("return slot {} out of range ({} slots)", slot, len)))?;
        *word = value.to_bits();
        Ok(())
    }

    pub fn get_ret(&self, slot: SlotId, dtype: PrimitiveType) -> Result<Value, CoreError> {
        self.rets
            .get(slot.index())
            .map(|bits| Value::from_bits(dtype, *bits))
            .ok_or_else(|| CoreError::new(format!("return slot {} was not declared", slot)))
    }
}
