//! Declaration step: register argument and return slots with the core.
//!
//! Each call normalizes the dtype and appends one slot to the kernel
//! being traced. Errors from the core pass through unchanged.

use log::debug;

use crate::compiler::{CompilerCore, Expr, SlotId};
use crate::dtype::{cook_dtype, DTypeSpec};
use crate::error::ArgError;

/// Declare a scalar argument and return the expression that reads it.
pub fn declare_scalar_arg<C: CompilerCore>(
    core: &mut C,
    dtype: impl Into<DTypeSpec>,
) -> Result<Expr, ArgError> {
    let dtype = cook_dtype(&dtype.into(), &core.type_defaults())?;
    let slot = core.declare_argument(dtype, false)?;
    debug!("declared scalar arg {} as {}", slot, dtype);
    Ok(core.make_arg_load_expr(slot, dtype))
}

/// Declare an external array argument of rank `dim`.
pub fn declare_ext_arr_arg<C: CompilerCore>(
    core: &mut C,
    dtype: impl Into<DTypeSpec>,
    dim: usize,
) -> Result<Expr, ArgError> {
    let dtype = cook_dtype(&dtype.into(), &core.type_defaults())?;
    let slot = core.declare_argument(dtype, true)?;
    debug!("declared ext_arr arg {} as {} (dim={})", slot, dtype, dim);
    Ok(core.make_external_tensor_expr(dtype, dim, slot))
}

/// Declare a scalar return value.
///
/// A return slot is written by the kernel body, never read, so the bare
/// slot id is returned instead of an expression.
pub fn declare_scalar_ret<C: CompilerCore>(
    core: &mut C,
    dtype: impl Into<DTypeSpec>,
) -> Result<SlotId, ArgError> {
    let dtype = cook_dtype(&dtype.into(), &core.type_defaults())?;
    let slot = core.declare_return(dtype)?;
    debug!("declared scalar ret {} as {}", slot, dtype);
    Ok(slot)
}
