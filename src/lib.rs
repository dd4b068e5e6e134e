//! Kernel argument declaration and marshaling.
//!
//! Translates user-supplied kernel arguments (scalars, external array
//! buffers, and opaque template objects) into what a JIT compiler core
//! consumes:
//!
//! ```text
//! definition:  ArgKind ─→ declare ─→ CompilerCore slots ─→ Expr
//! call:        KernelArg ─→ extract ─→ Extracted ─→ LaunchContext
//! ```
//!
//! The compiler core itself is behind the [`CompilerCore`] trait;
//! [`KernelBuildContext`] is the in-process implementation.

pub mod args;
pub mod compiler;
pub mod config;
pub mod declare;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod launch;

pub use args::{
    ArgKind, ArrayInfo, ArrayLike, Element, Extracted, ExternalArray, HostArray, KernelArg,
    NativeHandle, SNodeRef, ScalarArg, Template, TemplateArg, TemplateValue,
};
pub use compiler::{
    ArgDecl, CompilerCore, CoreError, Expr, ExprNode, KernelBuildContext, RawExprHandle, SlotId,
};
pub use config::{CoreConfig, TypeDefaults};
pub use declare::{declare_ext_arr_arg, declare_scalar_arg, declare_scalar_ret};
pub use dtype::{cook_dtype, to_primitive_type, DTypeSpec, PrimitiveType, Value};
pub use error::{ArgError, ConfigError};
pub use kernel::{DeclaredKernel, KernelSignature, ParamBinding};
pub use launch::{ArgSlot, LaunchContext};
