//! Argument descriptors.
//!
//! Each formal parameter of a kernel carries an [`ArgKind`] saying how it
//! is declared to the compiler core and how a caller-supplied value is
//! turned into what the compiled kernel's calling convention expects:
//!
//! - `Scalar`: declared as a typed argument slot; extracts a [`Value`]
//!   converted to the declared type.
//! - `ExternalArray`: declared as an external-tensor slot; extracts the
//!   buffer's element type and rank.
//! - `Template`: never declared; extracts a native reference resolved by
//!   what the object is.

mod array;
mod template;
#[cfg(test)]
mod tests;

use std::fmt;

use log::trace;

use crate::config::TypeDefaults;
use crate::dtype::{cook_dtype, to_primitive_type, DTypeSpec, PrimitiveType, Value};
use crate::error::ArgError;

pub use array::{ArrayLike, Element, HostArray};
pub use template::{NativeHandle, SNodeRef, TemplateArg, TemplateValue};

/// A positional argument supplied at kernel call time.
#[derive(Clone, Copy)]
pub enum KernelArg<'a> {
    Scalar(Value),
    Array(&'a dyn ArrayLike),
    Template(&'a TemplateArg),
}

impl<'a> KernelArg<'a> {
    pub fn scalar(v: impl Into<Value>) -> Self {
        KernelArg::Scalar(v.into())
    }

    pub fn array(a: &'a dyn ArrayLike) -> Self {
        KernelArg::Array(a)
    }

    pub fn template(t: &'a TemplateArg) -> Self {
        KernelArg::Template(t)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            KernelArg::Scalar(_) => "scalar",
            KernelArg::Array(_) => "array",
            KernelArg::Template(_) => "template",
        }
    }
}

impl fmt::Debug for KernelArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelArg::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            KernelArg::Array(a) => f
                .debug_struct("Array")
                .field("dtype", &a.dtype_name())
                .field("shape", &a.shape())
                .finish(),
            KernelArg::Template(t) => f.debug_tuple("Template").field(t).finish(),
        }
    }
}

/// Element type and rank of an external array argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayInfo {
    pub dtype: PrimitiveType,
    pub rank: usize,
}

/// The result of extracting one argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Extracted {
    Scalar(Value),
    ExternalArray(ArrayInfo),
    Template(TemplateValue),
}

impl Extracted {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Extracted::Scalar(_) => "scalar",
            Extracted::ExternalArray(_) => "array",
            Extracted::Template(_) => "template",
        }
    }
}

/// A scalar parameter of a fixed primitive type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarArg {
    dtype: PrimitiveType,
}

impl ScalarArg {
    /// Normalizes `dtype`; fails if it names no supported numeric type.
    pub fn new(dtype: impl Into<DTypeSpec>, defaults: &TypeDefaults) -> Result<Self, ArgError> {
        Ok(Self {
            dtype: cook_dtype(&dtype.into(), defaults)?,
        })
    }

    pub fn dtype(&self) -> PrimitiveType {
        self.dtype
    }

    /// The caller's scalar, converted to the declared type.
    pub fn extract(&self, x: &KernelArg<'_>) -> Result<Value, ArgError> {
        match x {
            KernelArg::Scalar(v) => Ok(v.cast(self.dtype)),
            other => Err(ArgError::mismatch("scalar", other.kind_name())),
        }
    }
}

/// A caller-owned buffer passed by reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExternalArray {
    dim: usize,
}

impl ExternalArray {
    /// Only one-dimensional external arrays are supported.
    pub fn new(dim: usize) -> Result<Self, ArgError> {
        if dim != 1 {
            return Err(ArgError::UnsupportedDimension(dim));
        }
        Ok(Self { dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element type and rank of the passed buffer.
    ///
    /// The rank is reported as the buffer has it; it is not checked
    /// against `dim`.
    pub fn extract(&self, x: &KernelArg<'_>) -> Result<ArrayInfo, ArgError> {
        let KernelArg::Array(array) = x else {
            return Err(ArgError::InvalidBuffer(format!(
                "a {} argument has no shape or dtype",
                x.kind_name()
            )));
        };
        let name = array
            .dtype_name()
            .ok_or_else(|| ArgError::InvalidBuffer("buffer has no dtype".to_string()))?;
        let shape = array
            .shape()
            .ok_or_else(|| ArgError::InvalidBuffer("buffer has no shape".to_string()))?;
        Ok(ArrayInfo {
            dtype: to_primitive_type(name)?,
            rank: shape.len(),
        })
    }
}

impl Default for ExternalArray {
    fn default() -> Self {
        Self { dim: 1 }
    }
}

/// An opaque pass-through parameter, resolved by identity.
#[derive(Clone, Debug, Default)]
pub struct Template {
    bound: Option<TemplateArg>,
    dim: Option<usize>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// A template annotation tied to a particular object.
    pub fn bound_to(object: TemplateArg, dim: Option<usize>) -> Self {
        Self {
            bound: Some(object),
            dim,
        }
    }

    pub fn bound(&self) -> Option<&TemplateArg> {
        self.bound.as_ref()
    }

    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Resolve the caller's object to a native reference.
    ///
    /// Scalars and buffers have none of the template capabilities and
    /// come back as they are: a buffer resolves to its own storage.
    pub fn extract(&self, x: &KernelArg<'_>) -> Result<TemplateValue, ArgError> {
        let value = match x {
            KernelArg::Template(t) => t.extract(),
            KernelArg::Scalar(v) => TemplateValue::Value(*v),
            KernelArg::Array(array) => {
                let bytes = array.as_bytes();
                TemplateValue::Array {
                    address: bytes.as_ptr() as usize,
                    byte_len: bytes.len(),
                }
            }
        };
        Ok(value)
    }
}

/// How one formal parameter is declared and extracted.
#[derive(Clone, Debug)]
pub enum ArgKind {
    Scalar(ScalarArg),
    ExternalArray(ExternalArray),
    Template(Template),
}

impl ArgKind {
    pub fn scalar(dtype: impl Into<DTypeSpec>, defaults: &TypeDefaults) -> Result<Self, ArgError> {
        ScalarArg::new(dtype, defaults).map(ArgKind::Scalar)
    }

    pub fn ext_arr(dim: usize) -> Result<Self, ArgError> {
        ExternalArray::new(dim).map(ArgKind::ExternalArray)
    }

    pub fn template() -> Self {
        ArgKind::Template(Template::new())
    }

    /// Whether the parameter occupies a typed slot in the signature.
    pub fn is_declared(&self) -> bool {
        !matches!(self, ArgKind::Template(_))
    }

    pub fn extract(&self, x: &KernelArg<'_>) -> Result<Extracted, ArgError> {
        let extracted = match self {
            ArgKind::Scalar(s) => Extracted::Scalar(s.extract(x)?),
            ArgKind::ExternalArray(a) => Extracted::ExternalArray(a.extract(x)?),
            ArgKind::Template(t) => Extracted::Template(t.extract(x)?),
        };
        trace!("extract {} as {}: {:?}", x.kind_name(), self, extracted);
        Ok(extracted)
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Scalar(s) => write!(f, "{}", s.dtype),
            ArgKind::ExternalArray(a) => write!(f, "ext_arr(dim={})", a.dim),
            ArgKind::Template(_) => f.write_str("template"),
        }
    }
}
