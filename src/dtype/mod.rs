//! Primitive element types and dtype normalization.
//!
//! Every declaration runs the caller's dtype through [`cook_dtype`]
//! before it reaches the compiler core. Generic `float` / `int` resolve
//! to the configured defaults; textual names are looked up in a fixed
//! table. Nothing outside that table is accepted.

mod value;

use std::fmt;
use std::str::FromStr;

use crate::config::TypeDefaults;
use crate::error::ArgError;

pub use value::Value;

/// Primitive element type recognized by the compiler core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 10] = [
        PrimitiveType::I8,
        PrimitiveType::I16,
        PrimitiveType::I32,
        PrimitiveType::I64,
        PrimitiveType::U8,
        PrimitiveType::U16,
        PrimitiveType::U32,
        PrimitiveType::U64,
        PrimitiveType::F32,
        PrimitiveType::F64,
    ];

    /// Canonical short name (`i32`, `f64`, ...).
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::I8 => "i8",
            PrimitiveType::I16 => "i16",
            PrimitiveType::I32 => "i32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U64 => "u64",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
        }
    }

    pub fn is_real(self) -> bool {
        matches!(self, PrimitiveType::F32 | PrimitiveType::F64)
    }

    pub fn is_integral(self) -> bool {
        !self.is_real()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveType::I8
                | PrimitiveType::I16
                | PrimitiveType::I32
                | PrimitiveType::I64
                | PrimitiveType::F32
                | PrimitiveType::F64
        )
    }

    /// Element size in bytes.
    pub fn size_of(self) -> usize {
        match self {
            PrimitiveType::I8 | PrimitiveType::U8 => 1,
            PrimitiveType::I16 | PrimitiveType::U16 => 2,
            PrimitiveType::I32 | PrimitiveType::U32 | PrimitiveType::F32 => 4,
            PrimitiveType::I64 | PrimitiveType::U64 | PrimitiveType::F64 => 8,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveType {
    type Err = ArgError;

    /// Concrete names only; `float` and `int` are not primitive types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        to_primitive_type(s)
    }
}

/// A dtype as written by the caller, before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DTypeSpec {
    Primitive(PrimitiveType),
    /// Generic real; resolves to the default float type.
    Float,
    /// Generic integer; resolves to the default integer type.
    Int,
    Named(String),
}

impl From<PrimitiveType> for DTypeSpec {
    fn from(ty: PrimitiveType) -> Self {
        DTypeSpec::Primitive(ty)
    }
}

impl From<&str> for DTypeSpec {
    fn from(name: &str) -> Self {
        DTypeSpec::Named(name.to_string())
    }
}

impl From<String> for DTypeSpec {
    fn from(name: String) -> Self {
        DTypeSpec::Named(name)
    }
}

/// Normalize a caller-supplied dtype to a primitive type.
pub fn cook_dtype(spec: &DTypeSpec, defaults: &TypeDefaults) -> Result<PrimitiveType, ArgError> {
    match spec {
        DTypeSpec::Primitive(ty) => Ok(*ty),
        DTypeSpec::Float => Ok(defaults.default_fp),
        DTypeSpec::Int => Ok(defaults.default_ip),
        DTypeSpec::Named(name) => match name.trim() {
            "float" => Ok(defaults.default_fp),
            "int" => Ok(defaults.default_ip),
            other => to_primitive_type(other),
        },
    }
}

/// Map a buffer's element-type name to a primitive type.
///
/// Accepts short names (`f32`) and long names (`float32`). A buffer
/// always carries a concrete type, so `float` / `int` are rejected here.
pub fn to_primitive_type(name: &str) -> Result<PrimitiveType, ArgError> {
    let ty = match name.trim() {
        "i8" | "int8" => PrimitiveType::I8,
        "i16" | "int16" => PrimitiveType::I16,
        "i32" | "int32" => PrimitiveType::I32,
        "i64" | "int64" => PrimitiveType::I64,
        "u8" | "uint8" => PrimitiveType::U8,
        "u16" | "uint16" => PrimitiveType::U16,
        "u32" | "uint32" => PrimitiveType::U32,
        "u64" | "uint64" => PrimitiveType::U64,
        "f32" | "float32" => PrimitiveType::F32,
        "f64" | "float64" => PrimitiveType::F64,
        _ => return Err(ArgError::UnsupportedType(name.to_string())),
    };
    Ok(ty)
}
