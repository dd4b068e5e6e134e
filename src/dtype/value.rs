use std::fmt;

use super::PrimitiveType;

/// A typed scalar as passed to, or returned from, a kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

macro_rules! impl_from_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
);

/// `as`-cast whatever payload `$self` holds into `Value::$variant`.
macro_rules! cast_to {
    ($self:expr, $variant:ident, $t:ty) => {
        match $self {
            Value::I8(v) => Value::$variant(v as $t),
            Value::I16(v) => Value::$variant(v as $t),
            Value::I32(v) => Value::$variant(v as $t),
            Value::I64(v) => Value::$variant(v as $t),
            Value::U8(v) => Value::$variant(v as $t),
            Value::U16(v) => Value::$variant(v as $t),
            Value::U32(v) => Value::$variant(v as $t),
            Value::U64(v) => Value::$variant(v as $t),
            Value::F32(v) => Value::$variant(v as $t),
            Value::F64(v) => Value::$variant(v as $t),
        }
    };
}

impl Value {
    pub fn dtype(&self) -> PrimitiveType {
        match self {
            Value::I8(_) => PrimitiveType::I8,
            Value::I16(_) => PrimitiveType::I16,
            Value::I32(_) => PrimitiveType::I32,
            Value::I64(_) => PrimitiveType::I64,
            Value::U8(_) => PrimitiveType::U8,
            Value::U16(_) => PrimitiveType::U16,
            Value::U32(_) => PrimitiveType::U32,
            Value::U64(_) => PrimitiveType::U64,
            Value::F32(_) => PrimitiveType::F32,
            Value::F64(_) => PrimitiveType::F64,
        }
    }

    /// Convert to `ty` with Rust `as` semantics (truncating, saturating
    /// float-to-int). Identity when the type already matches.
    pub fn cast(self, ty: PrimitiveType) -> Value {
        if self.dtype() == ty {
            return self;
        }
        match ty {
            PrimitiveType::I8 => cast_to!(self, I8, i8),
            PrimitiveType::I16 => cast_to!(self, I16, i16),
            PrimitiveType::I32 => cast_to!(self, I32, i32),
            PrimitiveType::I64 => cast_to!(self, I64, i64),
            PrimitiveType::U8 => cast_to!(self, U8, u8),
            PrimitiveType::U16 => cast_to!(self, U16, u16),
            PrimitiveType::U32 => cast_to!(self, U32, u32),
            PrimitiveType::U64 => cast_to!(self, U64, u64),
            PrimitiveType::F32 => cast_to!(self, F32, f32),
            PrimitiveType::F64 => cast_to!(self, F64, f64),
        }
    }

    /// Encode into one 64-bit argument word.
    ///
    /// Signed integers are sign-extended, unsigned zero-extended; floats
    /// keep their IEEE bits, f32 in the low half.
    pub fn to_bits(self) -> u64 {
        match self {
            Value::I8(v) => v as i64 as u64,
            Value::I16(v) => v as i64 as u64,
            Value::I32(v) => v as i64 as u64,
            Value::I64(v) => v as u64,
            Value::U8(v) => v as u64,
            Value::U16(v) => v as u64,
            Value::U32(v) => v as u64,
            Value::U64(v) => v,
            Value::F32(v) => v.to_bits() as u64,
            Value::F64(v) => v.to_bits(),
        }
    }

    /// Decode an argument or return word written by [`Value::to_bits`].
    pub fn from_bits(ty: PrimitiveType, bits: u64) -> Value {
        match ty {
            PrimitiveType::I8 => Value::I8(bits as i8),
            PrimitiveType::I16 => Value::I16(bits as i16),
            PrimitiveType::I32 => Value::I32(bits as i32),
            PrimitiveType::I64 => Value::I64(bits as i64),
            PrimitiveType::U8 => Value::U8(bits as u8),
            PrimitiveType::U16 => Value::U16(bits as u16),
            PrimitiveType::U32 => Value::U32(bits as u32),
            PrimitiveType::U64 => Value::U64(bits),
            PrimitiveType::F32 => Value::F32(f32::from_bits(bits as u32)),
            PrimitiveType::F64 => Value::F64(f64::from_bits(bits)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
        }
    }
}
