use crate::dtype::PrimitiveType;
use crate::error::ArgError;

/// A buffer-like object that can be passed as an external array.
///
/// Foreign buffers describe their element type by name; an object that
/// cannot report a dtype or a shape is not accepted as an array.
pub trait ArrayLike {
    /// Element-type name, e.g. `"float32"` or `"i64"`.
    fn dtype_name(&self) -> Option<&str>;

    /// Dimension sizes, outermost first.
    fn shape(&self) -> Option<&[usize]>;

    /// The buffer's contents.
    fn as_bytes(&self) -> &[u8];
}

/// Element types a [`HostArray`] can hold.
pub trait Element: bytemuck::Pod {
    const DTYPE: PrimitiveType;
}

macro_rules! impl_element {
    ($($t:ty => $ty:ident),* $(,)?) => {
        $( impl Element for $t { const DTYPE: PrimitiveType = PrimitiveType::$ty; } )*
    };
}

impl_element!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
);

/// An owned, contiguous host buffer with a shape.
///
/// Storage is 8-byte words so that a typed view of any element type is
/// correctly aligned.
#[derive(Clone, Debug, PartialEq)]
pub struct HostArray {
    dtype: PrimitiveType,
    shape: Vec<usize>,
    len: usize,
    words: Vec<u64>,
}

impl HostArray {
    /// Copy `data` into a new array of the given shape.
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize]) -> Result<Self, ArgError> {
        let len = element_count(T::DTYPE, shape)?;
        if len != data.len() {
            return Err(ArgError::InvalidBuffer(format!(
                "shape {:?} holds {} elements but {} were given",
                shape,
                len,
                data.len()
            )));
        }
        let mut array = Self::with_len(T::DTYPE, shape.to_vec(), len);
        array.typed_mut::<T>().copy_from_slice(data);
        Ok(array)
    }

    /// A one-dimensional array over `data`.
    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        let mut array = Self::with_len(T::DTYPE, vec![data.len()], data.len());
        array.typed_mut::<T>().copy_from_slice(&data);
        array
    }

    pub fn zeros(dtype: PrimitiveType, shape: &[usize]) -> Result<Self, ArgError> {
        let len = element_count(dtype, shape)?;
        Ok(Self::with_len(dtype, shape.to_vec(), len))
    }

    fn with_len(dtype: PrimitiveType, shape: Vec<usize>, len: usize) -> Self {
        let bytes = len * dtype.size_of();
        Self {
            dtype,
            shape,
            len,
            words: vec![0u64; bytes.div_ceil(8)],
        }
    }

    pub fn dtype(&self) -> PrimitiveType {
        self.dtype
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Typed view, or `None` if `T` is not the element type.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        if T::DTYPE != self.dtype {
            return None;
        }
        Some(&bytemuck::cast_slice::<u64, T>(&self.words)[..self.len])
    }

    /// Mutable typed view, or `None` if `T` is not the element type.
    pub fn as_mut_slice<T: Element>(&mut self) -> Option<&mut [T]> {
        if T::DTYPE != self.dtype {
            return None;
        }
        Some(self.typed_mut::<T>())
    }

    fn typed_mut<T: Element>(&mut self) -> &mut [T] {
        &mut bytemuck::cast_slice_mut::<u64, T>(&mut self.words)[..self.len]
    }
}

/// Number of elements in `shape`; fails if it or its byte size does not
/// fit in `usize`.
fn element_count(dtype: PrimitiveType, shape: &[usize]) -> Result<usize, ArgError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|len| len.checked_mul(dtype.size_of()).is_some())
        .ok_or_else(|| ArgError::InvalidBuffer(format!("shape {:?} of {} overflows", shape, dtype)))
}

impl ArrayLike for HostArray {
    fn dtype_name(&self) -> Option<&str> {
        Some(self.dtype.name())
    }

    fn shape(&self) -> Option<&[usize]> {
        Some(&self.shape)
    }

    fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.len * self.dtype.size_of()]
    }
}
