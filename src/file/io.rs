//! Bounds-checked little-endian reading primitives used by the metadata parsers.

use crate::{Error::OutOfBounds, Result};

/// Primitive types that can be read from a little-endian byte buffer.
pub trait CilIO: Sized {
    /// Number of bytes this type occupies in the file.
    const SIZE: usize;

    /// Decodes the value from `data`, which is guaranteed to hold at least
    /// [`Self::SIZE`] bytes.
    fn from_le(data: &[u8]) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty),*) => {
        $(
            impl CilIO for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_le(data: &[u8]) -> Self {
                    let mut buffer = [0_u8; std::mem::size_of::<$ty>()];
                    buffer.copy_from_slice(&data[..std::mem::size_of::<$ty>()]);
                    <$ty>::from_le_bytes(buffer)
                }
            }
        )*
    };
}

impl_cil_io!(u8, u16, u32, u64);

/// Reads a `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too short.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    if data.len() < T::SIZE {
        return Err(OutOfBounds);
    }

    Ok(T::from_le(data))
}

/// Reads a `T` at `offset`, advancing `offset` past the value.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would exceed `data`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let Some(end) = offset.checked_add(T::SIZE) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let value = T::from_le(&data[*offset..end]);
    *offset = end;
    Ok(value)
}

/// Reads a heap or table index whose on-disk width depends on the binary:
/// 4 bytes if `large`, otherwise 2 bytes widened to `u32`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would exceed `data`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, large: bool) -> Result<u32> {
    if large {
        read_le_at::<u32>(data, offset)
    } else {
        Ok(u32::from(read_le_at::<u16>(data, offset)?))
    }
}
