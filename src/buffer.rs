//! Byte-buffer helpers shared by every packer.
//!
//! All wire records are padding-free `#[repr(C)]` [`bytemuck::Pod`] types.
//! [`BigEndian`] swaps each field into target byte order, so appending a
//! record is a plain byte copy that cannot fail. Swapping is an
//! involution: the same call turns a big-endian record read off the wire
//! back into native order.

use std::{marker::PhantomData, ops::Range};

use bytemuck::Pod;

use crate::error::ComposeError;

/// Marks a reference field as "not applicable".
pub const UINT32_MAX: u32 = u32::MAX;

/// A fixed-layout value that can be converted to (and from) big-endian.
pub trait BigEndian: Pod {
    fn to_big_endian(self) -> Self;
}

macro_rules! big_endian_int {
    ($($ty:ty),*) => {
        $(impl BigEndian for $ty {
            fn to_big_endian(self) -> Self {
                self.to_be()
            }
        })*
    };
}

big_endian_int!(u8, i8, u16, i16, u32, i32);

impl BigEndian for f32 {
    fn to_big_endian(self) -> Self {
        f32::from_bits(self.to_bits().to_be())
    }
}

impl<T: BigEndian, const N: usize> BigEndian for [T; N] {
    fn to_big_endian(self) -> Self {
        self.map(T::to_big_endian)
    }
}

/// Implements [`BigEndian`] for a record by swapping every listed field.
/// All fields must be listed, padding included.
macro_rules! big_endian_record {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::buffer::BigEndian for $ty {
            fn to_big_endian(self) -> Self {
                Self {
                    $($field: $crate::buffer::BigEndian::to_big_endian(self.$field),)+
                }
            }
        }
    };
}
pub(crate) use big_endian_record;

/// Appends the minimum number of zero bytes so that `buffer.len()` becomes
/// a multiple of `alignment`.
pub fn pad_to_alignment(buffer: &mut Vec<u8>, alignment: usize) {
    let remainder = buffer.len() % alignment;
    if remainder != 0 {
        buffer.resize(buffer.len() + alignment - remainder, 0);
    }
}

pub fn append_big_endian<T: BigEndian>(buffer: &mut Vec<u8>, value: &T) {
    buffer.extend_from_slice(bytemuck::bytes_of(&value.to_big_endian()));
}

pub fn append_big_endian_slice<T: BigEndian>(buffer: &mut Vec<u8>, values: &[T]) {
    buffer.reserve(packed_size(values));
    for value in values {
        append_big_endian(buffer, value);
    }
}

/// Serialized length of `values`, without touching any buffer.
pub fn packed_size<T: Pod>(values: &[T]) -> usize {
    std::mem::size_of_val(values)
}

pub fn packed_size_of<T: Pod>() -> usize {
    std::mem::size_of::<T>()
}

/// Decodes one big-endian record from the start of `bytes`.
pub fn read_big_endian<T: BigEndian>(bytes: &[u8]) -> Option<T> {
    let bytes = bytes.get(..packed_size_of::<T>())?;
    bytemuck::try_pod_read_unaligned::<T>(bytes)
        .ok()
        .map(T::to_big_endian)
}

pub fn read_big_endian_at<T: BigEndian>(bytes: &[u8], offset: usize) -> Option<T> {
    read_big_endian(bytes.get(offset..)?)
}

/// A zeroed, fixed-size region whose final contents are only known once
/// later regions have been laid out.
#[must_use = "a reserved region stays zeroed until it is finalized"]
#[derive(Debug)]
pub struct Reserved<T> {
    offset: usize,
    _record: PhantomData<T>,
}

/// Appends a zeroed `T` and returns a handle to its byte range.
pub fn reserve<T: BigEndian>(buffer: &mut Vec<u8>) -> Reserved<T> {
    let offset = buffer.len();
    append_big_endian(buffer, &T::zeroed());
    Reserved {
        offset,
        _record: PhantomData,
    }
}

impl<T: BigEndian> Reserved<T> {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + packed_size_of::<T>()
    }

    /// Overwrites exactly the reserved range. Buffers only grow, so the
    /// range is still in bounds.
    pub fn finalize(self, buffer: &mut [u8], value: &T) {
        let range = self.range();
        buffer[range].copy_from_slice(bytemuck::bytes_of(&value.to_big_endian()));
    }
}

pub fn checked_u32(value: usize, what: &'static str) -> Result<u32, ComposeError> {
    u32::try_from(value).map_err(|_| ComposeError::Capacity {
        what,
        limit: u64::from(u32::MAX),
    })
}

/// The current end of `buffer` as a 32-bit wire offset.
pub fn offset_of(buffer: &[u8]) -> Result<u32, ComposeError> {
    checked_u32(buffer.len(), "output buffer")
}

/// Reads the NUL-terminated string starting at `offset`.
pub fn read_c_string(bytes: &[u8], offset: usize) -> Option<&str> {
    let tail = bytes.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0)?;
    std::str::from_utf8(&tail[..end]).ok()
}

/// Append-only table of NUL-terminated names. Entries are never
/// deduplicated; every push returns a fresh offset.
#[derive(Clone, Debug)]
pub struct StringTable {
    bytes: Vec<u8>,
    limit: Option<usize>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StringTable {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            limit: None,
        }
    }

    /// A table whose total length may never exceed `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn push(&mut self, name: &str) -> Result<u32, ComposeError> {
        if name.as_bytes().contains(&0) {
            return Err(ComposeError::encoding(format!(
                "name {name:?} contains a NUL byte"
            )));
        }
        let offset = self.bytes.len();
        if let Some(limit) = self.limit {
            if offset + name.len() + 1 > limit {
                return Err(ComposeError::Capacity {
                    what: "string table",
                    limit: limit as u64,
                });
            }
        }
        let offset = checked_u32(offset, "string table")?;
        self.bytes.extend_from_slice(name.as_bytes());
        self.bytes.push(0);
        Ok(offset)
    }

    pub fn get(&self, offset: u32) -> Option<&str> {
        read_c_string(&self.bytes, offset as usize)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn pad_to_alignment(&mut self, alignment: usize) {
        pad_to_alignment(&mut self.bytes, alignment);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
