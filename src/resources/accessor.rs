//! Decoding of accessor contents out of little-endian glTF buffers.
//!
//! Handles interleaved views (byte stride), matrix columns padded to four
//! bytes and sparse substitution. A sparse accessor without a base view
//! reads as zeros before substitution.

use gltf::accessor::{sparse::IndexType, DataType, Dimensions};

use crate::{data_structures::scene::AccessorData, error::ComposeError};

/// How one element of an accessor is laid out inside a buffer view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementLayout {
    pub component_size: usize,
    pub columns: usize,
    pub rows: usize,
    /// Distance between the starts of two matrix columns.
    pub column_stride: usize,
}

impl ElementLayout {
    pub fn new(data_type: DataType, dimensions: Dimensions) -> Self {
        let component_size = data_type.size();
        let (columns, rows) = match dimensions {
            Dimensions::Mat2 => (2, 2),
            Dimensions::Mat3 => (3, 3),
            Dimensions::Mat4 => (4, 4),
            other => (1, other.multiplicity()),
        };
        let column_stride = if columns > 1 {
            (rows * component_size).next_multiple_of(4)
        } else {
            rows * component_size
        };
        Self {
            component_size,
            columns,
            rows,
            column_stride,
        }
    }

    /// Bytes of one element once column padding is removed.
    pub fn packed_size(&self) -> usize {
        self.columns * self.rows * self.component_size
    }

    /// Stride of tightly packed elements inside a buffer view.
    pub fn default_stride(&self) -> usize {
        self.columns * self.column_stride
    }

    /// Bytes an element actually touches, trailing column padding excluded.
    pub fn span(&self) -> usize {
        (self.columns - 1) * self.column_stride + self.rows * self.component_size
    }

    /// Copies one element from buffer layout into packed layout.
    pub fn unpad(&self, source: &[u8], target: &mut [u8]) {
        let column_bytes = self.rows * self.component_size;
        for column in 0..self.columns {
            let from = column * self.column_stride;
            let to = column * column_bytes;
            target[to..to + column_bytes].copy_from_slice(&source[from..from + column_bytes]);
        }
    }
}

fn view_bytes<'a>(
    view: &gltf::buffer::View,
    buffers: &'a [gltf::buffer::Data],
) -> Result<&'a [u8], ComposeError> {
    let buffer = buffers.get(view.buffer().index()).ok_or_else(|| {
        ComposeError::encoding(format!("buffer view {} has no loaded buffer", view.index()))
    })?;
    buffer
        .0
        .get(view.offset()..view.offset() + view.length())
        .ok_or_else(|| {
            ComposeError::encoding(format!("buffer view {} exceeds its buffer", view.index()))
        })
}

fn element_bytes<'a>(
    bytes: &'a [u8],
    start: usize,
    layout: &ElementLayout,
) -> Result<&'a [u8], ComposeError> {
    bytes
        .get(start..start + layout.span())
        .ok_or_else(|| ComposeError::encoding("accessor element exceeds its buffer view"))
}

/// Reads every element of `accessor` into flat, native-order components.
pub fn read_accessor(
    accessor: &gltf::Accessor,
    buffers: &[gltf::buffer::Data],
) -> Result<AccessorData, ComposeError> {
    let layout = ElementLayout::new(accessor.data_type(), accessor.dimensions());
    let element_size = layout.packed_size();
    let mut raw = vec![0u8; accessor.count() * element_size];

    if let Some(view) = accessor.view() {
        let bytes = view_bytes(&view, buffers)?;
        let stride = view.stride().unwrap_or(layout.default_stride());
        for (index, target) in raw.chunks_exact_mut(element_size).enumerate() {
            let source = element_bytes(bytes, accessor.offset() + index * stride, &layout)?;
            layout.unpad(source, target);
        }
    }

    if let Some(sparse) = accessor.sparse() {
        let count = sparse.count() as usize;
        let indices = sparse.indices();
        let index_bytes = view_bytes(&indices.view(), buffers)?;
        let index_size = match indices.index_type() {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        };
        let values = sparse.values();
        let value_bytes = view_bytes(&values.view(), buffers)?;

        for entry in 0..count {
            let at = indices.offset() as usize + entry * index_size;
            let index = index_bytes
                .get(at..at + index_size)
                .map(read_le_index)
                .ok_or_else(|| ComposeError::encoding("sparse index exceeds its buffer view"))?;
            let target = raw
                .get_mut(index * element_size..(index + 1) * element_size)
                .ok_or_else(|| {
                    ComposeError::encoding(format!(
                        "sparse index {index} exceeds accessor count {}",
                        accessor.count()
                    ))
                })?;
            let start = values.offset() as usize + entry * layout.default_stride();
            layout.unpad(element_bytes(value_bytes, start, &layout)?, target);
        }
    }

    Ok(decode_components(accessor.data_type(), &raw))
}

fn read_le_index(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .rev()
        .fold(0, |value, &byte| (value << 8) | usize::from(byte))
}

fn from_le<T, const N: usize>(raw: &[u8], convert: fn([u8; N]) -> T) -> Vec<T> {
    raw.chunks_exact(N)
        .map(|chunk| {
            let mut bytes = [0; N];
            bytes.copy_from_slice(chunk);
            convert(bytes)
        })
        .collect()
}

/// Splits packed little-endian bytes into typed components.
pub fn decode_components(data_type: DataType, raw: &[u8]) -> AccessorData {
    match data_type {
        DataType::I8 => AccessorData::I8(from_le(raw, i8::from_le_bytes)),
        DataType::U8 => AccessorData::U8(raw.to_vec()),
        DataType::I16 => AccessorData::I16(from_le(raw, i16::from_le_bytes)),
        DataType::U16 => AccessorData::U16(from_le(raw, u16::from_le_bytes)),
        DataType::U32 => AccessorData::U32(from_le(raw, u32::from_le_bytes)),
        DataType::F32 => AccessorData::F32(from_le(raw, f32::from_le_bytes)),
    }
}
