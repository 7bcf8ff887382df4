use anyhow::Result;
use gltf::accessor::Dimensions;

use crate::{
    buffer::{append_big_endian_slice, checked_u32, offset_of, pad_to_alignment, BigEndian},
    data_structures::{
        pak::{
            lookup_code, AccessorRecord, COMPONENT_TYPE_CODES, ELEMENT_TYPE_CODES,
            TABLE_ALIGNMENT,
        },
        scene::AccessorData,
    },
    error::ComposeError,
    pack::{append_table, ModelTables, Pak},
};

pub(crate) fn pack_accessors(model: &mut ModelTables, pak: &mut Pak) -> Result<()> {
    let mut records = Vec::with_capacity(model.asset.accessors.len());

    for (index, accessor) in model.asset.accessors.iter().enumerate() {
        let element_type = lookup_code(&ELEMENT_TYPE_CODES, &accessor.dimensions).ok_or_else(
            || ComposeError::encoding(format!("accessor {index} has no element type code")),
        )?;
        let data_type = accessor.data.data_type();
        let component_type = lookup_code(&COMPONENT_TYPE_CODES, &data_type).ok_or_else(|| {
            ComposeError::encoding(format!("accessor {index} has no code for {data_type:?}"))
        })?;
        let expected = accessor.count * accessor.dimensions.multiplicity();
        if accessor.data.len() != expected {
            return Err(ComposeError::encoding(format!(
                "accessor {index} holds {} components, expected {expected}",
                accessor.data.len()
            ))
            .into());
        }

        let name = pak.strings.push(&accessor.name)?;

        pad_to_alignment(&mut pak.buffer, TABLE_ALIGNMENT);
        let data_offset = offset_of(&pak.buffer)?;
        append_accessor_data(&mut pak.buffer, &accessor.data, accessor.dimensions);

        records.push(AccessorRecord {
            name,
            data_offset,
            count: checked_u32(accessor.count, "accessor count")?,
            component_type,
            element_type,
            _pad: [0; 2],
        });
    }

    let (count, offset) = append_table(&mut pak.buffer, &records)?;
    model.directory.accessor_table_count = count;
    model.directory.accessor_table_offset = offset;
    Ok(())
}

fn matrix_order(dimensions: Dimensions) -> Option<usize> {
    match dimensions {
        Dimensions::Mat2 => Some(2),
        Dimensions::Mat3 => Some(3),
        Dimensions::Mat4 => Some(4),
        _ => None,
    }
}

/// Reorders square `order`×`order` matrices from column-major to row-major.
pub fn transpose_matrices<T: Copy>(values: &[T], order: usize) -> Vec<T> {
    let mut transposed = Vec::with_capacity(values.len());
    for matrix in values.chunks_exact(order * order) {
        for row in 0..order {
            for column in 0..order {
                transposed.push(matrix[column * order + row]);
            }
        }
    }
    transposed
}

fn append_components<T: BigEndian>(buffer: &mut Vec<u8>, values: &[T], dimensions: Dimensions) {
    match matrix_order(dimensions) {
        // the runtime reads matrices row-major
        Some(order) => append_big_endian_slice(buffer, &transpose_matrices(values, order)),
        None => append_big_endian_slice(buffer, values),
    }
}

fn append_accessor_data(buffer: &mut Vec<u8>, data: &AccessorData, dimensions: Dimensions) {
    match data {
        AccessorData::I8(values) => append_components(buffer, values, dimensions),
        AccessorData::U8(values) => append_components(buffer, values, dimensions),
        AccessorData::I16(values) => append_components(buffer, values, dimensions),
        AccessorData::U16(values) => append_components(buffer, values, dimensions),
        AccessorData::U32(values) => append_components(buffer, values, dimensions),
        AccessorData::F32(values) => append_components(buffer, values, dimensions),
    }
}
