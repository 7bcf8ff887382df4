use std::{collections::HashMap, rc::Rc};

use anyhow::{Context, Result};

use crate::{
    buffer::UINT32_MAX,
    data_structures::{
        pak::{lookup_code, PrimitiveRecord, TOPOLOGY_CODES},
        scene::{Primitive, SceneAsset},
    },
    error::ComposeError,
    pack::{append_table, reference_or_sentinel, ModelTables, Pak},
};

/// Table position of every packed primitive, keyed by allocation.
pub type PrimitiveIndices = HashMap<*const Primitive, usize>;

/// Writes one record per distinct primitive, in first-seen order across
/// all meshes. A primitive shared by several meshes is written once.
pub(crate) fn pack_primitives(model: &mut ModelTables, pak: &mut Pak) -> Result<PrimitiveIndices> {
    let asset = model.asset;
    let mut indices = PrimitiveIndices::new();
    let mut records = Vec::new();

    for (mesh_index, mesh) in asset.meshes.iter().enumerate() {
        for primitive in &mesh.primitives {
            let key = Rc::as_ptr(primitive);
            if indices.contains_key(&key) {
                continue;
            }
            let record = encode_primitive(asset, primitive)
                .with_context(|| format!("failed to encode primitive of mesh {mesh_index}"))?;
            indices.insert(key, records.len());
            records.push(record);
        }
    }

    let (count, offset) = append_table(&mut pak.buffer, &records)?;
    model.directory.primitive_table_count = count;
    model.directory.primitive_table_offset = offset;
    Ok(indices)
}

fn encode_primitive(
    asset: &SceneAsset,
    primitive: &Primitive,
) -> Result<PrimitiveRecord, ComposeError> {
    let mut attributes = [UINT32_MAX; 8];
    for (slot, reference) in attributes
        .iter_mut()
        .zip(primitive.attributes.in_wire_order())
    {
        *slot = reference_or_sentinel(reference, asset.accessors.len(), "accessor")?;
    }
    let [position, normal, tangent, tex_coord_0, tex_coord_1, color_0, joints_0, weights_0] =
        attributes;

    let mode = lookup_code(&TOPOLOGY_CODES, &primitive.mode).ok_or_else(|| {
        ComposeError::encoding(format!("no code for topology {:?}", primitive.mode))
    })?;

    Ok(PrimitiveRecord {
        position,
        normal,
        tangent,
        tex_coord_0,
        tex_coord_1,
        color_0,
        joints_0,
        weights_0,
        indices: reference_or_sentinel(primitive.indices, asset.accessors.len(), "accessor")?,
        material: reference_or_sentinel(primitive.material, asset.materials.len(), "material")?,
        mode,
        _pad: [0; 3],
    })
}
