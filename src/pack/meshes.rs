use std::rc::Rc;

use anyhow::Result;

use crate::{
    data_structures::pak::MeshRecord,
    error::ComposeError,
    pack::{append_table, primitives::PrimitiveIndices, ModelTables, Pak},
};

pub(crate) fn pack_meshes(
    model: &mut ModelTables,
    pak: &mut Pak,
    primitive_indices: &PrimitiveIndices,
) -> Result<()> {
    let asset = model.asset;
    let mut records = Vec::with_capacity(asset.meshes.len());

    for (index, mesh) in asset.meshes.iter().enumerate() {
        let name = pak.strings.push(&mesh.name)?;
        let primitives = mesh
            .primitives
            .iter()
            .map(|primitive| {
                primitive_indices
                    .get(&Rc::as_ptr(primitive))
                    .copied()
                    .ok_or_else(|| {
                        ComposeError::encoding(format!("mesh {index} has an unpacked primitive"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let (primitives_count, primitives) =
            model.append_run(&primitives, primitive_indices.len(), "primitive")?;

        records.push(MeshRecord {
            name,
            primitives_count,
            primitives,
        });
    }

    let (count, offset) = append_table(&mut pak.buffer, &records)?;
    model.directory.mesh_table_count = count;
    model.directory.mesh_table_offset = offset;
    Ok(())
}
