use anyhow::{Context, Result};

use crate::{
    data_structures::{pak::NodeRecord, transform::NodeTransform},
    pack::{append_table, reference_or_sentinel, ModelTables, Pak},
};

/// Unset transform components take their identity defaults.
pub(crate) fn pack_nodes(model: &mut ModelTables, pak: &mut Pak) -> Result<()> {
    let asset = model.asset;
    let mut records = Vec::with_capacity(asset.nodes.len());

    for (index, node) in asset.nodes.iter().enumerate() {
        let name = pak.strings.push(&node.name)?;
        let (children_count, children) = model
            .append_run(&node.children, asset.nodes.len(), "node")
            .with_context(|| format!("failed to pack children of node {index}"))?;
        let mesh = reference_or_sentinel(node.mesh, asset.meshes.len(), "mesh")
            .with_context(|| format!("failed to pack mesh of node {index}"))?;
        let transform = NodeTransform::from_node(node);

        records.push(NodeRecord {
            name,
            rotation: transform.rotation_xyzw(),
            scale: transform.scale.into(),
            translation: transform.translation.into(),
            children_count,
            children,
            mesh,
        });
    }

    let (count, offset) = append_table(&mut pak.buffer, &records)?;
    model.directory.node_table_count = count;
    model.directory.node_table_offset = offset;
    Ok(())
}
