use anyhow::{Context, Result};

use crate::{
    data_structures::pak::SceneRecord,
    pack::{append_table, ModelTables, Pak},
};

pub(crate) fn pack_scenes(model: &mut ModelTables, pak: &mut Pak) -> Result<()> {
    let asset = model.asset;
    let mut records = Vec::with_capacity(asset.scenes.len());

    for (index, scene) in asset.scenes.iter().enumerate() {
        let name = pak.strings.push(&scene.name)?;
        let (nodes_count, nodes) = model
            .append_run(&scene.nodes, asset.nodes.len(), "node")
            .with_context(|| format!("failed to pack root nodes of scene {index}"))?;
        records.push(SceneRecord {
            name,
            nodes_count,
            nodes,
        });
    }

    let (count, offset) = append_table(&mut pak.buffer, &records)?;
    model.directory.scene_table_count = count;
    model.directory.scene_table_offset = offset;
    Ok(())
}
