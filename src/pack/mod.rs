//! Asset table packer.
//!
//! Flattens one [`SceneAsset`] into fixed-size binary tables that live in
//! the container's growing byte buffer. Tables reference each other by
//! offset or by table index, so a table is always fully written before
//! anything that points into it:
//!
//! accessors → materials → primitives → meshes → nodes → scenes
//!
//! followed by the asset's index table and its [`ModelDirectory`].

use anyhow::{Context, Result};

use crate::{
    buffer::{
        append_big_endian, append_big_endian_slice, checked_u32, offset_of, pad_to_alignment,
        BigEndian, StringTable, UINT32_MAX,
    },
    data_structures::{
        pak::{DirectoryEntry, ModelDirectory, ASSET_TYPE_MODEL, TABLE_ALIGNMENT},
        scene::SceneAsset,
    },
    error::ComposeError,
};

pub mod accessors;
pub mod materials;
pub mod meshes;
pub mod nodes;
pub mod primitives;
pub mod scenes;
pub mod texture;

/// Container-wide state shared by every packed asset.
#[derive(Debug, Default)]
pub struct Pak {
    pub buffer: Vec<u8>,
    pub strings: StringTable,
    pub directory: Vec<DirectoryEntry>,
}

impl Pak {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-asset state: where its tables landed and its index table.
pub(crate) struct ModelTables<'a> {
    pub asset: &'a SceneAsset,
    pub directory: ModelDirectory,
    pub index_table: Vec<u32>,
}

impl<'a> ModelTables<'a> {
    fn new(asset: &'a SceneAsset) -> Self {
        Self {
            asset,
            directory: ModelDirectory::default(),
            index_table: Vec::new(),
        }
    }

    /// Appends a run of table indices and returns `(count, start)`.
    /// Every index must be below `table_len`.
    pub fn append_run(
        &mut self,
        indices: &[usize],
        table_len: usize,
        table: &str,
    ) -> Result<(u32, u32), ComposeError> {
        let start = checked_u32(self.index_table.len(), "index table")?;
        for &index in indices {
            if index >= table_len {
                return Err(ComposeError::encoding(format!(
                    "reference to missing {table} {index}"
                )));
            }
            self.index_table.push(checked_u32(index, "index table entry")?);
        }
        Ok((checked_u32(indices.len(), "index run")?, start))
    }
}

/// Resolves an optional table reference to its index, or the sentinel.
pub(crate) fn reference_or_sentinel(
    reference: Option<usize>,
    table_len: usize,
    table: &str,
) -> Result<u32, ComposeError> {
    match reference {
        None => Ok(UINT32_MAX),
        Some(index) if index < table_len => checked_u32(index, "table index"),
        Some(index) => Err(ComposeError::encoding(format!(
            "reference to missing {table} {index}"
        ))),
    }
}

/// Appends a finished table at the next aligned offset and returns
/// `(count, offset)`.
pub(crate) fn append_table<T: BigEndian>(
    buffer: &mut Vec<u8>,
    records: &[T],
) -> Result<(u32, u32), ComposeError> {
    pad_to_alignment(buffer, TABLE_ALIGNMENT);
    let offset = offset_of(buffer)?;
    append_big_endian_slice(buffer, records);
    Ok((checked_u32(records.len(), "table")?, offset))
}

/// Packs every table of `asset` into `pak` and records its directory
/// entry. Returns the entry that was added.
pub fn pack_asset(asset: &SceneAsset, pak: &mut Pak) -> Result<DirectoryEntry> {
    log::info!("Packing {}", asset.name);
    let mut model = ModelTables::new(asset);

    accessors::pack_accessors(&mut model, pak).context("failed to pack accessors")?;
    materials::pack_materials(&mut model, pak).context("failed to pack materials")?;
    let primitive_indices =
        primitives::pack_primitives(&mut model, pak).context("failed to pack mesh primitives")?;
    meshes::pack_meshes(&mut model, pak, &primitive_indices).context("failed to pack meshes")?;
    nodes::pack_nodes(&mut model, pak).context("failed to pack nodes")?;
    scenes::pack_scenes(&mut model, pak).context("failed to pack scenes")?;

    let (count, offset) = append_table(&mut pak.buffer, &model.index_table)
        .context("failed to pack index table")?;
    model.directory.index_table_count = count;
    model.directory.index_table_offset = offset;

    let name = pak.strings.push(&asset.name)?;
    pad_to_alignment(&mut pak.buffer, TABLE_ALIGNMENT);
    let entry = DirectoryEntry {
        name,
        offset: offset_of(&pak.buffer)?,
        asset_type: ASSET_TYPE_MODEL,
        _pad: [0; 3],
    };
    append_big_endian(&mut pak.buffer, &model.directory);
    log::debug!("{} directory: {:?}", asset.name, model.directory);

    pak.directory.push(entry);
    Ok(entry)
}
