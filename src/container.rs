//! PAK container: a header, the packed assets, one shared string table and
//! the asset directory.
//!
//! ```text
//! +-----------+------------------------+--------------+-----------+
//! | PakHeader | asset 0 .. asset n - 1 | string table | directory |
//! +-----------+------------------------+--------------+-----------+
//! ```
//!
//! Each region starts on a 4-byte boundary. The header is reserved first
//! and finalized once the trailing regions have been placed.

use anyhow::{Context, Result};

use crate::{
    buffer::{
        append_big_endian_slice, checked_u32, offset_of, packed_size_of, pad_to_alignment,
        read_big_endian, read_big_endian_at, read_c_string, reserve, BigEndian,
    },
    data_structures::{
        pak::{DirectoryEntry, ModelDirectory, PakHeader, PAK_SIGNATURE, TABLE_ALIGNMENT},
        scene::SceneAsset,
    },
    error::ComposeError,
    pack::{pack_asset, Pak},
};

/// Packs `assets` in order into one container and returns its bytes.
pub fn pack_container<'a>(assets: impl IntoIterator<Item = &'a SceneAsset>) -> Result<Vec<u8>> {
    let mut pak = Pak::new();
    let header = reserve::<PakHeader>(&mut pak.buffer);

    for asset in assets {
        pack_asset(asset, &mut pak)
            .with_context(|| format!("failed to pack scene asset \"{}\"", asset.name))?;
    }

    pad_to_alignment(&mut pak.buffer, TABLE_ALIGNMENT);
    let string_table_offset = offset_of(&pak.buffer)?;
    let string_table_length = checked_u32(pak.strings.len(), "string table")?;
    pak.buffer.extend_from_slice(pak.strings.as_bytes());

    pad_to_alignment(&mut pak.buffer, TABLE_ALIGNMENT);
    let directory_offset = offset_of(&pak.buffer)?;
    let directory_count = checked_u32(pak.directory.len(), "directory")?;
    append_big_endian_slice(&mut pak.buffer, &pak.directory);

    header.finalize(
        &mut pak.buffer,
        &PakHeader {
            signature: PAK_SIGNATURE,
            string_table_length,
            string_table_offset,
            directory_count,
            directory_offset,
        },
    );
    log::info!(
        "Packed {} asset(s) into {} bytes",
        directory_count,
        pak.buffer.len()
    );
    Ok(pak.buffer)
}

/// Read-only view of a packed container, used to inspect and verify its
/// contents.
#[derive(Clone, Copy, Debug)]
pub struct PakReader<'a> {
    bytes: &'a [u8],
    header: PakHeader,
}

impl<'a> PakReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, ComposeError> {
        let header: PakHeader = read_big_endian(bytes)
            .ok_or_else(|| ComposeError::encoding("container is shorter than its header"))?;
        if header.signature != PAK_SIGNATURE {
            return Err(ComposeError::encoding(format!(
                "container signature is {:#010x}, expected {PAK_SIGNATURE:#010x}",
                header.signature
            )));
        }
        Ok(Self { bytes, header })
    }

    pub fn header(&self) -> &PakHeader {
        &self.header
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Looks up a name by its string-table offset.
    pub fn name(&self, offset: u32) -> Option<&'a str> {
        let start = self.header.string_table_offset as usize;
        let end = start + self.header.string_table_length as usize;
        read_c_string(self.bytes.get(start..end)?, offset as usize)
    }

    pub fn directory(&self) -> Result<Vec<DirectoryEntry>, ComposeError> {
        self.table(self.header.directory_offset, self.header.directory_count)
    }

    pub fn model(&self, entry: &DirectoryEntry) -> Result<ModelDirectory, ComposeError> {
        read_big_endian_at(self.bytes, entry.offset as usize).ok_or_else(|| {
            ComposeError::encoding(format!(
                "model directory at {:#x} runs past the end of the container",
                entry.offset
            ))
        })
    }

    /// Decodes `count` consecutive records starting at byte `offset`.
    pub fn table<T: BigEndian>(&self, offset: u32, count: u32) -> Result<Vec<T>, ComposeError> {
        (0..count as usize)
            .map(|index| {
                read_big_endian_at(
                    self.bytes,
                    offset as usize + index * packed_size_of::<T>(),
                )
                .ok_or_else(|| {
                    ComposeError::encoding(format!(
                        "table at {offset:#x} runs past the end of the container"
                    ))
                })
            })
            .collect()
    }

    /// Resolves a `(start, count)` run in a model's index table.
    pub fn index_run(
        &self,
        model: &ModelDirectory,
        start: u32,
        count: u32,
    ) -> Result<Vec<u32>, ComposeError> {
        if u64::from(start) + u64::from(count) > u64::from(model.index_table_count) {
            return Err(ComposeError::encoding(format!(
                "index run {start}+{count} exceeds an index table of {}",
                model.index_table_count
            )));
        }
        let offset = model
            .index_table_offset
            .saturating_add(start.saturating_mul(4));
        self.table(offset, count)
    }
}
