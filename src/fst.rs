//! File System Table builder and decoder.
//!
//! A directory tree on disk is flattened depth-first into an entry array,
//! a name string table and one blob holding every file's contents. File
//! offsets are relative to the start of the blob until the disc layout is
//! known, see [`Fst::patch_file_offsets`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bytemuck::Zeroable;

use crate::{
    buffer::{
        checked_u32, offset_of, packed_size, packed_size_of, pad_to_alignment,
        read_big_endian, read_big_endian_at, read_c_string, StringTable,
    },
    data_structures::fst::{FstEntry, FST_FILE_ALIGNMENT, FST_STRING_TABLE_LIMIT},
    error::ComposeError,
};

#[derive(Clone, Debug)]
pub struct Fst {
    pub entries: Vec<FstEntry>,
    pub strings: StringTable,
    pub files: Vec<u8>,
}

fn entry_name(path: &Path) -> Result<&str, ComposeError> {
    match path.file_name() {
        Some(name) => name.to_str().ok_or_else(|| {
            ComposeError::encoding(format!("{} is not a UTF-8 file name", path.display()))
        }),
        None => Ok(""),
    }
}

impl Fst {
    /**
     * Walks `root` depth-first. Children of a directory are visited in
     * byte-wise name order, so the same tree always produces the same
     * table. Entry 0 is `root` itself.
     */
    pub fn build(root: &Path) -> Result<Self> {
        Self::build_with_limit(root, FST_STRING_TABLE_LIMIT)
    }

    /// Same as [`Fst::build`] with the name table capped at `string_limit`
    /// bytes.
    pub fn build_with_limit(root: &Path, string_limit: usize) -> Result<Self> {
        log::info!("Building FST from {}", root.display());
        let metadata = fs::metadata(root)
            .map_err(|e| ComposeError::resource(root, e))
            .context("failed to stat FST root dir")?;
        if !metadata.is_dir() {
            anyhow::bail!("FST root {} is not a directory", root.display());
        }

        let mut fst = Self {
            entries: Vec::new(),
            strings: StringTable::with_limit(string_limit),
            files: Vec::new(),
        };
        fst.visit(root, true, 0).context("failed to build FST")?;

        // The root's length counts every entry, itself included.
        fst.entries[0].length += 1;
        fst.strings.pad_to_alignment(4);
        log::debug!(
            "FST holds {} entries and {} bytes of file data",
            fst.entries.len(),
            fst.files.len()
        );
        Ok(fst)
    }

    fn visit(&mut self, path: &Path, is_dir: bool, parent: usize) -> Result<(), ComposeError> {
        let index = self.entries.len();
        self.entries.push(FstEntry::zeroed());
        let name = self.strings.push(entry_name(path)?)?;

        if is_dir {
            let mut children = fs::read_dir(path)
                .and_then(|entries| {
                    entries
                        .map(|entry| entry.map(|entry| entry.path()))
                        .collect::<Result<Vec<PathBuf>, _>>()
                })
                .map_err(|e| ComposeError::resource(path, e))?;
            children.sort();

            for child in children {
                let metadata =
                    fs::metadata(&child).map_err(|e| ComposeError::resource(&child, e))?;
                self.visit(&child, metadata.is_dir(), index)?;
            }

            let descendants = self.entries.len() - index - 1;
            self.entries[index] = FstEntry::directory(
                name,
                checked_u32(parent, "FST parent index")?,
                checked_u32(descendants, "FST directory")?,
            );
        } else {
            let contents = fs::read(path).map_err(|e| ComposeError::resource(path, e))?;
            pad_to_alignment(&mut self.files, FST_FILE_ALIGNMENT);
            let offset = offset_of(&self.files)?;
            self.files.extend_from_slice(&contents);
            self.entries[index] =
                FstEntry::file(name, offset, checked_u32(contents.len(), "FST file")?);
        }
        Ok(())
    }

    /// Size of the entry array plus the padded string table.
    pub fn packed_size(&self) -> usize {
        packed_size(&self.entries) + self.strings.len()
    }

    /// Rebases every file offset by `base`, the disc offset of the blob.
    pub fn patch_file_offsets(&mut self, base: u32) -> Result<(), ComposeError> {
        for entry in self.entries.iter_mut().filter(|e| !e.is_directory()) {
            entry.offset = entry.offset.checked_add(base).ok_or(ComposeError::Capacity {
                what: "disc image",
                limit: u64::from(u32::MAX),
            })?;
        }
        Ok(())
    }
}

/// A decoded FST entry with its subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FstNode {
    File {
        name: String,
        offset: u32,
        length: u32,
    },
    Directory {
        name: String,
        children: Vec<FstNode>,
    },
}

impl FstNode {
    pub fn name(&self) -> &str {
        match self {
            FstNode::File { name, .. } | FstNode::Directory { name, .. } => name,
        }
    }

    /// Finds a direct child by name.
    pub fn child(&self, name: &str) -> Option<&FstNode> {
        match self {
            FstNode::Directory { children, .. } => children.iter().find(|c| c.name() == name),
            FstNode::File { .. } => None,
        }
    }
}

/// Decodes an FST region: the entry array immediately followed by the
/// string table.
pub fn decode_fst(region: &[u8]) -> Result<FstNode, ComposeError> {
    let root: FstEntry = read_big_endian(region)
        .ok_or_else(|| ComposeError::encoding("FST is shorter than its root entry"))?;
    if !root.is_directory() {
        return Err(ComposeError::encoding("FST root is not a directory"));
    }

    let count = root.length as usize;
    if count == 0 {
        return Err(ComposeError::encoding("FST root counts no entries"));
    }
    let entries = (0..count)
        .map(|index| {
            read_big_endian_at::<FstEntry>(region, index * packed_size_of::<FstEntry>())
                .ok_or_else(|| ComposeError::encoding(format!("FST entry {index} is truncated")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let strings = region
        .get(count * packed_size_of::<FstEntry>()..)
        .unwrap_or_default();

    let (node, _) = decode_entry(&entries, strings, 0)?;
    Ok(node)
}

fn decode_entry(
    entries: &[FstEntry],
    strings: &[u8],
    index: usize,
) -> Result<(FstNode, usize), ComposeError> {
    let entry = entries[index];
    let name = read_c_string(strings, entry.name_offset() as usize)
        .ok_or_else(|| ComposeError::encoding(format!("FST entry {index} has no name")))?
        .to_string();

    if !entry.is_directory() {
        let node = FstNode::File {
            name,
            offset: entry.offset,
            length: entry.length,
        };
        return Ok((node, index + 1));
    }

    let descendants = if index == 0 {
        entry.length.saturating_sub(1)
    } else {
        entry.length
    } as usize;
    let end = index + 1 + descendants;
    if end > entries.len() {
        return Err(ComposeError::encoding(format!(
            "FST directory {index} spans past the last entry"
        )));
    }

    let mut children = Vec::new();
    let mut next = index + 1;
    while next < end {
        let (child, after) = decode_entry(entries, strings, next)?;
        children.push(child);
        next = after;
    }
    if next != end {
        return Err(ComposeError::encoding(format!(
            "FST directory {index} overlaps its siblings"
        )));
    }
    Ok((FstNode::Directory { name, children }, end))
}
