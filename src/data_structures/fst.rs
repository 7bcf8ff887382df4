//! File System Table entry layout.

use bytemuck::{Pod, Zeroable};

use crate::buffer::big_endian_record;

/// Set in the top byte of [`FstEntry::ident`] for directories.
pub const FST_DIRECTORY_FLAG: u32 = 1 << 24;

pub const FST_NAME_MASK: u32 = 0x00FF_FFFF;

/// Names are addressed by the low 24 bits of the ident.
pub const FST_STRING_TABLE_LIMIT: usize = 1 << 24;

/// Alignment of every file inside the file-data region.
pub const FST_FILE_ALIGNMENT: usize = 4;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct FstEntry {
    /// Top byte: 0 file, 1 directory. Low three bytes: name offset.
    pub ident: u32,
    /// File: byte offset of its contents. Directory: parent entry index.
    pub offset: u32,
    /// File: byte length. Directory: number of descendant entries, plus
    /// one for the root.
    pub length: u32,
}
big_endian_record!(FstEntry {
    ident,
    offset,
    length,
});

impl FstEntry {
    pub fn file(name: u32, offset: u32, length: u32) -> Self {
        Self {
            ident: name & FST_NAME_MASK,
            offset,
            length,
        }
    }

    pub fn directory(name: u32, parent: u32, descendants: u32) -> Self {
        Self {
            ident: FST_DIRECTORY_FLAG | (name & FST_NAME_MASK),
            offset: parent,
            length: descendants,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.ident & !FST_NAME_MASK != 0
    }

    pub fn name_offset(&self) -> u32 {
        self.ident & FST_NAME_MASK
    }
}
