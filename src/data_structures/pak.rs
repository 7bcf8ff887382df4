//! Binary layout of the PAK container and of one packed model.
//!
//! Every record here is a padding-free `#[repr(C)]` struct whose fields
//! are serialized big-endian by [`crate::buffer`]. Field order and widths
//! are a contract with the console runtime, which relocates the offsets
//! in place after loading the container.

use bytemuck::{Pod, Zeroable};
use gltf::{
    accessor::{DataType, Dimensions},
    mesh::Mode,
    texture::WrappingMode,
};

use crate::buffer::big_endian_record;

/// Stored in the first header word. The runtime overwrites the first byte
/// once it has relocated the container.
pub const PAK_SIGNATURE: u32 = 0x4F32_0002;

/// Directory entry type tag for a packed scene asset.
pub const ASSET_TYPE_MODEL: u8 = 0;

/// Format code stored in material records for RGB5A3 texel data.
pub const TEXTURE_FORMAT_RGB5A3: u8 = 8;

/// Alignment of quantized texture data inside the container.
pub const TEXTURE_ALIGNMENT: usize = 32;

/// Alignment of tables, accessor data and the trailing regions.
pub const TABLE_ALIGNMENT: usize = 4;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PakHeader {
    pub signature: u32,
    pub string_table_length: u32,
    pub string_table_offset: u32,
    pub directory_count: u32,
    pub directory_offset: u32,
}
big_endian_record!(PakHeader {
    signature,
    string_table_length,
    string_table_offset,
    directory_count,
    directory_offset,
});

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DirectoryEntry {
    pub name: u32,
    /// Byte offset of the asset's [`ModelDirectory`].
    pub offset: u32,
    pub asset_type: u8,
    pub _pad: [u8; 3],
}
big_endian_record!(DirectoryEntry {
    name,
    offset,
    asset_type,
    _pad,
});

/// Locations of one packed model's tables. Offsets are bytes from the
/// start of the container.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct ModelDirectory {
    pub index_table_count: u32,
    pub index_table_offset: u32,
    pub node_table_count: u32,
    pub node_table_offset: u32,
    pub mesh_table_count: u32,
    pub mesh_table_offset: u32,
    pub material_table_count: u32,
    pub material_table_offset: u32,
    pub primitive_table_count: u32,
    pub primitive_table_offset: u32,
    pub accessor_table_count: u32,
    pub accessor_table_offset: u32,
    pub scene_table_count: u32,
    pub scene_table_offset: u32,
}
big_endian_record!(ModelDirectory {
    index_table_count,
    index_table_offset,
    node_table_count,
    node_table_offset,
    mesh_table_count,
    mesh_table_offset,
    material_table_count,
    material_table_offset,
    primitive_table_count,
    primitive_table_offset,
    accessor_table_count,
    accessor_table_offset,
    scene_table_count,
    scene_table_offset,
});

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct AccessorRecord {
    pub name: u32,
    pub data_offset: u32,
    pub count: u32,
    pub component_type: u8,
    pub element_type: u8,
    pub _pad: [u8; 2],
}
big_endian_record!(AccessorRecord {
    name,
    data_offset,
    count,
    component_type,
    element_type,
    _pad,
});

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct MaterialRecord {
    pub name: u32,
    pub texture_offset: u32,
    pub tex_coord: u8,
    pub format: u8,
    pub wrap_s: u8,
    pub wrap_t: u8,
}
big_endian_record!(MaterialRecord {
    name,
    texture_offset,
    tex_coord,
    format,
    wrap_s,
    wrap_t,
});

/// Attribute, indices and material fields are table indices.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PrimitiveRecord {
    pub position: u32,
    pub normal: u32,
    pub tangent: u32,
    pub tex_coord_0: u32,
    pub tex_coord_1: u32,
    pub color_0: u32,
    pub joints_0: u32,
    pub weights_0: u32,
    pub indices: u32,
    pub material: u32,
    pub mode: u8,
    pub _pad: [u8; 3],
}
big_endian_record!(PrimitiveRecord {
    position,
    normal,
    tangent,
    tex_coord_0,
    tex_coord_1,
    color_0,
    joints_0,
    weights_0,
    indices,
    material,
    mode,
    _pad,
});

impl PrimitiveRecord {
    pub fn attributes(&self) -> [u32; 8] {
        [
            self.position,
            self.normal,
            self.tangent,
            self.tex_coord_0,
            self.tex_coord_1,
            self.color_0,
            self.joints_0,
            self.weights_0,
        ]
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct MeshRecord {
    pub name: u32,
    pub primitives_count: u32,
    /// Start of the run in the index table.
    pub primitives: u32,
}
big_endian_record!(MeshRecord {
    name,
    primitives_count,
    primitives,
});

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct NodeRecord {
    pub name: u32,
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub translation: [f32; 3],
    pub children_count: u32,
    pub children: u32,
    pub mesh: u32,
}
big_endian_record!(NodeRecord {
    name,
    rotation,
    scale,
    translation,
    children_count,
    children,
    mesh,
});

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SceneRecord {
    pub name: u32,
    pub nodes_count: u32,
    pub nodes: u32,
}
big_endian_record!(SceneRecord {
    name,
    nodes_count,
    nodes,
});

// The interchange enums do not share numbering with the runtime's enums,
// so every code is looked up explicitly.

pub static COMPONENT_TYPE_CODES: [(DataType, u8); 6] = [
    (DataType::F32, 0),
    (DataType::I8, 1),
    (DataType::U8, 2),
    (DataType::I16, 3),
    (DataType::U16, 4),
    (DataType::U32, 5),
];

pub static ELEMENT_TYPE_CODES: [(Dimensions, u8); 7] = [
    (Dimensions::Scalar, 0),
    (Dimensions::Vec2, 1),
    (Dimensions::Vec3, 2),
    (Dimensions::Vec4, 3),
    (Dimensions::Mat2, 4),
    (Dimensions::Mat3, 5),
    (Dimensions::Mat4, 6),
];

pub static TOPOLOGY_CODES: [(Mode, u8); 7] = [
    (Mode::Points, 0),
    (Mode::Lines, 1),
    (Mode::LineLoop, 2),
    (Mode::LineStrip, 3),
    (Mode::Triangles, 4),
    (Mode::TriangleStrip, 5),
    (Mode::TriangleFan, 6),
];

pub static WRAP_MODE_CODES: [(WrappingMode, u8); 3] = [
    (WrappingMode::ClampToEdge, 0),
    (WrappingMode::MirroredRepeat, 1),
    (WrappingMode::Repeat, 2),
];

/// Finds the wire code for `key` in one of the static code tables.
pub fn lookup_code<K: PartialEq>(table: &[(K, u8)], key: &K) -> Option<u8> {
    table
        .iter()
        .find(|(candidate, _)| candidate == key)
        .map(|(_, code)| *code)
}
