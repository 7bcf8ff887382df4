//! In-memory scene-asset graph consumed by the asset packer.
//!
//! A [`SceneAsset`] is fully decoded: accessor contents are typed arrays,
//! textures are RGBA pixel buffers. Cross references are plain indices
//! into the asset's collections, except for mesh primitives, which are
//! shared [`Rc`] handles because one primitive may belong to several
//! meshes. Primitive identity is the allocation, never the contents.

use std::rc::Rc;

use gltf::{
    accessor::{DataType, Dimensions},
    mesh::Mode,
    texture::WrappingMode,
};

/// One scene asset, e.g. the decoded contents of a single glTF file.
#[derive(Clone, Debug, Default)]
pub struct SceneAsset {
    pub name: String,
    pub accessors: Vec<Accessor>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub samplers: Vec<Sampler>,
    pub images: Vec<image::RgbaImage>,
    pub meshes: Vec<Mesh>,
    pub nodes: Vec<Node>,
    pub scenes: Vec<Scene>,
}

/// A typed numeric array. Matrix elements are column-major, as authored.
#[derive(Clone, Debug)]
pub struct Accessor {
    pub name: String,
    pub dimensions: Dimensions,
    pub count: usize,
    pub data: AccessorData,
}

/// Flattened component values of an accessor.
#[derive(Clone, Debug, PartialEq)]
pub enum AccessorData {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    F32(Vec<f32>),
}

impl AccessorData {
    pub fn data_type(&self) -> DataType {
        match self {
            AccessorData::I8(_) => DataType::I8,
            AccessorData::U8(_) => DataType::U8,
            AccessorData::I16(_) => DataType::I16,
            AccessorData::U16(_) => DataType::U16,
            AccessorData::U32(_) => DataType::U32,
            AccessorData::F32(_) => DataType::F32,
        }
    }

    /// Number of components (not elements).
    pub fn len(&self) -> usize {
        match self {
            AccessorData::I8(v) => v.len(),
            AccessorData::U8(v) => v.len(),
            AccessorData::I16(v) => v.len(),
            AccessorData::U16(v) => v.len(),
            AccessorData::U32(v) => v.len(),
            AccessorData::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct Material {
    pub name: String,
    pub base_color: Option<TextureInfo>,
}

/// Reference from a material to one of the asset's textures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureInfo {
    pub texture: usize,
    pub tex_coord: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Texture {
    /// `None` means the interchange format's default sampler.
    pub sampler: Option<usize>,
    pub source: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
    pub wrap_s: WrappingMode,
    pub wrap_t: WrappingMode,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Rc<Primitive>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub attributes: Attributes,
    pub indices: Option<usize>,
    pub material: Option<usize>,
    pub mode: Mode,
}

impl Default for Primitive {
    fn default() -> Self {
        Self {
            attributes: Attributes::default(),
            indices: None,
            material: None,
            mode: Mode::Triangles,
        }
    }
}

/// Accessor indices of the vertex attributes the runtime understands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    pub position: Option<usize>,
    pub normal: Option<usize>,
    pub tangent: Option<usize>,
    pub tex_coord_0: Option<usize>,
    pub tex_coord_1: Option<usize>,
    pub color_0: Option<usize>,
    pub joints_0: Option<usize>,
    pub weights_0: Option<usize>,
}

impl Attributes {
    /// Attributes in wire order.
    pub fn in_wire_order(&self) -> [Option<usize>; 8] {
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

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub name: String,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    pub translation: Option<[f32; 3]>,
    /// Quaternion as x, y, z, w.
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scene {
    pub name: String,
    pub nodes: Vec<usize>,
}
