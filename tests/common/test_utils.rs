#![allow(dead_code)]

use std::rc::Rc;

use discpak::data_structures::scene::{
    Accessor, AccessorData, Attributes, Material, Mesh, Node, Primitive, Scene, SceneAsset,
    Texture, TextureInfo,
};
use gltf::accessor::Dimensions;
use image::{Rgba, RgbaImage};

pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

pub fn accessor(name: &str, dimensions: Dimensions, count: usize, data: AccessorData) -> Accessor {
    Accessor {
        name: name.to_string(),
        dimensions,
        count,
        data,
    }
}

/**
 * A hut: one scene, one root node, one mesh with one primitive that uses
 * positions, indices and a material. The material samples a 4x4 opaque
 * texture without a sampler.
 */
pub fn hut_asset() -> SceneAsset {
    let positions = accessor(
        "positions",
        Dimensions::Vec3,
        4,
        AccessorData::F32(vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ]),
    );
    let indices = accessor(
        "indices",
        Dimensions::Scalar,
        4,
        AccessorData::U16(vec![0, 1, 2, 3]),
    );
    let primitive = Primitive {
        attributes: Attributes {
            position: Some(0),
            ..Attributes::default()
        },
        indices: Some(1),
        material: Some(0),
        ..Primitive::default()
    };

    SceneAsset {
        name: "hut.gltf".to_string(),
        accessors: vec![positions, indices],
        materials: vec![Material {
            name: "wood".to_string(),
            base_color: Some(TextureInfo {
                texture: 0,
                tex_coord: 0,
            }),
        }],
        textures: vec![Texture {
            sampler: None,
            source: 0,
        }],
        samplers: Vec::new(),
        images: vec![solid_image(4, 4, [0xFF, 0x80, 0x00, 0xFF])],
        meshes: vec![Mesh {
            name: "hut".to_string(),
            primitives: vec![Rc::new(primitive)],
        }],
        nodes: vec![Node {
            name: "root".to_string(),
            mesh: Some(0),
            ..Node::default()
        }],
        scenes: vec![Scene {
            name: "main".to_string(),
            nodes: vec![0],
        }],
    }
}

/// An asset holding nothing but one named scene without nodes.
pub fn empty_scene_asset(name: &str) -> SceneAsset {
    SceneAsset {
        name: name.to_string(),
        scenes: vec![Scene {
            name: "empty".to_string(),
            nodes: Vec::new(),
        }],
        ..SceneAsset::default()
    }
}

pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

pub fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes(bytes[offset..offset + 2].try_into().unwrap())
}
