use std::{fs, path::Path, rc::Rc};

use anyhow::{Context, Result};
use gltf::{mesh::Semantic, scene::Transform};

use crate::{
    data_structures::scene::{
        Accessor, Attributes, Material, Mesh, Node, Primitive, Sampler, Scene, SceneAsset,
        Texture, TextureInfo,
    },
    error::ComposeError,
};

/**
 * This module contains all logic for loading scene assets and binary
 * images from external files.
 */
pub mod accessor;
pub mod texture;

pub fn read_binary(path: &Path) -> Result<Vec<u8>, ComposeError> {
    fs::read(path).map_err(|e| ComposeError::resource(path, e))
}

/// Loads a `.gltf` or `.glb` file, with its external buffers and images,
/// into a fully decoded [`SceneAsset`] named after the file.
pub fn load_scene_asset(path: &Path) -> Result<SceneAsset> {
    log::info!("Loading {}", path.display());
    let bytes = read_binary(path)?;
    let gltf = gltf::Gltf::from_slice(&bytes)
        .with_context(|| format!("failed to open or load glTF file \"{}\"", path.display()))?;
    let base = path.parent().unwrap_or(Path::new("."));

    let buffers = gltf::import_buffers(&gltf.document, Some(base), gltf.blob.clone())
        .with_context(|| format!("failed to load buffers of \"{}\"", path.display()))?;
    let images = texture::load_images(&gltf.document, &buffers, base)?;

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ComposeError::encoding(format!("{} has no UTF-8 file name", path.display()))
        })?;
    scene_asset_from_gltf(name, &gltf.document, &buffers, images)
}

/// Converts an already parsed document into a [`SceneAsset`].
pub fn scene_asset_from_gltf(
    name: &str,
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: Vec<image::RgbaImage>,
) -> Result<SceneAsset> {
    let accessors = document
        .accessors()
        .map(|source| {
            let data = accessor::read_accessor(&source, buffers)
                .with_context(|| format!("failed to read accessor {}", source.index()))?;
            Ok(Accessor {
                name: source.name().unwrap_or_default().to_string(),
                dimensions: source.dimensions(),
                count: source.count(),
                data,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let materials = document
        .materials()
        .map(|material| Material {
            name: material.name().unwrap_or_default().to_string(),
            base_color: material
                .pbr_metallic_roughness()
                .base_color_texture()
                .map(|info| TextureInfo {
                    texture: info.texture().index(),
                    tex_coord: info.tex_coord(),
                }),
        })
        .collect();

    let textures = document
        .textures()
        .map(|texture| Texture {
            sampler: texture.sampler().index(),
            source: texture.source().index(),
        })
        .collect();

    let samplers = document
        .samplers()
        .map(|sampler| Sampler {
            wrap_s: sampler.wrap_s(),
            wrap_t: sampler.wrap_t(),
        })
        .collect();

    let meshes = document
        .meshes()
        .map(|mesh| Mesh {
            name: mesh.name().unwrap_or_default().to_string(),
            primitives: mesh
                .primitives()
                .map(|primitive| Rc::new(to_primitive(&primitive)))
                .collect(),
        })
        .collect();

    let nodes = document.nodes().map(|node| to_node(&node)).collect();

    let scenes = document
        .scenes()
        .map(|scene| Scene {
            name: scene.name().unwrap_or_default().to_string(),
            nodes: scene.nodes().map(|node| node.index()).collect(),
        })
        .collect();

    Ok(SceneAsset {
        name: name.to_string(),
        accessors,
        materials,
        textures,
        samplers,
        images,
        meshes,
        nodes,
        scenes,
    })
}

fn to_primitive(primitive: &gltf::Primitive) -> Primitive {
    let mut attributes = Attributes::default();
    for (semantic, accessor) in primitive.attributes() {
        let slot = match semantic {
            Semantic::Positions => &mut attributes.position,
            Semantic::Normals => &mut attributes.normal,
            Semantic::Tangents => &mut attributes.tangent,
            Semantic::TexCoords(0) => &mut attributes.tex_coord_0,
            Semantic::TexCoords(1) => &mut attributes.tex_coord_1,
            Semantic::Colors(0) => &mut attributes.color_0,
            Semantic::Joints(0) => &mut attributes.joints_0,
            Semantic::Weights(0) => &mut attributes.weights_0,
            other => {
                log::warn!("Skipping unsupported vertex attribute {other:?}");
                continue;
            }
        };
        *slot = Some(accessor.index());
    }

    Primitive {
        attributes,
        indices: primitive.indices().map(|accessor| accessor.index()),
        material: primitive.material().index(),
        mode: primitive.mode(),
    }
}

fn to_node(node: &gltf::Node) -> Node {
    let (translation, rotation, scale) = match node.transform() {
        Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => (Some(translation), Some(rotation), Some(scale)),
        Transform::Matrix { .. } => {
            log::warn!(
                "Node {} uses a matrix transform; packing it untransformed",
                node.index()
            );
            (None, None, None)
        }
    };

    Node {
        name: node.name().unwrap_or_default().to_string(),
        children: node.children().map(|child| child.index()).collect(),
        mesh: node.mesh().map(|mesh| mesh.index()),
        translation,
        rotation,
        scale,
    }
}
