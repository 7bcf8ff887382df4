use anyhow::Result;
use gltf::texture::WrappingMode;

use crate::{
    buffer::{append_big_endian_slice, offset_of, pad_to_alignment, UINT32_MAX},
    data_structures::{
        pak::{
            lookup_code, MaterialRecord, TEXTURE_ALIGNMENT, TEXTURE_FORMAT_RGB5A3,
            WRAP_MODE_CODES,
        },
        scene::{SceneAsset, TextureInfo},
    },
    error::ComposeError,
    pack::{append_table, texture::to_rgb5a3, ModelTables, Pak},
};

fn wrap_code(mode: WrappingMode) -> Result<u8, ComposeError> {
    lookup_code(&WRAP_MODE_CODES, &mode)
        .ok_or_else(|| ComposeError::encoding(format!("no code for wrap mode {mode:?}")))
}

pub(crate) fn pack_materials(model: &mut ModelTables, pak: &mut Pak) -> Result<()> {
    let asset = model.asset;
    let mut records = Vec::with_capacity(asset.materials.len());

    for (index, material) in asset.materials.iter().enumerate() {
        let name = pak.strings.push(&material.name)?;
        let record = match material.base_color {
            Some(info) => pack_base_color(asset, index, info, name, pak)?,
            None => {
                log::warn!(
                    "material {index} ({:?}) has no base color texture",
                    material.name
                );
                untextured(name)?
            }
        };
        records.push(record);
    }

    let (count, offset) = append_table(&mut pak.buffer, &records)?;
    model.directory.material_table_count = count;
    model.directory.material_table_offset = offset;
    Ok(())
}

/// Quantizes the material's base color texture into the buffer and
/// returns the record that points at it.
fn pack_base_color(
    asset: &SceneAsset,
    index: usize,
    info: TextureInfo,
    name: u32,
    pak: &mut Pak,
) -> Result<MaterialRecord, ComposeError> {
    let texture = asset.textures.get(info.texture).ok_or_else(|| {
        ComposeError::encoding(format!(
            "material {index} references missing texture {}",
            info.texture
        ))
    })?;

    // A texture without a sampler repeats on both axes.
    let (wrap_s, wrap_t) = match texture.sampler {
        Some(sampler) => {
            let sampler = asset.samplers.get(sampler).ok_or_else(|| {
                ComposeError::encoding(format!(
                    "texture {} references missing sampler {sampler}",
                    info.texture
                ))
            })?;
            (wrap_code(sampler.wrap_s)?, wrap_code(sampler.wrap_t)?)
        }
        None => (
            wrap_code(WrappingMode::Repeat)?,
            wrap_code(WrappingMode::Repeat)?,
        ),
    };

    let image = asset.images.get(texture.source).ok_or_else(|| {
        ComposeError::encoding(format!(
            "texture {} references missing image {}",
            info.texture, texture.source
        ))
    })?;
    let tex_coord = u8::try_from(info.tex_coord).map_err(|_| {
        ComposeError::encoding(format!(
            "material {index} uses texture coordinate set {}",
            info.tex_coord
        ))
    })?;

    pad_to_alignment(&mut pak.buffer, TEXTURE_ALIGNMENT);
    let texture_offset = offset_of(&pak.buffer)?;
    append_big_endian_slice(&mut pak.buffer, &to_rgb5a3(image));

    Ok(MaterialRecord {
        name,
        texture_offset,
        tex_coord,
        format: TEXTURE_FORMAT_RGB5A3,
        wrap_s,
        wrap_t,
    })
}

fn untextured(name: u32) -> Result<MaterialRecord, ComposeError> {
    let repeat = wrap_code(WrappingMode::Repeat)?;
    Ok(MaterialRecord {
        name,
        texture_offset: UINT32_MAX,
        tex_coord: 0,
        format: TEXTURE_FORMAT_RGB5A3,
        wrap_s: repeat,
        wrap_t: repeat,
    })
}
