use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};

use crate::{error::ComposeError, resources::read_binary};

/// Decodes an encoded PNG or JPEG image into RGBA8 pixels. The MIME type
/// is a hint; without it the format is guessed from the contents.
pub fn decode_image(bytes: &[u8], mime_type: Option<&str>) -> Result<RgbaImage> {
    let image = match mime_type.and_then(ImageFormat::from_mime_type) {
        Some(format) => image::load_from_memory_with_format(bytes, format),
        None => image::load_from_memory(bytes),
    }
    .context("failed to decode image")?;
    Ok(image.to_rgba8())
}

/// Decodes every image of `document`, in document order. Images live
/// either in a buffer view or in a file next to the document.
pub fn load_images(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    base: &Path,
) -> Result<Vec<RgbaImage>> {
    document
        .images()
        .map(|image| {
            let decoded = match image.source() {
                gltf::image::Source::View { view, mime_type } => {
                    let buffer = buffers.get(view.buffer().index()).ok_or_else(|| {
                        ComposeError::encoding(format!(
                            "image {} lives in a buffer that was not loaded",
                            image.index()
                        ))
                    })?;
                    let bytes = buffer
                        .0
                        .get(view.offset()..view.offset() + view.length())
                        .ok_or_else(|| {
                            ComposeError::encoding(format!(
                                "image {} exceeds its buffer",
                                image.index()
                            ))
                        })?;
                    decode_image(bytes, Some(mime_type))
                }
                gltf::image::Source::Uri { uri, mime_type } => {
                    if uri.starts_with("data:") {
                        anyhow::bail!("embedded data URIs are not supported for images");
                    }
                    let bytes = read_binary(&base.join(uri))?;
                    decode_image(&bytes, mime_type)
                }
            };
            decoded.with_context(|| format!("failed to load image {}", image.index()))
        })
        .collect()
}
