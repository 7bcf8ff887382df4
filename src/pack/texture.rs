//! Texture quantization into the console's tiled RGB5A3 layout.
//!
//! Texels are always emitted in the 4-bit colour / 3-bit alpha variant:
//! `0AAA RRRR GGGG BBBB`, most significant bit clear.

use image::{Rgba, RgbaImage};

/// Width and height of one tile in texels.
pub const TILE_SIZE: u32 = 4;

/// Sample used for texels past the right or bottom image edge.
const OUT_OF_BOUNDS: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Packs one RGBA texel, truncating each channel to its bit depth.
pub fn quantize_texel(Rgba([r, g, b, a]): Rgba<u8>) -> u16 {
    let r = u16::from(r >> 4);
    let g = u16::from(g >> 4);
    let b = u16::from(b >> 4);
    let a = u16::from(a >> 5);
    (a << 12) | (r << 8) | (g << 4) | b
}

/**
 * Converts `image` into 16-bit texels grouped in 4x4 tiles.
 *
 * Tiles are walked column by column: every tile row of a tile column is
 * emitted before moving one tile to the right. Inside a tile texels are
 * row-major. Partial tiles at the edges are zero-filled.
 */
pub fn to_rgb5a3(image: &RgbaImage) -> Vec<u16> {
    let tiles_x = image.width().div_ceil(TILE_SIZE);
    let tiles_y = image.height().div_ceil(TILE_SIZE);
    let mut texels = Vec::with_capacity((tiles_x * tiles_y * TILE_SIZE * TILE_SIZE) as usize);

    for tile_x in 0..tiles_x {
        for tile_y in 0..tiles_y {
            for texel_y in 0..TILE_SIZE {
                for texel_x in 0..TILE_SIZE {
                    let x = tile_x * TILE_SIZE + texel_x;
                    let y = tile_y * TILE_SIZE + texel_y;
                    let pixel = image
                        .get_pixel_checked(x, y)
                        .copied()
                        .unwrap_or(OUT_OF_BOUNDS);
                    texels.push(quantize_texel(pixel));
                }
            }
        }
    }

    texels
}
