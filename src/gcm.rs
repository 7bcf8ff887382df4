//! GCM disc image assembly.
//!
//! ```text
//! 0x0000  system area (disc ID, boot blocks, BI2)
//! 0x2440  bootloader (apploader)
//!         FST entries + string table
//!         file data
//!         runtime (DOL)
//! ```
//!
//! The FST and the runtime start on 4-byte boundaries. The system area is
//! reserved up front and finalized once every offset is known.

use std::path::Path;

use anyhow::{Context, Result};
use bytemuck::Zeroable;

use crate::{
    buffer::{
        append_big_endian_slice, checked_u32, offset_of, pad_to_alignment, read_big_endian,
        reserve,
    },
    data_structures::disc::{BootBlock2, DiscSystemArea, GameId, GCM_MAGIC},
    error::ComposeError,
    fst::{decode_fst, Fst, FstNode},
    resources::read_binary,
};

/// Alignment of the FST and of the runtime image on disc.
pub const DISC_REGION_ALIGNMENT: usize = 4;

/// Disc offsets resolved while laying out the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiscLayout {
    pub dol_offset: u32,
    pub fst_offset: u32,
    pub fst_size: u32,
}

/// Reads the bootloader and runtime images, walks `fst_root` and returns
/// the bytes of a bootable disc image.
pub fn build_gcm(id: &GameId, bootloader: &Path, runtime: &Path, fst_root: &Path) -> Result<Vec<u8>> {
    log::info!("Building GCM disc image");
    let bootloader = read_binary(bootloader).context("failed to read bootloader image")?;
    let fst = Fst::build(fst_root)?;
    let runtime = read_binary(runtime).context("failed to read runtime image")?;
    assemble(id, &bootloader, fst, &runtime)
}

/// Lays out an image from already loaded parts.
pub fn assemble(id: &GameId, bootloader: &[u8], mut fst: Fst, runtime: &[u8]) -> Result<Vec<u8>> {
    let mut gcm = Vec::new();
    let system_area = reserve::<DiscSystemArea>(&mut gcm);

    gcm.extend_from_slice(bootloader);

    pad_to_alignment(&mut gcm, DISC_REGION_ALIGNMENT);
    let fst_offset = offset_of(&gcm)?;
    let fst_size = checked_u32(fst.packed_size(), "FST")?;
    let files_offset = fst_offset
        .checked_add(fst_size)
        .ok_or(ComposeError::Capacity {
            what: "disc image",
            limit: u64::from(u32::MAX),
        })?;
    fst.patch_file_offsets(files_offset)
        .context("failed to place game files")?;
    append_big_endian_slice(&mut gcm, &fst.entries);
    gcm.extend_from_slice(fst.strings.as_bytes());
    gcm.extend_from_slice(&fst.files);

    pad_to_alignment(&mut gcm, DISC_REGION_ALIGNMENT);
    let dol_offset = offset_of(&gcm)?;
    gcm.extend_from_slice(runtime);
    // the whole image has to stay addressable by 32-bit offsets
    offset_of(&gcm)?;

    let layout = DiscLayout {
        dol_offset,
        fst_offset,
        fst_size,
    };
    log::debug!("disc layout: {layout:?}");
    system_area.finalize(&mut gcm, &system_area_for(id, layout));
    Ok(gcm)
}

/// The system area describing an image with the given identity and layout.
pub fn system_area_for(id: &GameId, layout: DiscLayout) -> DiscSystemArea {
    let mut area = DiscSystemArea::zeroed();

    let disc_id = &mut area.disc_id;
    disc_id.console_id = id.console_id;
    disc_id.game_code = id.game_code;
    disc_id.country_code = id.country_code;
    disc_id.maker_code = id.maker_code;
    disc_id.version = id.version;
    disc_id.dvd_magic = GCM_MAGIC;
    disc_id.game_name = id.game_name;

    area.boot_block2 = BootBlock2 {
        dol_offset: layout.dol_offset,
        fst_offset: layout.fst_offset,
        fst_size: layout.fst_size,
        max_fst_size: layout.fst_size,
        ..BootBlock2::default()
    };

    area.bi2.region_code = id.region_code();
    area.bi2.total_discs = 1;
    area.bi2.long_file_names = 1;
    area.bi2.pad_spec = 6;
    area
}

/// Decodes the system area at the start of an image.
pub fn read_system_area(image: &[u8]) -> Result<DiscSystemArea, ComposeError> {
    read_big_endian(image)
        .ok_or_else(|| ComposeError::encoding("image is shorter than its system area"))
}

/// Locates and decodes the FST of an image.
pub fn read_fst(image: &[u8]) -> Result<FstNode, ComposeError> {
    let area = read_system_area(image)?;
    if area.disc_id.dvd_magic != GCM_MAGIC {
        return Err(ComposeError::encoding(format!(
            "disc magic is {:#010x}, expected {GCM_MAGIC:#010x}",
            area.disc_id.dvd_magic
        )));
    }
    let start = area.boot_block2.fst_offset as usize;
    let end = start + area.boot_block2.fst_size as usize;
    let region = image
        .get(start..end)
        .ok_or_else(|| ComposeError::encoding("FST runs past the end of the image"))?;
    decode_fst(region)
}
