//! Disc system area layout and game identity.
//!
//! The system area occupies the first 0x2440 bytes of a disc image:
//! disc ID at 0x0000, boot block 1 at 0x0400, boot block 2 at 0x0420 and
//! the debug/region block (BI2) at 0x0440.

use bytemuck::{Pod, Zeroable};

use crate::{buffer::big_endian_record, error::ComposeError};

pub const GCM_MAGIC: u32 = 0xC233_9F3D;

pub const REGION_CODE_JP: u32 = 0;
pub const REGION_CODE_US: u32 = 1;
pub const REGION_CODE_EU: u32 = 2;

/// Region used when the country code has no entry in [`COUNTRY_REGIONS`].
pub const DEFAULT_REGION_CODE: u32 = REGION_CODE_US;

/// Country character of the game ID to region-lock code.
pub static COUNTRY_REGIONS: [(u8, u32); 16] = [
    (b'D', REGION_CODE_EU), // Germany
    (b'E', REGION_CODE_US), // USA
    (b'F', REGION_CODE_EU), // France
    (b'H', REGION_CODE_EU), // Netherlands
    (b'I', REGION_CODE_EU), // Italy
    (b'J', REGION_CODE_JP), // Japan
    (b'K', REGION_CODE_JP), // Korea
    (b'L', REGION_CODE_EU), // Japanese import to PAL regions
    (b'M', REGION_CODE_EU), // American import to PAL regions
    (b'N', REGION_CODE_EU), // Japanese import to NTSC regions
    (b'P', REGION_CODE_EU), // Europe and other PAL regions
    (b'R', REGION_CODE_EU), // Russia
    (b'S', REGION_CODE_EU), // Spain
    (b'U', REGION_CODE_EU), // Australia
    (b'V', REGION_CODE_EU), // Scandinavia
    (b'W', REGION_CODE_EU), // Taiwan, Hong Kong, Macau
];

pub fn region_for_country(country_code: u8) -> u32 {
    COUNTRY_REGIONS
        .iter()
        .find(|(country, _)| *country == country_code)
        .map_or(DEFAULT_REGION_CODE, |(_, region)| *region)
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct DiscId {
    pub console_id: u8,
    pub game_code: [u8; 2],
    pub country_code: u8,
    pub maker_code: [u8; 2],
    pub disc_number: u8,
    pub version: u8,
    pub audio_streaming: u8,
    pub stream_buffer_size: u8,
    pub _reserved: [u8; 18],
    pub dvd_magic: u32,
    pub game_name: [u8; 64],
    pub _reserved_tail: [u8; 928],
}
big_endian_record!(DiscId {
    console_id,
    game_code,
    country_code,
    maker_code,
    disc_number,
    version,
    audio_streaming,
    stream_buffer_size,
    _reserved,
    dvd_magic,
    game_name,
    _reserved_tail,
});

/// Ignored by the retail boot ROM.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct BootBlock1 {
    pub apploader_size: u32,
    pub apploader_func1: u32,
    pub apploader_func2: u32,
    pub apploader_func3: u32,
    pub _reserved: [u8; 16],
}
big_endian_record!(BootBlock1 {
    apploader_size,
    apploader_func1,
    apploader_func2,
    apploader_func3,
    _reserved,
});

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct BootBlock2 {
    /// Disc offset of the runtime (DOL) image.
    pub dol_offset: u32,
    pub fst_offset: u32,
    pub fst_size: u32,
    pub max_fst_size: u32,
    // ignored by retail-compatible apploaders
    pub fst_address: u32,
    pub user_position: u32,
    pub user_length: u32,
    pub _reserved: u32,
}
big_endian_record!(BootBlock2 {
    dol_offset,
    fst_offset,
    fst_size,
    max_fst_size,
    fst_address,
    user_position,
    user_length,
    _reserved,
});

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Bi2 {
    pub debug_monitor_size: u32,
    pub simulated_memory_size: u32,
    pub argument_offset: u32,
    pub debug_flag: u32,
    pub trk_location: u32,
    pub trk_size: u32,
    pub region_code: u32,
    pub total_discs: u32,
    pub long_file_names: u32,
    pub pad_spec: u32,
    pub dol_limit: u32,
    pub _reserved: [u8; 8148],
}
big_endian_record!(Bi2 {
    debug_monitor_size,
    simulated_memory_size,
    argument_offset,
    debug_flag,
    trk_location,
    trk_size,
    region_code,
    total_discs,
    long_file_names,
    pad_spec,
    dol_limit,
    _reserved,
});

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct DiscSystemArea {
    pub disc_id: DiscId,
    pub boot_block1: BootBlock1,
    pub boot_block2: BootBlock2,
    pub bi2: Bi2,
}
big_endian_record!(DiscSystemArea {
    disc_id,
    boot_block1,
    boot_block2,
    bi2,
});

impl DiscSystemArea {
    pub const SIZE: usize = 0x2440;
    pub const BOOT_BLOCK2_OFFSET: usize = 0x420;
    pub const BI2_OFFSET: usize = 0x440;
}

pub const GAME_CODE_LEN: usize = 6;
pub const MAX_GAME_NAME_LEN: usize = 63;

/// Identity written into the disc ID block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameId {
    pub console_id: u8,
    pub game_code: [u8; 2],
    pub country_code: u8,
    pub maker_code: [u8; 2],
    pub version: u8,
    /// NUL-padded; the last byte is always zero.
    pub game_name: [u8; 64],
}

impl GameId {
    /// Splits a six character code such as `GORE01` into console, game,
    /// country and maker fields.
    pub fn new(code: &str, version: u8, name: &str) -> Result<Self, ComposeError> {
        let code = code.as_bytes();
        if code.len() != GAME_CODE_LEN {
            return Err(ComposeError::Validation {
                field: "game ID",
                len: code.len(),
                expected: "exactly 6",
            });
        }
        if name.len() > MAX_GAME_NAME_LEN {
            return Err(ComposeError::Validation {
                field: "game name",
                len: name.len(),
                expected: "at most 63",
            });
        }
        let mut game_name = [0; 64];
        game_name[..name.len()].copy_from_slice(name.as_bytes());

        Ok(Self {
            console_id: code[0],
            game_code: [code[1], code[2]],
            country_code: code[3],
            maker_code: [code[4], code[5]],
            version,
            game_name,
        })
    }

    pub fn region_code(&self) -> u32 {
        region_for_country(self.country_code)
    }
}
