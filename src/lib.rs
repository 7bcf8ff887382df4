//! discpak
//!
//! Offline build tool for a homebrew console game engine. Scene assets are
//! flattened into relocatable PAK containers that the runtime can use in
//! place after a single pointer-fixup pass, and the containers are placed
//! together with a bootloader and the runtime executable into a bootable
//! GCM disc image. Every multi-byte value written by this crate is
//! big-endian.
//!
//! High-level modules
//! - `buffer`: big-endian records, alignment, reserved regions, string tables
//! - `data_structures`: scene-asset graph and every on-disc record layout
//! - `pack`: per-asset table packer and texture quantizer
//! - `container`: PAK container packing and inspection
//! - `fst`: File System Table builder and decoder
//! - `gcm`: disc image assembly
//! - `resources`: glTF and image loading
//! - `manifest`: project manifest parsing
//! - `compose`: end-to-end build from a project directory
//!

pub mod buffer;
pub mod compose;
pub mod container;
pub mod data_structures;
pub mod error;
pub mod fst;
pub mod gcm;
pub mod manifest;
pub mod pack;
pub mod resources;

pub use error::ComposeError;
