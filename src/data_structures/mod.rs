//! Data models and wire layouts.
//!
//! - `scene` is the in-memory scene-asset graph handed to the packer
//! - `transform` holds node translation/rotation/scale with defaults
//! - `pak` holds the container and packed-model records plus code tables
//! - `fst` holds the File System Table entry
//! - `disc` holds the disc system area and game identity

pub mod disc;
pub mod fst;
pub mod pak;
pub mod scene;
pub mod transform;
