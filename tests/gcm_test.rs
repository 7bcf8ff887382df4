use std::fs;

use discpak::{
    data_structures::disc::{
        region_for_country, DiscSystemArea, GameId, GCM_MAGIC, REGION_CODE_EU, REGION_CODE_JP,
        REGION_CODE_US,
    },
    fst::{Fst, FstNode},
    gcm::{assemble, build_gcm, read_fst, read_system_area},
    ComposeError,
};

mod common;

use crate::common::test_utils::read_u32;

fn game_id() -> GameId {
    GameId::new("GORP01", 2, "Ore Hunter").unwrap()
}

fn disc_tree() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("overworld.PAK"), b"packed level").unwrap();
    root
}

#[test]
fn should_split_the_game_id() {
    let id = game_id();
    assert_eq!(id.console_id, b'G');
    assert_eq!(id.game_code, *b"OR");
    assert_eq!(id.country_code, b'P');
    assert_eq!(id.maker_code, *b"01");
    assert_eq!(id.version, 2);
    assert_eq!(&id.game_name[..10], b"Ore Hunter");
    assert!(id.game_name[10..].iter().all(|&b| b == 0));
}

#[test]
fn should_validate_identity_lengths() {
    let error = GameId::new("GORP0", 0, "Ore Hunter").unwrap_err();
    assert!(matches!(
        error,
        ComposeError::Validation {
            field: "game ID",
            len: 5,
            ..
        }
    ));

    let name = "x".repeat(64);
    assert!(GameId::new("GORP01", 0, &name).is_err());
    assert!(GameId::new("GORP01", 0, &name[..63]).is_ok());
}

#[test]
fn should_map_countries_to_regions() {
    assert_eq!(region_for_country(b'E'), REGION_CODE_US);
    assert_eq!(region_for_country(b'J'), REGION_CODE_JP);
    assert_eq!(region_for_country(b'K'), REGION_CODE_JP);
    assert_eq!(region_for_country(b'P'), REGION_CODE_EU);
    assert_eq!(region_for_country(b'D'), REGION_CODE_EU);
    assert_eq!(region_for_country(b'Z'), REGION_CODE_US);
}

#[test]
fn should_lay_out_the_disc() {
    let tree = disc_tree();
    let bootloader = [0xB0u8; 0x21];
    let runtime = [0xD0u8; 0x40];
    let image = assemble(&game_id(), &bootloader, Fst::build(tree.path()).unwrap(), &runtime).unwrap();

    assert_eq!(image.len() % 4, 0);
    assert_eq!(&image[..6], b"GORP01");
    assert_eq!(image[7], 2);
    assert_eq!(read_u32(&image, 0x1C), GCM_MAGIC);
    assert_eq!(&image[0x20..0x2A], b"Ore Hunter");
    assert_eq!(&image[DiscSystemArea::SIZE..DiscSystemArea::SIZE + 0x21], &bootloader);

    // boot block 2
    let bb2 = DiscSystemArea::BOOT_BLOCK2_OFFSET;
    let dol_offset = read_u32(&image, bb2) as usize;
    let fst_offset = read_u32(&image, bb2 + 0x4) as usize;
    let fst_size = read_u32(&image, bb2 + 0x8);
    assert_eq!(fst_offset, 0x2464);
    assert_eq!(read_u32(&image, bb2 + 0xC), fst_size);
    assert_eq!(dol_offset % 4, 0);
    assert_eq!(&image[dol_offset..], &runtime);

    // BI2
    let bi2 = DiscSystemArea::BI2_OFFSET;
    assert_eq!(read_u32(&image, bi2 + 0x18), REGION_CODE_EU);
    assert_eq!(read_u32(&image, bi2 + 0x1C), 1);
    assert_eq!(read_u32(&image, bi2 + 0x20), 1);
    assert_eq!(read_u32(&image, bi2 + 0x24), 6);
}

#[test]
fn should_point_files_at_their_disc_contents() {
    let tree = disc_tree();
    let image = assemble(&game_id(), &[0; 0x20], Fst::build(tree.path()).unwrap(), &[1; 8]).unwrap();

    let root = read_fst(&image).unwrap();
    let Some(FstNode::File { offset, length, .. }) = root.child("overworld.PAK") else {
        panic!("overworld.PAK is missing");
    };
    let start = *offset as usize;
    assert_eq!(&image[start..start + *length as usize], b"packed level");

    let area = read_system_area(&image).unwrap();
    let fst_end = area.boot_block2.fst_offset + area.boot_block2.fst_size;
    assert_eq!(*offset, fst_end);
}

#[test]
fn should_build_from_files() {
    let tree = disc_tree();
    let inputs = tempfile::tempdir().unwrap();
    let bootloader = inputs.path().join("apploader.img");
    let runtime = inputs.path().join("runtime.dol");
    fs::write(&bootloader, [0xABu8; 0x30]).unwrap();
    fs::write(&runtime, [0xCDu8; 0x10]).unwrap();

    let image = build_gcm(&game_id(), &bootloader, &runtime, tree.path()).unwrap();
    assert_eq!(&image[image.len() - 0x10..], &[0xCDu8; 0x10]);
    assert!(read_fst(&image).unwrap().child("overworld.PAK").is_some());
}

#[test]
fn should_report_a_missing_runtime() {
    let tree = disc_tree();
    let inputs = tempfile::tempdir().unwrap();
    let bootloader = inputs.path().join("apploader.img");
    fs::write(&bootloader, [0u8; 4]).unwrap();

    let error = build_gcm(
        &game_id(),
        &bootloader,
        &inputs.path().join("missing.dol"),
        tree.path(),
    )
    .unwrap_err();
    assert!(format!("{error:#}").contains("failed to read runtime image"));
    assert!(matches!(
        error.downcast_ref::<ComposeError>(),
        Some(ComposeError::Resource { .. })
    ));
}
