use discpak::{
    container::{pack_container, PakReader},
    data_structures::{
        pak::{PakHeader, ASSET_TYPE_MODEL, PAK_SIGNATURE},
        scene::SceneAsset,
    },
    ComposeError,
};

mod common;

use crate::common::test_utils::{empty_scene_asset, hut_asset, read_u32};

#[test]
fn should_pack_an_empty_container() {
    let bytes = pack_container(std::iter::empty::<&SceneAsset>()).unwrap();
    assert_eq!(bytes.len(), 20);

    let pak = PakReader::new(&bytes).unwrap();
    assert_eq!(
        *pak.header(),
        PakHeader {
            signature: PAK_SIGNATURE,
            string_table_length: 0,
            string_table_offset: 20,
            directory_count: 0,
            directory_offset: 20,
        }
    );
}

#[test]
fn should_start_with_the_signature() {
    let bytes = pack_container([&hut_asset()]).unwrap();
    assert_eq!(&bytes[..4], b"O2\x00\x02");
}

#[test]
fn should_list_assets_in_input_order() {
    let first = empty_scene_asset("first.glb");
    let hut = hut_asset();
    let last = empty_scene_asset("last.glb");
    let bytes = pack_container([&first, &hut, &last]).unwrap();
    assert_eq!(bytes.len() % 4, 0);

    let pak = PakReader::new(&bytes).unwrap();
    let directory = pak.directory().unwrap();
    let names: Vec<&str> = directory
        .iter()
        .map(|entry| pak.name(entry.name).unwrap())
        .collect();
    assert_eq!(names, vec!["first.glb", "hut.gltf", "last.glb"]);

    let mut previous = 0;
    for entry in &directory {
        assert_eq!(entry.asset_type, ASSET_TYPE_MODEL);
        assert_eq!(entry.offset % 4, 0);
        assert!(entry.offset > previous);
        previous = entry.offset;
    }
}

#[test]
fn should_place_trailing_regions_after_the_assets() {
    let bytes = pack_container([&hut_asset(), &empty_scene_asset("b.glb")]).unwrap();
    let header = PakReader::new(&bytes).unwrap().header().to_owned();

    assert_eq!(header.string_table_offset % 4, 0);
    assert_eq!(header.directory_offset % 4, 0);
    assert!(header.directory_offset >= header.string_table_offset + header.string_table_length);
    assert_eq!(
        bytes.len(),
        header.directory_offset as usize + 12 * header.directory_count as usize
    );
    assert_eq!(read_u32(&bytes, 16), header.directory_offset);
}

#[test]
fn should_keep_tables_of_an_empty_asset_valid() {
    let bytes = pack_container([&empty_scene_asset("nothing.glb")]).unwrap();
    let pak = PakReader::new(&bytes).unwrap();
    let model = pak.model(&pak.directory().unwrap()[0]).unwrap();

    assert_eq!(model.accessor_table_count, 0);
    assert_eq!(model.node_table_count, 0);
    assert_eq!(model.scene_table_count, 1);
    assert_eq!(model.index_table_count, 0);
}

#[test]
fn should_reject_foreign_bytes() {
    let error = PakReader::new(&[0x49, 0x32, 0x00, 0x02, 0, 0, 0, 0]).unwrap_err();
    assert!(matches!(error, ComposeError::Encoding(_)));

    let mut bytes = pack_container([&hut_asset()]).unwrap();
    // the runtime marks a relocated container by flipping the first byte
    bytes[0] = b'I';
    assert!(PakReader::new(&bytes).is_err());
}
