use std::fs;

use discpak::{
    data_structures::fst::FstEntry,
    fst::{decode_fst, Fst, FstNode},
    buffer::append_big_endian_slice,
    ComposeError,
};

fn sample_tree() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("b.PAK"), b"level b").unwrap();
    fs::write(root.path().join("a.PAK"), b"level").unwrap();
    fs::create_dir(root.path().join("music")).unwrap();
    fs::write(root.path().join("music").join("theme.adp"), [7u8; 9]).unwrap();
    fs::create_dir(root.path().join("empty")).unwrap();
    root
}

fn encode_region(fst: &Fst) -> Vec<u8> {
    let mut region = Vec::new();
    append_big_endian_slice(&mut region, &fst.entries);
    region.extend_from_slice(fst.strings.as_bytes());
    region
}

#[test]
fn should_flatten_the_tree_depth_first_in_name_order() {
    let root = sample_tree();
    let fst = Fst::build(root.path()).unwrap();

    // root, a.PAK, b.PAK, empty, music, theme.adp
    assert_eq!(fst.entries.len(), 6);
    let names: Vec<&str> = fst
        .entries
        .iter()
        .map(|entry| fst.strings.get(entry.name_offset()).unwrap())
        .collect();
    assert_eq!(names[1..], ["a.PAK", "b.PAK", "empty", "music", "theme.adp"]);

    let kinds: Vec<bool> = fst.entries.iter().map(FstEntry::is_directory).collect();
    assert_eq!(kinds, vec![true, false, false, true, true, false]);
}

#[test]
fn should_count_descendants() {
    let root = sample_tree();
    let fst = Fst::build(root.path()).unwrap();

    // the root also counts itself
    assert_eq!(fst.entries[0].length, 6);
    assert_eq!(fst.entries[0].offset, 0);
    // empty
    assert_eq!(fst.entries[3].length, 0);
    assert_eq!(fst.entries[3].offset, 0);
    // music, parented to the root
    assert_eq!(fst.entries[4].length, 1);
    assert_eq!(fst.entries[4].offset, 0);
}

#[test]
fn should_align_files_in_the_blob() {
    let root = sample_tree();
    let fst = Fst::build(root.path()).unwrap();

    let a = fst.entries[1];
    let b = fst.entries[2];
    let theme = fst.entries[5];
    assert_eq!((a.offset, a.length), (0, 5));
    assert_eq!((b.offset, b.length), (8, 7));
    assert_eq!((theme.offset, theme.length), (16, 9));
    assert_eq!(&fst.files[8..15], b"level b");
    assert_eq!(fst.files.len(), 25);
}

#[test]
fn should_pad_the_string_table() {
    let root = sample_tree();
    let fst = Fst::build(root.path()).unwrap();
    assert_eq!(fst.strings.len() % 4, 0);
    assert_eq!(fst.packed_size(), 6 * 12 + fst.strings.len());
}

#[test]
fn should_rebase_only_file_offsets() {
    let root = sample_tree();
    let mut fst = Fst::build(root.path()).unwrap();
    fst.patch_file_offsets(0x1000).unwrap();

    assert_eq!(fst.entries[1].offset, 0x1000);
    assert_eq!(fst.entries[5].offset, 0x1010);
    assert_eq!(fst.entries[4].offset, 0);

    assert!(fst.patch_file_offsets(u32::MAX).is_err());
}

#[test]
fn should_decode_the_built_table() {
    let root = sample_tree();
    let fst = Fst::build(root.path()).unwrap();
    let tree = decode_fst(&encode_region(&fst)).unwrap();

    let FstNode::Directory { children, .. } = &tree else {
        panic!("root is not a directory");
    };
    let names: Vec<&str> = children.iter().map(FstNode::name).collect();
    assert_eq!(names, vec!["a.PAK", "b.PAK", "empty", "music"]);
    assert_eq!(
        tree.child("music").and_then(|music| music.child("theme.adp")),
        Some(&FstNode::File {
            name: "theme.adp".to_string(),
            offset: 16,
            length: 9,
        })
    );
    assert_eq!(
        tree.child("empty"),
        Some(&FstNode::Directory {
            name: "empty".to_string(),
            children: Vec::new(),
        })
    );
}

#[test]
fn should_fail_on_a_missing_root() {
    let root = tempfile::tempdir().unwrap();
    let error = Fst::build(&root.path().join("missing")).unwrap_err();
    assert!(format!("{error:#}").contains("failed to stat FST root dir"));
}

#[test]
fn should_reject_truncated_tables() {
    let root = sample_tree();
    let fst = Fst::build(root.path()).unwrap();
    let region = encode_region(&fst);
    assert!(decode_fst(&region[..30]).is_err());
}

#[test]
fn should_fail_when_names_outgrow_the_string_table() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("disc");
    fs::create_dir(&root).unwrap();

    // "disc\0" fits exactly
    let fst = Fst::build_with_limit(&root, 5).unwrap();
    assert_eq!(fst.entries.len(), 1);

    fs::write(root.join("a.PAK"), b"level").unwrap();
    let error = Fst::build_with_limit(&root, 8).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<ComposeError>(),
        Some(ComposeError::Capacity {
            what: "string table",
            limit: 8
        })
    ));
}

#[cfg(unix)]
#[test]
fn should_reject_names_that_are_not_utf8() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join(OsStr::from_bytes(b"bad\xFF.PAK")), b"level").unwrap();

    let error = Fst::build(root.path()).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<ComposeError>(),
        Some(ComposeError::Encoding(_))
    ));
}
