use discpak::{
    buffer::{
        append_big_endian, append_big_endian_slice, pad_to_alignment, read_big_endian,
        read_c_string, reserve, StringTable,
    },
    data_structures::pak::{PakHeader, PAK_SIGNATURE},
    ComposeError,
};

#[test]
fn should_pad_to_next_multiple_only_when_unaligned() {
    let mut buffer = vec![1, 2, 3];
    pad_to_alignment(&mut buffer, 4);
    assert_eq!(buffer, vec![1, 2, 3, 0]);

    pad_to_alignment(&mut buffer, 4);
    assert_eq!(buffer.len(), 4);

    pad_to_alignment(&mut buffer, 32);
    assert_eq!(buffer.len(), 32);
    assert!(buffer[4..].iter().all(|&b| b == 0));
}

#[test]
fn should_write_records_big_endian() {
    let mut buffer = Vec::new();
    append_big_endian(
        &mut buffer,
        &PakHeader {
            signature: PAK_SIGNATURE,
            string_table_length: 0x0102,
            string_table_offset: 3,
            directory_count: 4,
            directory_offset: 5,
        },
    );
    assert_eq!(
        buffer,
        vec![
            0x4F, 0x32, 0x00, 0x02, //
            0x00, 0x00, 0x01, 0x02, //
            0x00, 0x00, 0x00, 0x03, //
            0x00, 0x00, 0x00, 0x04, //
            0x00, 0x00, 0x00, 0x05,
        ]
    );

    append_big_endian_slice(&mut buffer, &[1.0f32, -2.5]);
    assert_eq!(&buffer[20..], &[0x3F, 0x80, 0, 0, 0xC0, 0x20, 0, 0]);
}

#[test]
fn should_decode_what_it_encodes() {
    let header = PakHeader {
        signature: PAK_SIGNATURE,
        string_table_length: 7,
        string_table_offset: 0xABCD,
        directory_count: 1,
        directory_offset: 0x1234_5678,
    };
    let mut buffer = Vec::new();
    append_big_endian(&mut buffer, &header);
    assert_eq!(read_big_endian::<PakHeader>(&buffer), Some(header));
    assert_eq!(read_big_endian::<PakHeader>(&buffer[1..]), None);
}

#[test]
fn should_finalize_exactly_the_reserved_range() {
    let mut buffer = vec![0xAA];
    let header = reserve::<PakHeader>(&mut buffer);
    assert_eq!(header.offset(), 1);
    assert_eq!(header.range(), 1..21);
    buffer.extend_from_slice(&[0xBB; 3]);

    header.finalize(
        &mut buffer,
        &PakHeader {
            signature: PAK_SIGNATURE,
            ..PakHeader::default()
        },
    );
    assert_eq!(buffer.len(), 24);
    assert_eq!(buffer[0], 0xAA);
    assert_eq!(&buffer[1..5], &[0x4F, 0x32, 0x00, 0x02]);
    assert!(buffer[5..21].iter().all(|&b| b == 0));
    assert_eq!(&buffer[21..], &[0xBB; 3]);
}

#[test]
fn should_hand_out_offsets_in_push_order() {
    let mut strings = StringTable::new();
    assert_eq!(strings.push("hut").unwrap(), 0);
    assert_eq!(strings.push("").unwrap(), 4);
    // no deduplication
    assert_eq!(strings.push("hut").unwrap(), 5);
    assert_eq!(strings.as_bytes(), b"hut\0\0hut\0");
    assert_eq!(strings.get(5), Some("hut"));
    assert_eq!(read_c_string(strings.as_bytes(), 4), Some(""));
}

#[test]
fn should_reject_interior_nul_bytes() {
    let mut strings = StringTable::new();
    let error = strings.push("a\0b").unwrap_err();
    assert!(matches!(error, ComposeError::Encoding(_)));
    assert!(strings.is_empty());
}

#[test]
fn should_stop_at_the_limit() {
    let mut strings = StringTable::with_limit(8);
    strings.push("abc").unwrap();
    strings.push("abc").unwrap();
    let error = strings.push("").unwrap_err();
    assert!(matches!(error, ComposeError::Capacity { limit: 8, .. }));
    assert_eq!(strings.len(), 8);
}
