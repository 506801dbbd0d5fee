// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn header_is_seven_bytes_and_valid() {
    let header = encode_header();
    assert_eq!(header.len(), HEADER_LEN);
    assert!(header_is_valid(&header));
    assert_eq!(&header[..4], b":W&B");
}

#[yare::parameterized(
    bad_ident = { 0, b'X' },
    bad_magic = { 4, 0x00 },
    bad_version = { 6, 9 },
)]
fn mutated_header_is_invalid(index: usize, byte: u8) {
    let mut header = encode_header();
    header[index] = byte;
    assert!(!header_is_valid(&header));
}

#[test]
fn frame_layout_is_len_crc_body() {
    let body = b"{\"type\":\"exit\",\"exit_code\":0}";
    let frame = encode_frame(body);
    assert_eq!(frame.len(), FRAME_OVERHEAD + body.len());
    assert_eq!(
        u32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]]),
        body.len() as u32
    );
    assert_eq!(
        u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]),
        checksum(body)
    );
    assert_eq!(&frame[FRAME_OVERHEAD..], body);
}

#[test]
fn checksum_is_crc32_ieee() {
    // Known CRC-32 (IEEE) value for "123456789".
    assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
}
