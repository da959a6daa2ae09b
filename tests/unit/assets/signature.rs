use super::*;

#[test]
fn both_gif_versions_are_recognized() {
    assert!(has_gif_signature(b"GIF87a\x01\x00"));
    assert!(has_gif_signature(b"GIF89a"));
    assert!(!has_gif_signature(b"GIF8"));
    assert!(!has_gif_signature(b"GIF90a......"));
    assert!(!has_gif_signature(b""));
}

#[test]
fn hex_preview_is_lowercase_and_bounded() {
    assert_eq!(first_bytes_hex(&[0x3c, 0x21, 0xff], 16), "3c 21 ff");
    let long = vec![0xABu8; 40];
    let preview = first_bytes_hex(&long, SIGNATURE_PREVIEW_BYTES);
    assert_eq!(preview.split(' ').count(), 16);
    assert!(preview.starts_with("ab ab"));
}

#[test]
fn signature_failure_reports_offending_bytes() {
    let err = ensure_gif_signature(b"<!DOCTYPE html>").unwrap_err();
    match err {
        ScrubError::Signature { preview } => {
            assert_eq!(preview, "3c 21 44 4f 43 54 59 50 45 20 68 74 6d 6c 3e");
        }
        other => panic!("unexpected error: {other}"),
    }
    ensure_gif_signature(b"GIF89a").unwrap();
}
