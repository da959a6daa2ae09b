use super::*;

fn encode_two_frames(repeat: Option<gif::Repeat>) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut enc = gif::Encoder::new(&mut buf, 4, 4, &[]).unwrap();
        if let Some(r) = repeat {
            enc.set_repeat(r).unwrap();
        }

        let mut full = [255u8, 0, 0, 255].repeat(16);
        let mut f0 = gif::Frame::from_rgba_speed(4, 4, &mut full, 10);
        f0.delay = 7;
        f0.dispose = gif::DisposalMethod::Background;
        enc.write_frame(&f0).unwrap();

        let mut corner = [0u8, 0, 255, 255].repeat(4);
        let mut f1 = gif::Frame::from_rgba_speed(2, 2, &mut corner, 10);
        f1.left = 2;
        f1.top = 1;
        f1.delay = 0;
        f1.dispose = gif::DisposalMethod::Previous;
        enc.write_frame(&f1).unwrap();
    }
    buf
}

#[test]
fn gif_decoder_yields_logical_frames() {
    let bytes = encode_two_frames(Some(gif::Repeat::Finite(3)));
    let decoded = GifDecoder.decode(&bytes).unwrap();

    assert_eq!(decoded.frames.len(), 2);
    assert_eq!(decoded.loop_count, SourceLoopCount::Finite(3));

    let f0 = &decoded.frames[0];
    assert_eq!(f0.bbox, BoundingBox::new(0, 0, 4, 4));
    assert_eq!(f0.delay_raw, 7);
    assert_eq!(f0.disposal, DisposalMethod::Background);
    assert_eq!(f0.patch.len(), 4 * 4 * 4);
    assert_eq!(&f0.patch[..4], &[255, 0, 0, 255]);

    let f1 = &decoded.frames[1];
    assert_eq!(f1.bbox, BoundingBox::new(2, 1, 2, 2));
    assert_eq!(f1.delay_raw, 0);
    assert_eq!(f1.disposal, DisposalMethod::Previous);
    assert_eq!(&f1.patch[..4], &[0, 0, 255, 255]);
}

#[test]
fn loop_count_maps_repeat_extension() {
    let infinite = GifDecoder
        .decode(&encode_two_frames(Some(gif::Repeat::Infinite)))
        .unwrap();
    assert_eq!(infinite.loop_count, SourceLoopCount::Infinite);

    let undeclared = GifDecoder.decode(&encode_two_frames(None)).unwrap();
    assert_eq!(undeclared.loop_count, SourceLoopCount::Finite(1));
}

#[test]
fn garbage_is_a_decode_error() {
    let err = GifDecoder.decode(b"GIF89a\x00").unwrap_err();
    assert!(matches!(err, ScrubError::Decode(_)));
}

#[test]
fn disposal_codes_map_both_ways() {
    for code in 0..=3u8 {
        assert_eq!(DisposalMethod::from_code(code).code(), code);
    }
    assert_eq!(DisposalMethod::from_code(6), DisposalMethod::Unspecified);
}
