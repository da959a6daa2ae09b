use super::*;
use crate::{
    assets::decode::DecodedGif,
    assets::frame::{DisposalMethod, LogicalFrame},
    assets::source::MemorySource,
    foundation::core::{BoundingBox, LoopMode},
    playback::control::Key,
    playback::timer::ManualTimer,
    render::surface::MemorySurface,
};

struct StubDecoder {
    frames: Vec<LogicalFrame>,
    loop_count: SourceLoopCount,
}

impl FrameDecoder for StubDecoder {
    fn decode(&self, _bytes: &[u8]) -> ScrubResult<DecodedGif> {
        Ok(DecodedGif {
            frames: self.frames.clone(),
            loop_count: self.loop_count,
        })
    }
}

fn stub(count: usize) -> StubDecoder {
    let frames = (0..count)
        .map(|i| {
            LogicalFrame::solid(
                BoundingBox::new(0, 0, 4, 2),
                [i as u8, 0, 0, 255],
                10,
                DisposalMethod::Keep,
            )
        })
        .collect();
    StubDecoder {
        frames,
        loop_count: SourceLoopCount::Finite(1),
    }
}

fn source() -> MemorySource {
    let mut src = MemorySource::new();
    src.insert("a.gif", b"GIF89a\x04\x00\x02\x00".to_vec());
    src.insert("page.html", b"<!doctype html>".to_vec());
    src
}

fn load(
    id: &str,
    decoder: &StubDecoder,
    config: &PlayerConfig,
) -> ScrubResult<LoadedSession<MemorySurface, ManualTimer>> {
    load_session(
        &source(),
        id,
        decoder,
        MemorySurface::new,
        ManualTimer::new(),
        config,
    )
}

#[test]
fn loads_and_autoplays() {
    let session = load("a.gif", &stub(3), &PlayerConfig::default()).unwrap();
    assert_eq!(session.canvas, Canvas::new(4, 2).unwrap());
    assert_eq!(session.source_loop_count, SourceLoopCount::Finite(1));
    assert!(!session.policy.reduced_mode);
    assert_eq!(session.speed_options.len(), 6);

    let p = &session.player;
    assert!(p.state().is_playing);
    assert!(p.has_pending_tick());
    assert_eq!(p.delays_ms(), &[100, 100, 100]);
    assert_eq!(p.surface().writes(), 1);
}

#[test]
fn config_controls_initial_state() {
    let config = PlayerConfig {
        initial_loop_mode: LoopMode::Infinite,
        initial_playback_rate: 2.0,
        autoplay: false,
        ..PlayerConfig::default()
    };
    let session = load("a.gif", &stub(3), &config).unwrap();
    let cs = session.control_state();
    assert!(!cs.is_playing);
    assert_eq!(cs.loop_mode, LoopMode::Infinite);
    assert_eq!(cs.playback_rate, 2.0);
    assert_eq!(session.player.surface().writes(), 1);
}

#[test]
fn low_thresholds_engage_reduced_mode() {
    let mut config = PlayerConfig::default();
    config.policy.large_frame_count = 2;
    let session = load("a.gif", &stub(3), &config).unwrap();
    assert!(session.policy.reduced_mode);
    assert!(session.policy.warning_text.is_some());
    assert!(session.player.state().reduced_mode);
    assert_eq!(session.control_state().warning_text, session.policy.warning_text);
}

#[test]
fn missing_bytes_fail_while_fetching() {
    let err = load("nope.gif", &stub(3), &PlayerConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err.root(), ScrubError::Transport(_)));
    assert!(
        err.to_string()
            .starts_with("failed during fetching gif bytes for nope.gif: transport error")
    );
}

#[test]
fn non_gif_bytes_fail_signature_check() {
    let err = load("page.html", &stub(3), &PlayerConfig::default())
        .err()
        .unwrap();
    let ScrubError::Stage { stage, source, .. } = &err else {
        panic!("expected stage error, got {err}");
    };
    assert_eq!(*stage, STAGE_FETCH);
    let ScrubError::Signature { preview } = source.as_ref() else {
        panic!("expected signature error, got {source}");
    };
    assert!(preview.starts_with("3c 21 64 6f"));
}

#[test]
fn empty_decode_fails_while_decoding() {
    let err = load("a.gif", &stub(0), &PlayerConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err.root(), ScrubError::EmptyAnimation));
    assert!(err.to_string().starts_with("failed during decoding gif for a.gif"));
}

#[test]
fn degenerate_frame_fails_while_decoding() {
    let mut decoder = stub(2);
    decoder.frames[1].bbox = BoundingBox::new(0, 0, 0, 2);
    let err = load("a.gif", &decoder, &PlayerConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err.root(), ScrubError::Composition { frame: 1, .. }));
}

#[test]
fn surface_failure_is_reported_at_mount() {
    let err = load_session(
        &source(),
        "a.gif",
        &stub(2),
        |_canvas| -> ScrubResult<MemorySurface> { Err(ScrubError::surface("no context")) },
        ManualTimer::new(),
        &PlayerConfig::default(),
    )
    .err()
    .unwrap();
    assert_eq!(
        err.to_string(),
        "failed during mounting ui for a.gif: surface unavailable: no context"
    );
}

#[test]
fn keys_route_through_configured_jump() {
    let config = PlayerConfig {
        shift_jump: 2,
        ..PlayerConfig::default()
    };
    let mut session = load("a.gif", &stub(5), &config).unwrap();

    let shift_right = KeyInput {
        shift: true,
        ..KeyInput::plain(Key::ArrowRight)
    };
    assert!(session.handle_key(&shift_right).unwrap());
    assert_eq!(session.player.state().current_frame, 2);
    assert!(!session.player.state().is_playing);

    assert!(session.handle_key(&KeyInput::plain(Key::Space)).unwrap());
    assert!(session.player.state().is_playing);

    assert!(!session.handle_key(&KeyInput::plain(Key::Other)).unwrap());
}

#[test]
fn prepare_animation_checks_signature_first() {
    let err = prepare_animation(b"nope", &stub(1)).unwrap_err();
    assert!(matches!(err, ScrubError::Signature { .. }));

    let anim = prepare_animation(b"GIF87a", &stub(2)).unwrap();
    assert_eq!(anim.len(), 2);
    assert_eq!(anim.cycle_ms(), 200);
}
