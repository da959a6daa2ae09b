use super::*;

fn playing(total: usize, loop_mode: LoopMode, source: SourceLoopCount) -> PlayerState {
    let mut s = PlayerState::new(total, source, false);
    s.loop_mode = loop_mode;
    s.is_playing = true;
    s
}

#[test]
fn doubling_rate_halves_effective_delay() {
    assert_eq!(effective_delay_ms(100, 1.0, false), 100.0);
    assert_eq!(effective_delay_ms(100, 2.0, false), 50.0);
    assert_eq!(effective_delay_ms(20, 0.5, false), 40.0);
}

#[test]
fn five_ms_floor_limits_high_rates() {
    assert_eq!(effective_delay_ms(20, 2.0, false), 10.0);
    assert_eq!(effective_delay_ms(20, 8.0, false), MIN_EFFECTIVE_DELAY_MS);
    assert_eq!(effective_delay_ms(1000, 1e9, false), MIN_EFFECTIVE_DELAY_MS);
}

#[test]
fn reduced_mode_floors_at_forty_ms() {
    assert!(effective_delay_ms(20, 1.0, true) >= 40.0);
    assert_eq!(effective_delay_ms(20, 1.0, true), REDUCED_MODE_MIN_DELAY_MS);
    assert_eq!(effective_delay_ms(100, 4.0, true), REDUCED_MODE_MIN_DELAY_MS);
    assert_eq!(effective_delay_ms(100, 1.0, true), 100.0);
}

#[test]
fn rate_updates_reject_invalid_values() {
    let mut s = PlayerState::new(3, SourceLoopCount::Finite(1), false);
    assert!(!s.set_playback_rate(0.0));
    assert!(!s.set_playback_rate(-1.0));
    assert!(!s.set_playback_rate(f64::NAN));
    assert!(!s.set_playback_rate(f64::INFINITY));
    assert_eq!(s.playback_rate, 1.0);
    assert!(s.set_playback_rate(1.5));
    assert_eq!(s.playback_rate, 1.5);
}

#[test]
fn clamp_frame_index_never_wraps() {
    let s = PlayerState::new(10, SourceLoopCount::Finite(1), false);
    assert_eq!(s.clamp_frame_index(-5), 0);
    assert_eq!(s.clamp_frame_index(999), 9);
    assert_eq!(s.clamp_frame_index(4), 4);
}

#[test]
fn loop_mode_none_stops_on_last_frame() {
    let mut s = playing(4, LoopMode::None, SourceLoopCount::Infinite);
    s.current_frame = 3;
    assert!(!s.advance_frame());
    assert_eq!(s.current_frame, 3);
}

#[test]
fn source_loop_count_three_traverses_three_times() {
    let n = 4;
    let mut s = playing(n, LoopMode::Source, SourceLoopCount::Finite(3));
    let mut advances = 0;
    while s.advance_frame() {
        advances += 1;
    }
    assert_eq!(advances, 3 * n - 1);
    assert_eq!(s.effective_loop_iteration, 3);
    assert_eq!(s.current_frame, n - 1);
}

#[test]
fn infinite_modes_wrap_and_count_iterations() {
    let mut s = playing(2, LoopMode::Infinite, SourceLoopCount::Finite(1));
    s.current_frame = 1;
    assert!(s.advance_frame());
    assert_eq!((s.current_frame, s.effective_loop_iteration), (0, 2));

    let mut s = playing(2, LoopMode::Source, SourceLoopCount::Infinite);
    s.current_frame = 1;
    s.effective_loop_iteration = 40;
    assert!(s.advance_frame());
    assert_eq!((s.current_frame, s.effective_loop_iteration), (0, 41));
}

#[test]
fn catch_up_advances_multiple_frames_and_keeps_remainder() {
    let s = playing(5, LoopMode::None, SourceLoopCount::Finite(1));
    let out = catch_up(s, &[100, 100, 100, 100, 100], 30.0, 250.0);
    assert_eq!(out.advances, 2);
    assert_eq!(out.state.current_frame, 2);
    assert_eq!(out.owed_ms, 80.0);
    assert!(!out.stopped);
    assert!(out.state.is_playing);
}

#[test]
fn catch_up_stops_at_end_and_resets_owed_time() {
    let s = playing(3, LoopMode::None, SourceLoopCount::Finite(1));
    let out = catch_up(s, &[20, 20, 20], 0.0, 10_000.0);
    assert!(out.stopped);
    assert!(!out.state.is_playing);
    assert_eq!(out.state.current_frame, 2);
    assert_eq!(out.advances, 2);
    assert_eq!(out.owed_ms, 0.0);
}

#[test]
fn catch_up_is_a_noop_while_paused() {
    let mut s = playing(3, LoopMode::None, SourceLoopCount::Finite(1));
    s.is_playing = false;
    let out = catch_up(s.clone(), &[20, 20, 20], 0.0, 500.0);
    assert_eq!(out.state, s);
    assert_eq!(out.advances, 0);
}

#[test]
fn negative_elapsed_time_is_ignored() {
    let s = playing(3, LoopMode::None, SourceLoopCount::Finite(1));
    let out = catch_up(s, &[100, 100, 100], 50.0, -1_000.0);
    assert_eq!(out.owed_ms, 50.0);
    assert_eq!(out.state.current_frame, 0);
}

#[test]
fn endless_catch_up_matches_frame_by_frame_simulation() {
    let delays = [100, 50, 500];
    let elapsed = 100_000.0;
    let s = playing(3, LoopMode::Infinite, SourceLoopCount::Finite(1));

    let mut brute = s.clone();
    let mut owed = elapsed;
    let mut brute_advances = 0u64;
    loop {
        let d = brute.current_effective_delay(&delays);
        if owed < d {
            break;
        }
        owed -= d;
        assert!(brute.advance_frame());
        brute_advances += 1;
    }

    let out = catch_up(s, &delays, 0.0, elapsed);
    assert_eq!(out.state.current_frame, brute.current_frame);
    assert_eq!(
        out.state.effective_loop_iteration,
        brute.effective_loop_iteration
    );
    assert_eq!(out.owed_ms, owed);
    assert_eq!(out.advances, brute_advances);
}
