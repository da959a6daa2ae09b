use super::*;
use crate::foundation::core::SourceLoopCount;

#[test]
fn keys_map_to_commands() {
    assert_eq!(
        command_for_key(&KeyInput::plain(Key::Space), 10),
        Some(PlayerCommand::Toggle)
    );
    assert_eq!(
        command_for_key(&KeyInput::plain(Key::ArrowLeft), 10),
        Some(PlayerCommand::Step(-1))
    );
    let shifted = KeyInput {
        shift: true,
        ..KeyInput::plain(Key::ArrowRight)
    };
    assert_eq!(command_for_key(&shifted, 10), Some(PlayerCommand::Step(10)));
    assert_eq!(command_for_key(&KeyInput::plain(Key::Other), 10), None);
}

#[test]
fn handled_or_editable_key_events_are_ignored() {
    let prevented = KeyInput {
        default_prevented: true,
        ..KeyInput::plain(Key::Space)
    };
    let typing = KeyInput {
        editable_target: true,
        ..KeyInput::plain(Key::ArrowLeft)
    };
    assert_eq!(command_for_key(&prevented, 10), None);
    assert_eq!(command_for_key(&typing, 10), None);
}

#[test]
fn control_state_formats_label_and_scrubber_range() {
    let mut s = PlayerState::new(12, SourceLoopCount::Finite(1), false);
    s.current_frame = 4;
    let cs = ControlState::from_state(&s, Some(7));
    assert_eq!(cs.frame_label, "5/12");
    assert_eq!(cs.scrubber_max, 11);
    assert_eq!(cs.pending_scrub, Some(7));

    let json = serde_json::to_value(&cs).unwrap();
    assert_eq!(json["loop_mode"], "source");
    assert_eq!(json["is_playing"], false);
    assert!(json["warning_text"].is_null());
}

#[test]
fn control_state_carries_warning_in_reduced_mode() {
    let s = PlayerState::new(1, SourceLoopCount::Infinite, true);
    let cs = ControlState::from_state(&s, None);
    assert_eq!(cs.frame_label, "1/1");
    assert_eq!(cs.scrubber_max, 0);
    assert_eq!(cs.warning_text.as_deref(), Some(REDUCED_MODE_WARNING));
}

#[test]
fn speed_options_label_and_describe_rates() {
    let opts = speed_options(&[0.25, 1.0, 1.5, -2.0, f64::NAN]);
    let labels: Vec<_> = opts.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["25%", "100%", "150%"]);
    assert_eq!(opts[0].descriptor, SpeedDescriptor::Slower);
    assert_eq!(opts[1].descriptor, SpeedDescriptor::Original);
    assert_eq!(opts[2].descriptor, SpeedDescriptor::Faster);
}

#[test]
fn commands_round_trip_through_json() {
    let cmd: PlayerCommand = serde_json::from_str(r#"{"cmd":"seek","arg":-5}"#).unwrap();
    assert_eq!(cmd, PlayerCommand::Seek(-5));
    let cmd: PlayerCommand =
        serde_json::from_str(r#"{"cmd":"set_loop_mode","arg":"none"}"#).unwrap();
    assert_eq!(cmd, PlayerCommand::SetLoopMode(LoopMode::None));
    let cmd: PlayerCommand = serde_json::from_str(r#"{"cmd":"toggle"}"#).unwrap();
    assert_eq!(cmd, PlayerCommand::Toggle);
}
