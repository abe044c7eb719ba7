//! Snapshot tests - save files on disk and state restoration

use std::path::PathBuf;

use raytris::core::{HandlingSettings, InputFrame, Playfield, Snapshot, SnapshotError};
use raytris::types::{SpinType, Tetromino};

fn temp_save(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("raytris-{}-{name}.raytris", std::process::id()))
}

fn play(field: &mut Playfield, frames: usize) {
    let settings = HandlingSettings::default();
    for i in 0..frames {
        let input = InputFrame {
            right: i % 5 == 0,
            counter_clockwise: i % 7 == 0,
            hard_drop: i % 11 == 10,
            soft_drop: i % 3 == 0,
            ..InputFrame::idle()
        };
        field.update(&input, &settings);
    }
}

#[test]
fn test_save_and_load_file() {
    let mut field = Playfield::with_seed(8);
    play(&mut field, 120);

    let path = temp_save("roundtrip");
    let snapshot = field.snapshot();
    snapshot.save(&path).unwrap();
    let loaded = Snapshot::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.score, field.score());
}

#[test]
fn test_resumed_game_continues_identically() {
    let mut original = Playfield::with_seed(21);
    play(&mut original, 90);

    let text = original.snapshot().to_save_string().unwrap();
    let mut resumed = Playfield::new();
    resumed.restore(&Snapshot::read_from(&text).unwrap()).unwrap();

    // Mid-piece timers and DAS state carry over, so the next frames match.
    play(&mut original, 30);
    play(&mut resumed, 30);
    assert_eq!(original.grid(), resumed.grid());
    assert_eq!(original.falling_piece(), resumed.falling_piece());
    assert_eq!(original.score(), resumed.score());
}

#[test]
fn test_message_and_flags_survive() {
    let mut field = Playfield::with_seed(3);
    let mut snapshot = field.snapshot();
    snapshot.holding = Some(Tetromino::I);
    snapshot.can_swap = false;
    snapshot.last_move_rotation = true;
    snapshot.message.spin = SpinType::Mini;
    snapshot.message.timer = 42;
    snapshot.timers.frames_pressed = -9;
    snapshot.b2b = 5;

    let text = snapshot.to_save_string().unwrap();
    field.restore(&Snapshot::read_from(&text).unwrap()).unwrap();

    assert_eq!(field.holding_piece(), Some(Tetromino::I));
    assert!(!field.can_swap());
    assert_eq!(field.message().spin, SpinType::Mini);
    assert_eq!(field.message().timer, 42);
    assert_eq!(field.b2b(), 5);
    assert_eq!(field.snapshot(), snapshot);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = temp_save("does-not-exist");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Io(_))));
}

#[test]
fn test_bad_flag_value_is_rejected() {
    let text = Playfield::with_seed(1).snapshot().to_save_string().unwrap();
    // Last line is "<kind> <timer> <spin>"; a spin index of 9 is out of range.
    let mut lines: Vec<&str> = text.lines().collect();
    let last = lines.len() - 1;
    lines[last] = "0 0 9";
    let broken = lines.join("\n");

    assert!(matches!(
        Snapshot::read_from(&broken),
        Err(SnapshotError::OutOfRange { field: "message spin", value: 9 })
    ));
}
