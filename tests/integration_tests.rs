//! Integration tests for stkeymap.
//!
//! Tests verify that configuration, the keymap and the replay driver work
//! together as the binary uses them.

use std::fs;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use stkeymap::config::KeymapConfig;
use stkeymap::keymap::{KeyAction, KeyMod, KeySymbol, ScanCode, ShortcutAction};
use stkeymap::replay::{HostEvent, Replay, parse_event_line, parse_script};

/// Returns a unique temporary file path for test isolation.
fn get_test_file_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "stkeymap_integration_test_{}_{}.toml",
        name,
        std::process::id()
    ));
    path
}

/// Removes a test file if it exists.
fn cleanup_test_file(path: &PathBuf) {
    let _ = fs::remove_file(path);
}

fn st(code: u8) -> ScanCode {
    ScanCode::new(code).expect("valid scancode")
}

/// Tests configuration save and load cycle preserves data.
#[test]
fn test_config_round_trip() {
    let path = get_test_file_path("round_trip");

    let config = KeymapConfig {
        disable_key_repeat: true,
        fallback_scancode_offset: 0,
        frame_interval_ms: 40,
        log_level: "debug".to_string(),
    };

    config.save_to_file(&path).expect("Failed to save config");
    let loaded_config = KeymapConfig::load_from_file(&path).expect("Failed to load config");

    assert_eq!(config, loaded_config);

    cleanup_test_file(&path);
}

/// Tests that a missing file is created with defaults.
#[test]
fn test_config_load_or_create() {
    let path = get_test_file_path("load_or_create");
    cleanup_test_file(&path);

    let config = KeymapConfig::load_or_create(&path).expect("Failed to create config");
    assert_eq!(config, KeymapConfig::default());
    assert!(path.exists());

    let reloaded = KeymapConfig::load_or_create(&path).expect("Failed to reload config");
    assert_eq!(reloaded, config);

    cleanup_test_file(&path);
}

/// Tests that missing fields use defaults and bad values are corrected.
#[test]
fn test_config_defaults_and_validation() {
    let path = get_test_file_path("validation");

    let content = r#"
        frame_interval_ms = 0
        log_level = "chatty"
    "#;
    fs::write(&path, content).expect("Failed to write test config");

    let config = KeymapConfig::load_from_file(&path).expect("Failed to load config");

    assert!(!config.disable_key_repeat);
    assert_eq!(config.fallback_scancode_offset, 8);
    assert_eq!(config.frame_interval_ms, 1);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.level_filter(), tracing::level_filters::LevelFilter::INFO);

    cleanup_test_file(&path);
}

/// Tests that malformed TOML is reported instead of silently defaulted.
#[test]
fn test_config_invalid_toml() {
    let path = get_test_file_path("invalid_toml");
    fs::write(&path, "disable_key_repeat = maybe").expect("Failed to write test config");

    assert!(KeymapConfig::load_from_file(&path).is_err());

    cleanup_test_file(&path);
}

#[test]
fn test_parse_event_lines() {
    assert_eq!(parse_event_line("").unwrap(), None);
    assert_eq!(parse_event_line("   # just a comment").unwrap(), None);
    assert_eq!(parse_event_line("tick").unwrap(), Some(HostEvent::Tick));
    assert_eq!(
        parse_event_line("down a 38").unwrap(),
        Some(HostEvent::KeyDown {
            symbol: KeySymbol::A,
            physical: 38,
            modifiers: KeyMod::empty(),
        })
    );
    assert_eq!(
        parse_event_line("UP kp_5 0x54 num # keypad").unwrap(),
        Some(HostEvent::KeyUp {
            symbol: KeySymbol::Kp5,
            physical: 0x54,
            modifiers: KeyMod::NUM,
        })
    );
    assert_eq!(
        parse_event_line("down #1234 $10 lctrl+lshift").unwrap(),
        Some(HostEvent::KeyDown {
            symbol: KeySymbol::Other(1234),
            physical: 0x10,
            modifiers: KeyMod::LCTRL | KeyMod::LSHIFT,
        })
    );
}

#[test]
fn test_parse_event_line_errors() {
    assert!(parse_event_line("press a 38").is_err());
    assert!(parse_event_line("down").is_err());
    assert!(parse_event_line("down a").is_err());
    assert!(parse_event_line("down nosuchkey 38").is_err());
    assert!(parse_event_line("down a x38").is_err());
    assert!(parse_event_line("down a 38 hyper").is_err());
    assert!(parse_event_line("down a 38 - extra").is_err());
}

#[test]
fn test_parse_script_reports_line() {
    let err = parse_script("tick\ndown a 38\nbogus\n").unwrap_err();
    assert!(format!("{:#}", err).contains("line 3"));
}

/// Tests a typing session on an X11-style host (offset 8).
#[test]
fn test_replay_typing_session() {
    let script = "\
        # H, I, minus
        down h 43
        up h 43
        down i 31
        down i 31
        up i 31
        down minus 20
        up minus 0
    ";

    let mut replay = Replay::new(&KeymapConfig::default());
    let actions = replay.run_script(script).expect("script runs");

    assert_eq!(
        actions,
        vec![
            KeyAction::press(st(0x23)),
            KeyAction::release(st(0x23)),
            KeyAction::press(st(0x17)),
            KeyAction::release(st(0x17)),
            KeyAction::press(st(0x0C)),
            KeyAction::release(st(0x0C)),
        ]
    );
    assert_eq!(replay.keymap().scancode_offset(), Some(8));
}

/// Tests the offset is detected on a framebuffer-style host (offset 0).
#[test]
fn test_replay_framebuffer_offset() {
    let mut replay = Replay::new(&KeymapConfig::default());
    let actions = replay
        .run_script("down esc 1\nup esc 1\ndown equals 13\n")
        .expect("script runs");

    assert_eq!(replay.keymap().scancode_offset(), Some(0));
    assert_eq!(actions.last(), Some(&KeyAction::press(st(0x0D))));
}

/// Tests keypad numlock switching through the driver.
#[test]
fn test_replay_keypad_modes() {
    let mut replay = Replay::new(&KeymapConfig::default());
    let actions = replay
        .run_script("down kp5 84 num\nup kp5 84 num\ndown kp5 84\nup kp5 84\n")
        .expect("script runs");

    assert_eq!(
        actions,
        vec![
            KeyAction::press(st(0x6B)),
            KeyAction::release(st(0x6B)),
            KeyAction::press(st(0x50)),
            KeyAction::release(st(0x50)),
        ]
    );
}

/// Tests shortcut latching and polling at frame start.
#[test]
fn test_replay_shortcuts() {
    let mut replay = Replay::new(&KeymapConfig::default());

    let actions = replay.run_script("down f11 95\nup f11 95\n").expect("script runs");
    assert!(actions.is_empty());
    let latch = replay.poll_shortcut().expect("F11 latched");
    assert_eq!(latch.action(), Some(ShortcutAction::ToggleFullscreen));
    assert_eq!(replay.poll_shortcut(), None);

    let actions = replay
        .run_script("down q 24 rctrl\nup q 24 rctrl\n")
        .expect("script runs");
    // The press went to the latch, but the key is still tracked as held,
    // so its release reaches the machine.
    assert_eq!(actions, vec![KeyAction::release(st(0x10))]);
    let latch = replay.poll_shortcut().expect("ctrl+Q latched");
    assert!(latch.ctrl_pressed);
    assert_eq!(latch.action(), Some(ShortcutAction::Quit));
}

/// Tests held keys are released on tick when key repeat is disabled.
#[test]
fn test_replay_debounce_on_tick() {
    let config = KeymapConfig {
        disable_key_repeat: true,
        ..KeymapConfig::default()
    };
    let mut replay = Replay::new(&config);

    let actions = replay
        .run_script("down lctrl 37\ndown x 53\ntick\ntick\nup x 53\nup lctrl 37\n")
        .expect("script runs");

    assert_eq!(
        actions,
        vec![
            KeyAction::press(st(0x1D)),
            KeyAction::press(st(0x2D)),
            KeyAction::release(st(0x2D)),
            KeyAction::release(st(0x1D)),
        ]
    );
}

/// Tests frames keep firing while the event channel never goes idle.
#[test]
fn test_frames_tick_during_event_flood() {
    let config = KeymapConfig {
        disable_key_repeat: true,
        ..KeymapConfig::default()
    };
    let mut replay = Replay::new(&config);

    let (tx, rx) = crossbeam_channel::bounded(1);
    tx.send(parse_event_line("down x 53").unwrap().unwrap()).unwrap();
    let flood = thread::spawn(move || {
        let shift = parse_event_line("down lshift 50 lshift").unwrap().unwrap();
        while tx.send(shift).is_ok() {}
    });

    let ticker = crossbeam_channel::tick(Duration::from_millis(1));
    let mut seen = Vec::new();
    replay.run_frames(&rx, &ticker, |actions, _| {
        seen.extend_from_slice(actions);
        if seen.contains(&KeyAction::release(st(0x2D))) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    drop(rx);
    flood.join().expect("flood thread exits once the loop is gone");

    assert_eq!(seen[0], KeyAction::press(st(0x2D)));
    assert!(seen.contains(&KeyAction::press(st(0x2A))));
    // Shift is held throughout but never debounced.
    assert!(!seen.contains(&KeyAction::release(st(0x2A))));
}

/// Tests a tick line runs a frame and the loop ends when input does.
#[test]
fn test_frames_on_tick_event_and_disconnect() {
    let mut replay = Replay::new(&KeymapConfig::default());

    let (tx, rx) = crossbeam_channel::unbounded();
    for event in parse_script("down f11 95\nup f11 95\ntick\ndown m 58 rctrl\n").unwrap() {
        tx.send(event).unwrap();
    }
    drop(tx);

    let mut shortcuts = Vec::new();
    replay.run_frames(&rx, &crossbeam_channel::never(), |_, latch| {
        if let Some(latch) = latch {
            shortcuts.push(latch.action());
        }
        ControlFlow::Continue(())
    });

    assert_eq!(
        shortcuts,
        vec![
            Some(ShortcutAction::ToggleFullscreen),
            Some(ShortcutAction::ToggleMouseMode),
        ]
    );
}
