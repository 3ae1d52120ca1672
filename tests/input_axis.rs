use promenade::events::{EventBus, GameEvent};
use promenade::input::{InputAggregator, InputEvent, TouchButton};
use std::io::Write;
use tempfile::NamedTempFile;
use winit::keyboard::{Key, NamedKey};

fn key(ch: &str, pressed: bool) -> InputEvent {
    InputEvent::Key { key: Key::Character(ch.into()), pressed }
}

fn named(named: NamedKey, pressed: bool) -> InputEvent {
    InputEvent::Key { key: Key::Named(named), pressed }
}

#[test]
fn keyboard_and_arrow_aliases_drive_the_same_axis() {
    let mut input = InputAggregator::new();
    input.push(key("a", true));
    assert_eq!(input.horizontal(), -1.0);
    input.push(key("a", false));
    assert_eq!(input.horizontal(), 0.0);

    input.push(named(NamedKey::ArrowRight, true));
    assert_eq!(input.horizontal(), 1.0);
    input.push(named(NamedKey::ArrowRight, false));
    assert_eq!(input.horizontal(), 0.0);
}

#[test]
fn opposing_directions_cancel() {
    let mut input = InputAggregator::new();
    input.push(key("a", true));
    input.push(key("d", true));
    assert_eq!(input.horizontal(), 0.0);
    input.push(key("a", false));
    assert_eq!(input.horizontal(), 1.0);
}

#[test]
fn os_key_repeat_does_not_double_count() {
    let mut input = InputAggregator::new();
    for _ in 0..20 {
        input.push(key("d", true));
    }
    assert_eq!(input.held_count(), 1);
    input.push(key("d", false));
    assert_eq!(input.horizontal(), 0.0);
    assert_eq!(input.held_count(), 0);
}

#[test]
fn blur_clears_held_state_and_stray_keyup_is_a_noop() {
    let mut input = InputAggregator::new();
    input.push(key("a", true));
    assert_eq!(input.horizontal(), -1.0);

    input.push(InputEvent::Focus { focused: false });
    assert_eq!(input.horizontal(), 0.0);
    assert_eq!(input.held_count(), 0);

    // The key-up that the blur swallowed arrives late; nothing changes.
    input.push(key("a", false));
    assert_eq!(input.horizontal(), 0.0);
    assert_eq!(input.held_count(), 0);
}

#[test]
fn touch_buttons_suppress_duplicate_start_events() {
    let mut input = InputAggregator::new();
    let mut events = EventBus::default();

    // Overlapping mousedown/touchstart arrive as two starts.
    input.touch_start(TouchButton::Right, &mut events);
    input.touch_start(TouchButton::Right, &mut events);
    assert_eq!(input.horizontal(), 1.0);
    let fired = events.drain();
    assert_eq!(
        fired,
        vec![GameEvent::TouchButton { button: TouchButton::Right, pressed: true }],
        "the duplicate start must not emit a second cosmetic event"
    );

    input.touch_end(TouchButton::Right, &mut events);
    input.touch_end(TouchButton::Right, &mut events);
    assert_eq!(input.horizontal(), 0.0);
    assert_eq!(events.drain().len(), 1);
}

#[test]
fn touch_and_keyboard_share_the_held_set() {
    let mut input = InputAggregator::new();
    let mut events = EventBus::default();
    input.touch_start(TouchButton::Left, &mut events);
    input.push(key("d", true));
    assert_eq!(input.horizontal(), 0.0, "touch-left and key-right cancel");
    input.touch_end(TouchButton::Left, &mut events);
    assert_eq!(input.horizontal(), 1.0);
}

#[test]
fn remapped_bindings_override_defaults() {
    let mut temp = NamedTempFile::new().expect("temp bindings file");
    write!(temp, r#"{{"bindings":{{"move_left":["j"],"move_right":["l"]}}}}"#)
        .expect("write remap config");

    let mut input = InputAggregator::from_config(temp.path());

    input.push(key("j", true));
    assert_eq!(input.horizontal(), -1.0, "custom key drives the axis");
    input.push(key("j", false));

    input.push(key("a", true));
    assert_eq!(input.horizontal(), 0.0, "default key no longer fires when remapped");
}

#[test]
fn invalid_bindings_fall_back_to_defaults() {
    let mut temp = NamedTempFile::new().expect("temp bindings file");
    write!(temp, r#"{{"bindings":{{"move_left":["not_a_key"],"warp":["w"]}}}}"#)
        .expect("write bad config");

    let mut input = InputAggregator::from_config(temp.path());
    input.push(key("a", true));
    assert_eq!(input.horizontal(), -1.0, "defaults survive a config with no valid keys");
}
