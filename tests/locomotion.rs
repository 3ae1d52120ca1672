use promenade::config::{CharacterConfig, TrackConfig};
use promenade::controller::CharacterController;
use promenade::events::EventBus;
use promenade::rig::CharacterRig;
use promenade::zone::BlinderSet;

const STEP: f32 = 1.0 / 60.0;

fn controller(track: TrackConfig) -> CharacterController {
    CharacterController::new(CharacterRig::stub(), &CharacterConfig::default(), &track)
        .expect("controller construction")
}

fn no_blinders() -> BlinderSet {
    BlinderSet::new(Vec::new(), 0.0)
}

#[test]
fn position_stays_inside_bounds_for_any_input_sequence() {
    let mut player = controller(TrackConfig::default());
    let blinders = no_blinders();
    let mut events = EventBus::default();
    player.start_idle();

    let pattern = [1.0, 1.0, -1.0, 1.0, 0.0, -1.0, -1.0, 1.0];
    let mut now = 0.0f64;
    for i in 0..4000 {
        now += f64::from(STEP);
        player.apply_input(pattern[i % pattern.len()], now, &blinders, &mut events);
        player.update(STEP, &mut events);
        let p = player.position_ref();
        assert!((-200.0..=200.0).contains(&p), "position {p} escaped bounds at step {i}");
    }
}

#[test]
fn integration_is_frame_rate_independent() {
    let mut coarse = controller(TrackConfig::default());
    let mut fine = controller(TrackConfig::default());
    let blinders = no_blinders();
    let mut events = EventBus::default();
    coarse.apply_input(1.0, 0.1, &blinders, &mut events);
    fine.apply_input(1.0, 0.1, &blinders, &mut events);

    coarse.update(0.1, &mut events);
    for _ in 0..10 {
        fine.update(0.01, &mut events);
    }
    assert!(
        (coarse.position_ref() - fine.position_ref()).abs() < 1e-3,
        "one 0.1s step ({}) should match ten 0.01s steps ({})",
        coarse.position_ref(),
        fine.position_ref()
    );
}

#[test]
fn settled_character_is_unchanged_by_zero_input() {
    let mut player = controller(TrackConfig::default());
    let blinders = no_blinders();
    let mut events = EventBus::default();
    player.start_idle();

    let position = player.position_ref();
    let rendered = player.rendered_position();
    let rotation = player.rendered_rotation();
    for _ in 0..100 {
        player.apply_input(0.0, 10.0, &blinders, &mut events);
        player.update(STEP, &mut events);
    }
    assert_eq!(player.position_ref(), position);
    assert_eq!(player.rendered_position(), rendered);
    assert_eq!(player.rendered_rotation(), rotation);
}

#[test]
fn clamps_at_the_max_bound_and_stays_there() {
    let mut player = controller(TrackConfig::default());
    let blinders = no_blinders();
    let mut events = EventBus::default();
    player.start_idle();

    let mut now = 0.0f64;
    let mut clamped_at = None;
    for i in 0..600 {
        now += f64::from(STEP);
        player.apply_input(1.0, now, &blinders, &mut events);
        player.update(STEP, &mut events);
        if clamped_at.is_none() && player.position_ref() >= 200.0 {
            clamped_at = Some(i);
        }
    }
    // At 38 units/s the 200-unit run ends well before the 10s mark.
    let reached = clamped_at.expect("character should reach the max bound");
    assert!(reached < 330, "expected clamp around step 316, got {reached}");
    assert_eq!(player.position_ref(), 200.0);
}

#[test]
fn facing_holds_after_input_release() {
    let mut player = controller(TrackConfig::default());
    let blinders = no_blinders();
    let mut events = EventBus::default();
    player.start_idle();

    let mut now = 0.0f64;
    for _ in 0..120 {
        now += f64::from(STEP);
        player.apply_input(-1.0, now, &blinders, &mut events);
        player.update(STEP, &mut events);
    }
    let facing_while_moving = player.rendered_rotation();

    // Past the persistence window, zero input applies but the character must
    // hold its facing instead of turning back toward a default.
    for _ in 0..120 {
        now += f64::from(STEP);
        player.apply_input(0.0, now, &blinders, &mut events);
        player.update(STEP, &mut events);
    }
    assert_eq!(player.move_input(), 0.0);
    assert_eq!(player.rendered_rotation(), facing_while_moving);
}

#[test]
fn pause_freezes_position_and_rotation() {
    let mut player = controller(TrackConfig::default());
    let blinders = no_blinders();
    let mut events = EventBus::default();
    player.start_idle();

    player.set_paused(true);
    let mut now = 0.0f64;
    for _ in 0..60 {
        now += f64::from(STEP);
        player.apply_input(1.0, now, &blinders, &mut events);
        player.update(STEP, &mut events);
    }
    assert_eq!(player.position_ref(), 0.0);
    assert_eq!(player.rendered_position().z, 0.0);

    player.set_paused(false);
    now += f64::from(STEP);
    player.apply_input(1.0, now, &blinders, &mut events);
    player.update(STEP, &mut events);
    assert!(player.position_ref() > 0.0, "integration resumes after focus regain");
}

#[test]
fn zero_input_waits_for_the_persistence_window() {
    let mut player = controller(TrackConfig::default());
    let blinders = no_blinders();
    let mut events = EventBus::default();
    player.start_idle();

    player.apply_input(1.0, 0.0, &blinders, &mut events);
    assert_eq!(player.move_input(), 1.0);

    // Released at t=0.1 with a 0.25s window: the old input persists.
    player.apply_input(0.0, 0.1, &blinders, &mut events);
    assert_eq!(player.move_input(), 1.0);
    player.apply_input(0.0, 0.2, &blinders, &mut events);
    assert_eq!(player.move_input(), 1.0);

    player.apply_input(0.0, 0.26, &blinders, &mut events);
    assert_eq!(player.move_input(), 0.0);
}

#[test]
fn blinder_zone_skips_the_persistence_window() {
    let mut player = controller(TrackConfig::default());
    // The character starts at z=0, inside this blinder.
    let blinders = BlinderSet::new(vec![-100.0, 0.0, 100.0], 12.0);
    let mut events = EventBus::default();
    player.start_idle();

    player.apply_input(1.0, 0.0, &blinders, &mut events);
    player.apply_input(0.0, 0.05, &blinders, &mut events);
    assert_eq!(player.move_input(), 0.0, "zero applies immediately inside a blinder");
}

#[test]
fn inverted_bounds_are_a_construction_error() {
    let track = TrackConfig { min_bound: 10.0, max_bound: -10.0, ..TrackConfig::default() };
    let result = CharacterController::new(CharacterRig::stub(), &CharacterConfig::default(), &track);
    assert!(result.is_err());
}

#[test]
fn non_positive_lerp_rates_are_a_construction_error() {
    let character = CharacterConfig { position_lerp: 0.0, ..CharacterConfig::default() };
    let result = CharacterController::new(CharacterRig::stub(), &character, &TrackConfig::default());
    assert!(result.is_err());
}
