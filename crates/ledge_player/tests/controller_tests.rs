//! Integration tests for the player controller against in-memory bodies

mod common;

use approx::assert_relative_eq;
use common::*;
use ledge_gamestate::{Checkpoint, CheckpointProvider};
use ledge_input::Key;
use ledge_math::Vec2;
use ledge_physics::{BodyKind, ColliderCategory, PhysicsError};
use ledge_player::*;

const DT: f32 = 16.0;

#[test]
fn test_jump_then_double_jump_after_release() {
    let mut h = Harness::with_defaults();
    assert_eq!(h.player.position(), Vec2::new(100.0, 500.0));

    h.frame(&[Key::Space], DT);
    assert_relative_eq!(h.player_body().velocity.y, -2.5);
    assert!(h.player.state().is_jumping());
    assert!(!h.player.state().has_double_jump());
    assert_eq!(h.player.animation(), Some("jump"));

    // Up then an immediate second press: the key was never seen idle
    h.frame(&[], DT);
    h.frame(&[Key::Space], DT);
    assert_relative_eq!(h.player_body().velocity.y, -2.5);
    assert!(!h.player.state().has_double_jump());

    // Up, then idle arms the double jump
    h.frame(&[], DT);
    h.frame(&[], DT);
    assert!(h.player.state().has_double_jump());
    assert!(h.player.state().space_released_since_jump());

    h.frame(&[Key::Space], DT);
    // -2.5 * 1.8 then an extra -2.5 * 0.3 impulse
    assert_relative_eq!(h.player_body().velocity.y, -5.25);
    assert!(!h.player.state().has_double_jump());
    assert!(h.player.state().is_jumping());

    // Consumed until landing
    h.idle_frames(2, DT);
    h.frame(&[Key::Space], DT);
    assert_relative_eq!(h.player_body().velocity.y, -5.25);
    assert_eq!(h.audio.played().len(), 2);
}

#[test]
fn test_landing_resets_jump_cycle() {
    let mut h = Harness::with_defaults();
    h.frame(&[Key::Space], DT);
    h.frame(&[], DT);

    h.touch(body(1), ColliderCategory::Platform, None);
    assert!(h.player.state().is_grounded());
    assert!(!h.player.state().space_released_since_jump());
    assert_eq!(h.player.animation(), Some("idle"));

    h.bodies.get_mut(player_body()).velocity = Vec2::ZERO;
    h.frame(&[Key::Space], DT);
    assert_relative_eq!(h.player_body().velocity.y, -2.5);
}

#[test]
fn test_run_left_and_right() {
    let mut h = Harness::with_defaults();

    // Movement reads REPEAT only
    h.frame(&[Key::D], DT);
    assert_eq!(h.player.velocity().x, 0.0);
    h.frame(&[Key::D], DT);
    assert_relative_eq!(h.player.velocity().x, 4.0);
    assert_relative_eq!(h.player_body().velocity.x, 4.0);
    assert_eq!(h.player.animation(), Some("move"));

    h.frame(&[Key::A], DT);
    assert_eq!(h.player.velocity().x, 0.0);
    h.frame(&[Key::A], DT);
    assert_relative_eq!(h.player.velocity().x, -4.0);

    h.frame(&[], DT);
    assert_eq!(h.player.velocity().x, 0.0);
}

#[test]
fn test_dash_duration_and_cooldown_timeline() {
    let mut config = config();
    config.movement.dash_duration = 200.0;
    config.movement.dash_cooldown = 500.0;
    let mut h = Harness::new(config);

    let step = 50.0;
    let mut dashing_at = Vec::new();
    for k in 0..=12 {
        let t = k * 50;
        let keys: &[Key] = if matches!(t, 0 | 300 | 600) {
            &[Key::LeftShift]
        } else {
            &[]
        };
        h.frame(keys, step);
        dashing_at.push((t, h.player.state().is_dashing()));
    }

    let at = |t: i32| dashing_at.iter().find(|(time, _)| *time == t).map(|(_, d)| *d);
    assert_eq!(at(0), Some(true));
    assert_eq!(at(150), Some(true));
    assert_eq!(at(250), Some(false));
    assert_eq!(at(300), Some(false), "cooldown still running");
    assert_eq!(at(600), Some(true), "cooldown expired");
    assert_relative_eq!(h.player.velocity().x, 10.0);
}

#[test]
fn test_dash_keeps_velocity_and_direction() {
    let mut h = Harness::with_defaults();
    h.frame(&[Key::A], DT);
    h.frame(&[Key::A, Key::RightShift], DT);

    assert_eq!(h.player.state().dash_direction(), Some(Direction::Left));
    assert_relative_eq!(h.player.velocity().x, -10.0);
    assert_relative_eq!(h.player_body().velocity.x, -10.0);

    // Horizontal velocity survives while dashing even with no keys
    h.frame(&[], DT);
    assert!(h.player.state().is_dashing());
    assert_relative_eq!(h.player.velocity().x, -10.0);
}

#[test]
fn test_dash_defaults_right() {
    let mut h = Harness::with_defaults();
    h.frame(&[Key::LeftShift], DT);
    assert_eq!(h.player.state().dash_direction(), Some(Direction::Right));
    assert_relative_eq!(h.player.velocity().x, 10.0);
}

#[test]
fn test_dash_cooldown_monotonic_under_held_modifier() {
    let mut h = Harness::with_defaults();
    h.frame(&[Key::LeftShift], 50.0);
    let mut previous = h.player.state().dash_cooldown_timer();
    assert_eq!(previous, 500.0);

    for _ in 0..9 {
        h.frame(&[Key::LeftShift], 50.0);
        let cooldown = h.player.state().dash_cooldown_timer();
        assert!(cooldown < previous, "{cooldown} should be below {previous}");
        previous = cooldown;
    }
}

#[test]
fn test_fall_death_and_timed_respawn() {
    let mut h = Harness::with_defaults();
    h.frame(&[Key::D], 100.0);

    // Map is 960 tall; death below 1060
    h.bodies.get_mut(player_body()).position = (300, 1060);
    h.frame(&[], 100.0);
    assert!(!h.player.is_dead());

    h.bodies.get_mut(player_body()).position = (300, 1061);
    h.bodies.get_mut(player_body()).velocity = Vec2::new(2.0, 9.0);
    h.frame(&[], 100.0);
    assert!(h.player.is_dead());
    assert_eq!(h.player.state().respawn_timer(), 1500.0);
    assert_eq!(h.player_body().velocity, Vec2::ZERO);
    assert_eq!(h.audio.stop_all_calls(), 1);
    assert_eq!(h.audio.played().len(), 1);

    // Dies once; stays dead until the timer runs out
    for _ in 0..14 {
        h.frame(&[Key::Space], 100.0);
        assert!(h.player.is_dead());
    }
    assert_eq!(h.audio.stop_all_calls(), 1);

    h.frame(&[], 100.0);
    assert!(!h.player.is_dead());
    assert_eq!(h.player_body().position, (100, 500));
    assert_eq!(h.player.position(), Vec2::new(100.0, 500.0));
    assert_eq!(h.player_body().kind, BodyKind::Dynamic);
    assert_eq!(*h.player.state(), PlayerState::default());
}

#[test]
fn test_enemy_contact_kills_once() {
    let mut h = Harness::with_defaults();
    let enemy = h.allocate_id();

    h.touch(body(2), ColliderCategory::Enemy, Some(enemy));
    assert!(h.player.is_dead());
    h.touch(body(2), ColliderCategory::Enemy, Some(enemy));
    assert_eq!(h.audio.stop_all_calls(), 1);

    // Landing is suppressed while dead
    h.touch(body(1), ColliderCategory::Platform, None);
    assert!(h.player.is_dead());
    assert_eq!(h.player.state().respawn_timer(), 1500.0);
}

#[test]
fn test_item_collected_while_dead() {
    let mut h = Harness::with_defaults();
    let enemy = h.allocate_id();
    let coin = h.allocate_id();

    // Enemy and coin begin contact in the same step
    h.touch(body(2), ColliderCategory::Enemy, Some(enemy));
    assert!(h.player.is_dead());
    assert_eq!(
        h.touch(body(3), ColliderCategory::Item, Some(coin)),
        CollisionResponse::Collect(coin)
    );
    assert!(h.player.is_dead());
    assert_eq!(h.player.state().respawn_timer(), 1500.0);
}

#[test]
fn test_god_mode_never_dies() {
    let mut h = Harness::with_defaults();
    h.frame(&[Key::Space], DT);
    h.player.set_god_mode(true);
    assert!(h.player.god_mode());

    let enemy = h.allocate_id();
    h.touch(body(2), ColliderCategory::Enemy, Some(enemy));
    h.player
        .die(&mut h.bodies, &mut h.audio)
        .expect("die in god mode");
    h.bodies.get_mut(player_body()).position = (100, 5000);
    h.frame(&[], DT);
    assert!(!h.player.is_dead());
    assert_eq!(h.audio.stop_all_calls(), 0);

    // Platforms are ignored; items are still collected
    h.touch(body(1), ColliderCategory::Platform, None);
    assert!(h.player.state().is_jumping());
    let coin = h.allocate_id();
    assert_eq!(
        h.touch(body(3), ColliderCategory::Item, Some(coin)),
        CollisionResponse::Collect(coin)
    );
}

#[test]
fn test_god_mode_flight() {
    let mut h = Harness::with_defaults();
    h.player.set_god_mode(true);

    h.frame(&[Key::D, Key::W], DT);
    h.frame(&[Key::D, Key::W], DT);
    assert_eq!(h.player_body().velocity, Vec2::new(8.0, -8.0));
    assert_eq!(h.player_body().kind, BodyKind::Kinematic);
    assert_eq!(h.player_body().gravity_scale, 0.0);

    // Jump and dash are not evaluated
    h.frame(&[Key::Space, Key::LeftShift], DT);
    assert!(!h.player.state().is_jumping());
    assert!(!h.player.state().is_dashing());
    assert_eq!(h.player_body().velocity, Vec2::ZERO);

    h.player.set_god_mode(false);
    h.frame(&[], DT);
    assert_eq!(h.player_body().kind, BodyKind::Dynamic);
    assert_eq!(h.player_body().gravity_scale, 1.0);
}

#[test]
fn test_item_pickup_requests_despawn() {
    let mut h = Harness::with_defaults();
    let coin = h.allocate_id();

    let response = h.touch(body(3), ColliderCategory::Item, Some(coin));
    assert_eq!(response, CollisionResponse::Collect(coin));
    assert_eq!(h.audio.played().len(), 1);
    assert_eq!(h.audio.effect_path(h.audio.played()[0].0), Some("coin.wav"));
}

#[test]
fn test_unknown_contact_changes_nothing() {
    let mut h = Harness::with_defaults();
    h.frame(&[Key::Space], DT);
    let before = *h.player.state();

    h.touch(body(4), ColliderCategory::Unknown, None);
    assert_eq!(*h.player.state(), before);
    assert!(h.audio.played().len() == 1);
}

fn falling_onto(h: &mut Harness, player_y: i32, fall_velocity: f32) {
    h.bodies.insert(body(1), FakeBody::at(100, 600));
    h.bodies.get_mut(player_body()).position = (100, player_y);
    h.frame(&[Key::Space], DT);
    h.bodies.get_mut(player_body()).velocity.y = fall_velocity;
    h.frame(&[], DT);
    assert_relative_eq!(h.player.last_y_velocity(), fall_velocity);
}

#[test]
fn test_one_way_landing_from_above() {
    let mut h = Harness::with_defaults();
    falling_onto(&mut h, 570, 3.0);

    h.touch(body(1), ColliderCategory::PlatformOneWay, None);
    assert!(h.player.state().is_grounded());
    assert!(h.player.is_on_one_way_platform());
    assert_eq!(h.player.current_one_way_platform(), Some(body(1)));
    assert_eq!(h.player_body().velocity.y, 0.0);

    h.separate(body(1), ColliderCategory::PlatformOneWay);
    assert!(!h.player.is_on_one_way_platform());
}

#[test]
fn test_one_way_ignored_from_below() {
    let mut h = Harness::with_defaults();
    falling_onto(&mut h, 630, 3.0);

    h.touch(body(1), ColliderCategory::PlatformOneWay, None);
    assert!(h.player.state().is_jumping());
    assert!(!h.player.is_on_one_way_platform());
}

#[test]
fn test_one_way_ignored_while_rising() {
    let mut h = Harness::with_defaults();
    falling_onto(&mut h, 570, -3.0);

    h.touch(body(1), ColliderCategory::PlatformOneWay, None);
    assert!(h.player.state().is_jumping());
    assert_relative_eq!(h.player_body().velocity.y, -3.0);
}

#[test]
fn test_one_way_margin() {
    let mut h = Harness::with_defaults();
    // Within 8 px of the platform center does not count as above
    falling_onto(&mut h, 593, 3.0);
    h.touch(body(1), ColliderCategory::PlatformOneWay, None);
    assert!(h.player.state().is_jumping());
}

#[test]
fn test_checkpoint_singleton() {
    let mut h = Harness::with_defaults();
    h.checkpoints
        .register(Checkpoint::new("bridge").with_position(Vec2::new(400.0, 500.0)));
    h.checkpoints
        .register(Checkpoint::new("cave").with_name("Cave").with_position(Vec2::new(900.0, 500.0)));

    h.frame(&[], DT);
    assert_eq!(h.player.current_checkpoint(), None);
    assert_eq!(h.checkpoints.activated_count(), 0);

    h.bodies.get_mut(player_body()).position = (420, 500);
    h.frame(&[], DT);
    assert_eq!(h.player.current_checkpoint(), Some("bridge"));
    assert_eq!(h.player.spawn_position(), Vec2::new(400.0, 500.0));
    assert_eq!(h.checkpoints.activated_count(), 1);

    h.bodies.get_mut(player_body()).position = (880, 490);
    h.frame(&[], DT);
    assert_eq!(h.player.current_checkpoint(), Some("cave"));
    assert_eq!(h.checkpoints.activated_count(), 1);
    assert!(!h.checkpoints.get("bridge").unwrap().activated);

    // Respawn uses the latest checkpoint
    h.player.die(&mut h.bodies, &mut h.audio).unwrap();
    h.idle_frames(15, 100.0);
    assert!(!h.player.is_dead());
    assert_eq!(h.player_body().position, (900, 500));
}

#[test]
fn test_teleport() {
    let mut h = Harness::with_defaults();
    h.frame(&[Key::T], DT);
    assert_eq!(h.player_body().position, (96, 96));
    assert_eq!(h.player.position(), Vec2::new(96.0, 96.0));

    // Only on the press frame
    h.bodies.get_mut(player_body()).position = (300, 300);
    h.frame(&[Key::T], DT);
    assert_eq!(h.player_body().position, (300, 300));
}

#[test]
fn test_camera_follows_after_sync() {
    let mut h = Harness::with_defaults();
    h.bodies.get_mut(player_body()).position = (1000, 500);
    h.frame(&[], DT);
    assert_eq!((h.player.camera().view.x, h.player.camera().view.y), (800, 200));

    let sprite = h.player.sprite();
    assert_eq!((sprite.dest.x, sprite.dest.y), (984, 484));
}

#[test]
fn test_missing_body_fails_fast() {
    let mut h = Harness::with_defaults();
    let id = h.allocate_id();
    let mut orphan = PlayerController::new(id, config());

    let mut ctx = FrameContext {
        bodies: &mut h.bodies,
        input: &h.input,
        audio: &mut h.audio,
        checkpoints: &mut h.checkpoints,
        map_size: MAP_SIZE,
        dt: DT,
    };
    assert!(matches!(orphan.update(&mut ctx), Err(PlayerError::BodyMissing)));

    orphan.attach_body(body(42));
    assert!(matches!(
        orphan.update(&mut ctx),
        Err(PlayerError::Physics(PhysicsError::BodyNotFound(_)))
    ));
}

#[test]
fn test_reset_returns_to_configured_spawn() {
    let mut h = Harness::with_defaults();
    h.checkpoints
        .register(Checkpoint::new("cave").with_position(Vec2::new(400.0, 500.0)));
    h.bodies.get_mut(player_body()).position = (400, 500);
    h.frame(&[Key::Space], DT);
    h.player.set_god_mode(true);
    assert_eq!(h.player.current_checkpoint(), Some("cave"));

    h.player.reset();
    assert_eq!(*h.player.state(), PlayerState::default());
    assert_eq!(h.player.position(), Vec2::new(100.0, 500.0));
    assert_eq!(h.player.spawn_position(), Vec2::new(100.0, 500.0));
    assert_eq!(h.player.current_checkpoint(), None);
    assert!(h.player.god_mode());
}
