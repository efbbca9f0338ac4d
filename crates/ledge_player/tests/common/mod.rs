//! Shared fixtures: an in-memory body store and a controller harness

#![allow(dead_code)]

use ledge_audio::SilentAudio;
use ledge_core::{EntityId, EntityTag, HandleAllocator};
use ledge_gamestate::CheckpointSet;
use ledge_input::{InputService, Key, KeyboardState};
use ledge_math::Vec2;
use ledge_physics::{
    BodyControl, BodyHandle, BodyKind, ColliderCategory, Contact, ContactKind, PhysicsError,
};
use ledge_player::{CollisionResponse, FrameContext, PlayerConfig, PlayerController};
use std::collections::HashMap;

pub const MAP_SIZE: (i32, i32) = (3200, 960);

pub fn body(index: u32) -> BodyHandle {
    BodyHandle::from_raw_parts(index, 0)
}

pub fn player_body() -> BodyHandle {
    body(0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeBody {
    pub position: (i32, i32),
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub kind: BodyKind,
}

impl FakeBody {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: (x, y),
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            kind: BodyKind::Dynamic,
        }
    }
}

/// Bodies with unit mass and no integration: an impulse adds straight to
/// the velocity and nothing moves unless a test moves it.
#[derive(Debug, Default)]
pub struct FakeBodies {
    pub bodies: HashMap<BodyHandle, FakeBody>,
}

impl FakeBodies {
    pub fn insert(&mut self, handle: BodyHandle, body: FakeBody) {
        self.bodies.insert(handle, body);
    }

    pub fn get(&self, handle: BodyHandle) -> &FakeBody {
        &self.bodies[&handle]
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> &mut FakeBody {
        self.bodies.get_mut(&handle).expect("unknown fake body")
    }

    fn lookup(&self, handle: BodyHandle) -> Result<&FakeBody, PhysicsError> {
        self.bodies.get(&handle).ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn lookup_mut(&mut self, handle: BodyHandle) -> Result<&mut FakeBody, PhysicsError> {
        self.bodies
            .get_mut(&handle)
            .ok_or(PhysicsError::BodyNotFound(handle))
    }
}

impl BodyControl for FakeBodies {
    fn linear_velocity(&self, body: BodyHandle) -> ledge_physics::Result<Vec2> {
        Ok(self.lookup(body)?.velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) -> ledge_physics::Result<()> {
        self.lookup_mut(body)?.velocity = velocity;
        Ok(())
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2, _wake_up: bool) -> ledge_physics::Result<()> {
        self.lookup_mut(body)?.velocity += impulse;
        Ok(())
    }

    fn position(&self, body: BodyHandle) -> ledge_physics::Result<(i32, i32)> {
        Ok(self.lookup(body)?.position)
    }

    fn set_position(&mut self, body: BodyHandle, x: i32, y: i32) -> ledge_physics::Result<()> {
        self.lookup_mut(body)?.position = (x, y);
        Ok(())
    }

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) -> ledge_physics::Result<()> {
        self.lookup_mut(body)?.gravity_scale = scale;
        Ok(())
    }

    fn set_body_kind(&mut self, body: BodyHandle, kind: BodyKind) -> ledge_physics::Result<()> {
        self.lookup_mut(body)?.kind = kind;
        Ok(())
    }
}

/// A player wired to fake services
pub struct Harness {
    pub ids: HandleAllocator<EntityTag>,
    pub bodies: FakeBodies,
    pub input: KeyboardState,
    pub audio: SilentAudio,
    pub checkpoints: CheckpointSet,
    pub player: PlayerController,
    pub map_size: (i32, i32),
}

impl Harness {
    pub fn new(config: PlayerConfig) -> Self {
        let mut ids = HandleAllocator::new();
        let player_id = ids.allocate();

        let mut bodies = FakeBodies::default();
        bodies.insert(
            player_body(),
            FakeBody::at(config.position.x as i32, config.position.y as i32),
        );

        let mut audio = SilentAudio::new();
        let mut player = PlayerController::new(player_id, config);
        player.attach_body(player_body());
        player.load_effects(&mut audio);
        player.set_viewport(800, 600);

        Self {
            ids,
            bodies,
            input: KeyboardState::new(),
            audio,
            checkpoints: CheckpointSet::new(),
            player,
            map_size: MAP_SIZE,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(config())
    }

    /// Run one frame with exactly `keys` pressed
    pub fn frame(&mut self, keys: &[Key], dt: f32) {
        self.input.set_pressed(keys.iter().copied());
        self.input.poll();

        let mut ctx = FrameContext {
            bodies: &mut self.bodies,
            input: &self.input,
            audio: &mut self.audio,
            checkpoints: &mut self.checkpoints,
            map_size: self.map_size,
            dt,
        };
        self.player.update(&mut ctx).expect("update");
        self.player
            .post_update(&self.bodies, dt, self.map_size)
            .expect("post_update");
    }

    pub fn idle_frames(&mut self, count: usize, dt: f32) {
        for _ in 0..count {
            self.frame(&[], dt);
        }
    }

    pub fn player_body(&self) -> &FakeBody {
        self.bodies.get(player_body())
    }

    pub fn allocate_id(&mut self) -> EntityId {
        self.ids.allocate()
    }

    /// Deliver a begin contact between the player and `other`
    pub fn touch(
        &mut self,
        other: BodyHandle,
        category: ColliderCategory,
        owner: Option<EntityId>,
    ) -> CollisionResponse {
        let contact = self.contact(ContactKind::Begin, other, category, owner);
        self.player
            .on_collision_begin(&mut self.bodies, &mut self.audio, &contact)
            .expect("collision")
    }

    /// Deliver an end contact between the player and `other`
    pub fn separate(&mut self, other: BodyHandle, category: ColliderCategory) {
        let contact = self.contact(ContactKind::End, other, category, None);
        self.player.on_collision_end(&contact);
    }

    fn contact(
        &self,
        kind: ContactKind,
        other: BodyHandle,
        other_category: ColliderCategory,
        other_owner: Option<EntityId>,
    ) -> Contact {
        Contact {
            kind,
            body: player_body(),
            category: ColliderCategory::Player,
            owner: self.player.id(),
            other,
            other_category,
            other_owner,
            is_sensor: other_category == ColliderCategory::Item,
        }
    }
}

/// The demo player's tuning, with every effect path set so plays are observable
pub fn config() -> PlayerConfig {
    let mut config = PlayerConfig::default();
    config.position = Vec2::new(100.0, 500.0);
    config.movement.speed = 4.0;
    config.movement.jump_force = 2.5;
    config.movement.dash_force = 10.0;
    config.movement.dash_duration = 200.0;
    config.movement.dash_cooldown = 500.0;
    config.texture.width = 32;
    config.texture.height = 32;
    config.audio.pickup_fx = "coin.wav".into();
    config.audio.jump_fx = "jump.wav".into();
    config.audio.death_fx = "death.wav".into();
    config
}
