//! Player controller
//!
//! Reads input, drives the movement state machine and writes the resulting
//! velocity into the player's body once per frame. Collision responses run
//! synchronously from inside the physics step through
//! [`PlayerController::on_collision_begin`] and
//! [`PlayerController::on_collision_end`].

use crate::animation::AnimationSet;
use crate::camera::Camera;
use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::state::{Direction, Outcome, PlayerState, Trigger};
use ledge_audio::{AudioService, EffectId};
use ledge_core::EntityId;
use ledge_gamestate::CheckpointProvider;
use ledge_input::{InputService, Key, KeyState};
use ledge_math::{Rect, Vec2};
use ledge_physics::{
    BodyControl, BodyDesc, BodyHandle, BodyKind, ColliderCategory, ColliderDesc, ColliderShape,
    Contact, PhysicsWorld,
};

/// Services the controller needs for one frame
pub struct FrameContext<'a> {
    pub bodies: &'a mut dyn BodyControl,
    pub input: &'a dyn InputService,
    pub audio: &'a mut dyn AudioService,
    pub checkpoints: &'a mut dyn CheckpointProvider,
    /// Map size in pixels
    pub map_size: (i32, i32),
    /// Frame delta in milliseconds
    pub dt: f32,
}

/// What the level must do after a collision response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResponse {
    None,
    /// The player picked up this entity; remove it from the level
    Collect(EntityId),
}

/// Loaded effect ids
#[derive(Debug, Clone, Copy, Default)]
struct Effects {
    pickup: EffectId,
    jump: EffectId,
    death: EffectId,
}

/// Where and what to draw for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Destination in world pixels
    pub dest: Rect,
    /// Source rectangle in the sprite sheet
    pub source: Rect,
}

pub struct PlayerController {
    id: EntityId,
    config: PlayerConfig,
    body: Option<BodyHandle>,
    state: PlayerState,
    /// Body center in pixels, synced after each physics step
    position: Vec2,
    /// Velocity staged during the frame
    velocity: Vec2,
    /// Vertical velocity written on the previous frame
    last_y_velocity: f32,
    spawn_position: Vec2,
    current_checkpoint: Option<String>,
    one_way_platform: Option<BodyHandle>,
    god_mode: bool,
    animations: AnimationSet,
    effects: Effects,
    camera: Camera,
}

impl PlayerController {
    pub fn new(id: EntityId, config: PlayerConfig) -> Self {
        let mut animations = AnimationSet::from_config(&config.animations);
        animations.set_current("idle");

        Self {
            id,
            position: config.position,
            spawn_position: config.position,
            body: None,
            state: PlayerState::default(),
            velocity: Vec2::ZERO,
            last_y_velocity: 0.0,
            current_checkpoint: None,
            one_way_platform: None,
            god_mode: false,
            animations,
            effects: Effects::default(),
            camera: Camera::default(),
            config,
        }
    }

    /// Create the player's body and load its sound effects
    pub fn start(&mut self, world: &mut PhysicsWorld, audio: &mut dyn AudioService) -> Result<()> {
        let body = world.create_body(
            BodyDesc::dynamic().with_position(self.position.x, self.position.y),
            ColliderDesc::new(ColliderShape::circle(self.config.body_radius() as f32))
                .with_category(ColliderCategory::Player)
                .detecting_all_kinds(),
        );
        world.set_listener(body, self.id)?;
        self.attach_body(body);
        self.load_effects(audio);

        log::info!(
            "Player spawned at ({}, {}) speed={} jump_force={} dash_force={}",
            self.position.x,
            self.position.y,
            self.config.movement.speed,
            self.config.movement.jump_force,
            self.config.movement.dash_force
        );
        Ok(())
    }

    /// Use an existing body for the player
    pub fn attach_body(&mut self, body: BodyHandle) {
        self.body = Some(body);
    }

    /// Destroy the player's body; the controller keeps its state
    pub fn clean_up(&mut self, world: &mut PhysicsWorld) {
        if let Some(body) = self.body.take() {
            world.remove_body(body);
            log::info!("Cleanup player");
        }
    }

    /// Return to the configured spawn with fresh state; god mode is kept
    pub fn reset(&mut self) {
        self.state = PlayerState::default();
        self.position = self.config.position;
        self.spawn_position = self.config.position;
        self.velocity = Vec2::ZERO;
        self.last_y_velocity = 0.0;
        self.current_checkpoint = None;
        self.one_way_platform = None;
        self.animations.set_current("idle");
    }

    pub fn load_effects(&mut self, audio: &mut dyn AudioService) {
        let paths = &self.config.audio;
        self.effects = Effects {
            pickup: audio.load_effect(&paths.pickup_fx),
            jump: audio.load_effect(&paths.jump_fx),
            death: audio.load_effect(&paths.death_fx),
        };
    }

    fn body(&self) -> Result<BodyHandle> {
        self.body.ok_or(PlayerError::BodyMissing)
    }

    // ==================== Frame ====================

    /// Evaluate one frame of input and stage the body's velocity
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        let body = self.body()?;

        if self.state.is_dead() {
            if self.state.transition(Trigger::Tick { dt: ctx.dt }) == Outcome::Respawned {
                self.respawn(ctx.bodies)?;
            }
            return Ok(());
        }

        if self.god_mode {
            self.velocity = self.fly(ctx.input);
        } else {
            if self.state.transition(Trigger::Tick { dt: ctx.dt }) == Outcome::DashEnded {
                log::debug!("Dash ended");
            }

            self.velocity = ctx.bodies.linear_velocity(body)?;
            if !self.state.is_dashing() {
                self.velocity.x = 0.0;
            }

            self.run(ctx.input);
            self.jump(ctx, body)?;
            self.double_jump(ctx, body)?;
            self.dash(ctx, body)?;
        }

        self.teleport(ctx, body)?;

        let (x, y) = ctx.bodies.position(body)?;
        if y as f32 > ctx.map_size.1 as f32 + self.config.movement.fall_margin {
            log::debug!("Fell out of the map at ({}, {})", x, y);
            self.die(ctx.bodies, ctx.audio)?;
            if self.state.is_dead() {
                return Ok(());
            }
        }

        self.reach_checkpoint(ctx.checkpoints, Vec2::new(x as f32, y as f32));
        self.apply_physics(ctx.bodies, body)
    }

    /// Sync position from the body after the physics step and move the camera
    pub fn post_update(
        &mut self,
        bodies: &dyn BodyControl,
        dt: f32,
        map_size: (i32, i32),
    ) -> Result<()> {
        let (x, y) = bodies.position(self.body()?)?;
        self.position = Vec2::new(x as f32, y as f32);
        self.camera.follow((x, y), map_size);
        self.animations.update(dt);
        Ok(())
    }

    fn run(&mut self, input: &dyn InputService) {
        if self.state.is_dashing() {
            return;
        }
        let speed = self.config.movement.speed;
        if input.is_repeat(Key::A) {
            self.velocity.x = -speed;
            self.animations.set_current("move");
        }
        if input.is_repeat(Key::D) {
            self.velocity.x = speed;
            self.animations.set_current("move");
        }
    }

    /// Free flight in four directions; jump and dash are not evaluated
    fn fly(&mut self, input: &dyn InputService) -> Vec2 {
        let speed = self.config.movement.speed * self.config.movement.god_speed_factor;
        let mut velocity = Vec2::ZERO;

        if input.is_repeat(Key::W) {
            velocity.y = -speed;
        }
        if input.is_repeat(Key::S) {
            velocity.y = speed;
        }
        if input.is_repeat(Key::A) {
            velocity.x = -speed;
        }
        if input.is_repeat(Key::D) {
            velocity.x = speed;
        }

        if velocity.x != 0.0 {
            self.animations.set_current("move");
        } else if velocity == Vec2::ZERO {
            self.animations.set_current("idle");
        }
        velocity
    }

    fn jump(&mut self, ctx: &mut FrameContext<'_>, body: BodyHandle) -> Result<()> {
        let space = ctx.input.key_state(Key::Space);
        let jump_force = self.config.movement.jump_force;

        if space == KeyState::Down && self.state.is_grounded() {
            ctx.bodies.apply_impulse(body, Vec2::new(0.0, -jump_force), true)?;
            self.state.transition(Trigger::Launch);
            self.animations.set_current("jump");
            ctx.audio.play_effect(self.effects.jump, None);
            log::debug!("Jump, force {:.2}", jump_force);
        }

        if space == KeyState::Idle && self.state.transition(Trigger::JumpKeyIdle) == Outcome::Applied {
            log::debug!("Jump key released, double jump armed");
        }
        Ok(())
    }

    fn double_jump(&mut self, ctx: &mut FrameContext<'_>, body: BodyHandle) -> Result<()> {
        if !ctx.input.is_down(Key::Space) {
            return Ok(());
        }
        if !self.state.has_double_jump() {
            if self.state.is_jumping() {
                log::trace!("Double jump unavailable");
            }
            return Ok(());
        }

        let m = &self.config.movement;
        let current = ctx.bodies.linear_velocity(body)?;
        ctx.bodies.set_linear_velocity(
            body,
            Vec2::new(current.x, -m.jump_force * m.double_jump_velocity_factor),
        )?;
        ctx.bodies.apply_impulse(
            body,
            Vec2::new(0.0, -m.jump_force * m.double_jump_impulse_factor),
            true,
        )?;

        self.state.transition(Trigger::DoubleJump);
        self.animations.set_current("jump");
        ctx.audio.play_effect(self.effects.jump, None);
        log::debug!(
            "Double jump, velocity before ({:.2}, {:.2})",
            current.x,
            current.y
        );
        Ok(())
    }

    fn dash(&mut self, ctx: &mut FrameContext<'_>, body: BodyHandle) -> Result<()> {
        if !self.state.can_dash() {
            return Ok(());
        }
        if !(ctx.input.is_held(Key::LeftShift) || ctx.input.is_held(Key::RightShift)) {
            return Ok(());
        }

        let direction = if ctx.input.is_repeat(Key::A) {
            Direction::Left
        } else {
            Direction::Right
        };

        let m = &self.config.movement;
        self.state.transition(Trigger::StartDash {
            direction,
            duration: m.dash_duration,
            cooldown: m.dash_cooldown,
        });

        self.velocity.x = m.dash_force * direction.sign();
        ctx.bodies.apply_impulse(
            body,
            Vec2::new(m.dash_force * m.dash_impulse_factor * direction.sign(), 0.0),
            true,
        )?;
        log::debug!("Dash {:?}, velocity {:.2}", direction, self.velocity.x);
        Ok(())
    }

    fn teleport(&mut self, ctx: &mut FrameContext<'_>, body: BodyHandle) -> Result<()> {
        if ctx.input.is_down(Key::T) {
            let target = self.config.movement.teleport_position;
            ctx.bodies.set_position(body, target.x as i32, target.y as i32)?;
            log::debug!("Teleport to ({}, {})", target.x, target.y);
        }
        Ok(())
    }

    fn reach_checkpoint(&mut self, checkpoints: &mut dyn CheckpointProvider, at: Vec2) {
        let Some(found) = checkpoints.find_nearest(at, self.config.movement.checkpoint_radius) else {
            return;
        };

        if let Some(previous) = self.current_checkpoint.take() {
            checkpoints.deactivate(&previous);
        }
        checkpoints.activate(&found.id);
        self.spawn_position = found.position;
        log::info!(
            "Checkpoint '{}' reached, spawn now ({}, {})",
            found.label(),
            found.position.x,
            found.position.y
        );
        self.current_checkpoint = Some(found.id);
    }

    fn apply_physics(&mut self, bodies: &mut dyn BodyControl, body: BodyHandle) -> Result<()> {
        if self.god_mode {
            bodies.set_gravity_scale(body, 0.0)?;
            bodies.set_body_kind(body, BodyKind::Kinematic)?;
        } else {
            bodies.set_gravity_scale(body, 1.0)?;
            bodies.set_body_kind(body, BodyKind::Dynamic)?;
            if self.state.is_dashing() || self.state.is_jumping() {
                self.velocity.y = bodies.y_velocity(body)?;
            }
        }
        bodies.set_linear_velocity(body, self.velocity)?;
        self.last_y_velocity = self.velocity.y;
        Ok(())
    }

    // ==================== Death ====================

    /// Kill the player unless in god mode; no effect while already dead
    pub fn die(&mut self, bodies: &mut dyn BodyControl, audio: &mut dyn AudioService) -> Result<()> {
        if self.god_mode {
            log::debug!("Death ignored in god mode");
            return Ok(());
        }
        let body = self.body()?;

        let delay = self.config.movement.respawn_delay;
        if self.state.transition(Trigger::Die { respawn_delay: delay }) != Outcome::Applied {
            return Ok(());
        }

        self.velocity = Vec2::ZERO;
        self.one_way_platform = None;
        bodies.set_linear_velocity(body, Vec2::ZERO)?;
        bodies.set_gravity_scale(body, 0.0)?;
        audio.stop_all_effects();
        audio.play_effect(self.effects.death, None);
        log::info!("Player died, respawning in {} ms", delay);
        Ok(())
    }

    fn respawn(&mut self, bodies: &mut dyn BodyControl) -> Result<()> {
        let body = self.body()?;
        let spawn = self.spawn_position;

        bodies.set_position(body, spawn.x as i32, spawn.y as i32)?;
        bodies.set_linear_velocity(body, Vec2::ZERO)?;
        bodies.set_gravity_scale(body, 1.0)?;
        bodies.set_body_kind(body, BodyKind::Dynamic)?;

        self.position = spawn;
        self.velocity = Vec2::ZERO;
        self.last_y_velocity = 0.0;
        self.one_way_platform = None;
        self.animations.set_current("idle");
        log::info!("Player respawned at ({}, {})", spawn.x, spawn.y);
        Ok(())
    }

    // ==================== Collisions ====================

    pub fn on_collision_begin(
        &mut self,
        bodies: &mut dyn BodyControl,
        audio: &mut dyn AudioService,
        contact: &Contact,
    ) -> Result<CollisionResponse> {
        // Pickups still happen while dead or flying
        let suppressed = self.state.is_dead() || self.god_mode;
        if suppressed && contact.other_category != ColliderCategory::Item {
            return Ok(CollisionResponse::None);
        }

        match contact.other_category {
            ColliderCategory::Platform => {
                self.land();
            }
            ColliderCategory::PlatformOneWay => {
                let (_, player_y) = bodies.position(contact.body)?;
                let (_, platform_y) = bodies.position(contact.other)?;
                let above = (player_y as f32)
                    < platform_y as f32 - self.config.movement.one_way_landing_margin;

                if self.last_y_velocity > 0.0 && above {
                    let velocity = bodies.linear_velocity(contact.body)?;
                    bodies.set_linear_velocity(contact.body, velocity.with_y(0.0))?;
                    self.land();
                    self.one_way_platform = Some(contact.other);
                } else {
                    log::trace!(
                        "Passing through one-way platform (vy {:.2}, y {} vs {})",
                        self.last_y_velocity,
                        player_y,
                        platform_y
                    );
                }
            }
            ColliderCategory::Item => {
                log::debug!("Collision ITEM");
                audio.play_effect(self.effects.pickup, None);
                if let Some(item) = contact.other_owner {
                    return Ok(CollisionResponse::Collect(item));
                }
            }
            ColliderCategory::Enemy => {
                log::debug!("Collision ENEMY");
                self.die(bodies, audio)?;
            }
            ColliderCategory::Player | ColliderCategory::Unknown => {
                log::debug!("Collision {}", contact.other_category);
            }
        }
        Ok(CollisionResponse::None)
    }

    pub fn on_collision_end(&mut self, contact: &Contact) {
        if self.one_way_platform == Some(contact.other) {
            self.one_way_platform = None;
            log::trace!("Left one-way platform");
        }
        log::trace!("End collision {}", contact.other_category);
    }

    fn land(&mut self) {
        if self.state.transition(Trigger::Land) == Outcome::Applied {
            log::debug!("Grounded, jump cycle reset");
        }
        self.animations.set_current("idle");
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn body_handle(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity written to the body on the last update
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn last_y_velocity(&self) -> f32 {
        self.last_y_velocity
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn_position
    }

    pub fn current_checkpoint(&self) -> Option<&str> {
        self.current_checkpoint.as_deref()
    }

    pub fn is_on_one_way_platform(&self) -> bool {
        self.one_way_platform.is_some()
    }

    pub fn current_one_way_platform(&self) -> Option<BodyHandle> {
        self.one_way_platform
    }

    pub fn god_mode(&self) -> bool {
        self.god_mode
    }

    pub fn set_god_mode(&mut self, enabled: bool) {
        if self.god_mode != enabled {
            log::info!("God mode: {}", if enabled { "ON" } else { "OFF" });
        }
        self.god_mode = enabled;
    }

    pub fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.camera = Camera::new(width, height);
    }

    pub fn animation(&self) -> Option<&str> {
        self.animations.current_name()
    }

    pub fn sprite(&self) -> Sprite {
        let (w, h) = (self.config.texture.width, self.config.texture.height);
        Sprite {
            dest: Rect::new(
                self.position.x as i32 - w / 2,
                self.position.y as i32 - h / 2,
                w,
                h,
            ),
            source: self.animations.current_frame(),
        }
    }
}
