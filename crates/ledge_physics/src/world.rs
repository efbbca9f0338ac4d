//! Pixel-space physics world with per-body collision listeners

use crate::body::{BodyControl, BodyDesc, BodyHandle, BodyKind};
use crate::collider::{ColliderDesc, ColliderShape};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{CollisionListener, Contact, ContactKind};
use crate::hooks::OneWayPlatformHook;
use crate::layers::ColliderCategory;
use ledge_core::EntityId;
use ledge_math::Vec2;
use rapier2d::prelude as rapier;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Registry entry for a body created through the world
#[derive(Debug, Clone, Copy)]
struct BodyMeta {
    collider: rapier::ColliderHandle,
    category: ColliderCategory,
    /// Listener that receives this body's collisions
    owner: Option<EntityId>,
}

/// Rapier simulation state plus the owner and category of every body
pub struct PhysicsWorld {
    config: PhysicsConfig,

    pipeline: rapier::PhysicsPipeline,
    gravity: rapier::Vector<f32>,
    integration_params: rapier::IntegrationParameters,
    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd_solver: rapier::CCDSolver,
    bodies: rapier::RigidBodySet,
    colliders: rapier::ColliderSet,

    /// Body handle -> category and listener
    registry: HashMap<BodyHandle, BodyMeta>,
    /// Collider handle -> owning body, kept so events for removed colliders
    /// can still be attributed until the registry entry is gone
    collider_to_body: HashMap<rapier::ColliderHandle, BodyHandle>,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            registry: HashMap::new(),
            collider_to_body: HashMap::new(),
            accumulated_time: 0.0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> [f32; 2] {
        [self.gravity.x, self.gravity.y]
    }

    // ==================== Bodies ====================

    /// Create a body with a single collider
    pub fn create_body(&mut self, desc: BodyDesc, collider: ColliderDesc) -> BodyHandle {
        let ppm = self.config.pixels_per_meter;
        let mut body_builder = desc.to_rapier_builder(ppm);
        if desc.kind == BodyKind::Dynamic && self.config.ccd_enabled {
            body_builder = body_builder.ccd_enabled(true);
        }

        let body = self.bodies.insert(body_builder);
        let collider_handle = self.colliders.insert_with_parent(
            collider.to_rapier_builder(ppm),
            body,
            &mut self.bodies,
        );

        let handle = BodyHandle(body);
        self.registry.insert(
            handle,
            BodyMeta {
                collider: collider_handle,
                category: collider.category,
                owner: None,
            },
        );
        self.collider_to_body.insert(collider_handle, handle);

        log::trace!(
            "Created {:?} body {:?} ({}) at ({}, {})",
            desc.kind,
            handle,
            collider.category,
            desc.position[0],
            desc.position[1]
        );

        handle
    }

    /// Create a circular body centered at a pixel position
    pub fn create_circle(&mut self, x: i32, y: i32, radius: i32, kind: BodyKind) -> BodyHandle {
        self.create_body(
            BodyDesc::new(kind).with_position(x as f32, y as f32),
            ColliderDesc::new(ColliderShape::circle(radius as f32)),
        )
    }

    /// Create a circular sensor (no physical response)
    pub fn create_circle_sensor(&mut self, x: i32, y: i32, radius: i32, kind: BodyKind) -> BodyHandle {
        self.create_body(
            BodyDesc::new(kind).with_position(x as f32, y as f32),
            ColliderDesc::new(ColliderShape::circle(radius as f32)).sensor(),
        )
    }

    /// Create a rectangular body centered at a pixel position
    pub fn create_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, kind: BodyKind) -> BodyHandle {
        self.create_body(
            BodyDesc::new(kind).with_position(x as f32, y as f32),
            ColliderDesc::new(ColliderShape::rectangle(width as f32, height as f32)),
        )
    }

    /// Remove a body and its collider
    pub fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true, // Remove attached colliders
        );

        if let Some(meta) = self.registry.remove(&handle) {
            self.collider_to_body.remove(&meta.collider);
        }
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.registry.contains_key(&handle)
    }

    // ==================== Listener registry ====================

    /// Route collisions of `handle` to `owner`
    pub fn set_listener(&mut self, handle: BodyHandle, owner: EntityId) -> Result<()> {
        let meta = self
            .registry
            .get_mut(&handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?;
        meta.owner = Some(owner);
        Ok(())
    }

    pub fn listener(&self, handle: BodyHandle) -> Option<EntityId> {
        self.registry.get(&handle).and_then(|m| m.owner)
    }

    /// Change the collision category of a body
    pub fn set_category(&mut self, handle: BodyHandle, category: ColliderCategory) -> Result<()> {
        let meta = self
            .registry
            .get_mut(&handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?;
        meta.category = category;

        if let Some(collider) = self.colliders.get_mut(meta.collider) {
            collider.user_data = category.to_user_data();
            let mut hooks = collider.active_hooks();
            hooks.set(
                rapier::ActiveHooks::MODIFY_SOLVER_CONTACTS,
                category == ColliderCategory::PlatformOneWay,
            );
            collider.set_active_hooks(hooks);
        }
        Ok(())
    }

    pub fn category(&self, handle: BodyHandle) -> Result<ColliderCategory> {
        self.registry
            .get(&handle)
            .map(|m| m.category)
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    pub fn body_kind(&self, handle: BodyHandle) -> Result<BodyKind> {
        self.body(handle).map(|b| b.body_type().into())
    }

    pub fn gravity_scale(&self, handle: BodyHandle) -> Result<f32> {
        self.body(handle).map(|b| b.gravity_scale())
    }

    // ==================== Simulation ====================

    /// Step the simulation with fixed timestep, delivering collisions to
    /// `listener` as each substep completes
    pub fn step(&mut self, delta_seconds: f32, listener: &mut dyn CollisionListener) {
        self.accumulated_time += delta_seconds;

        let mut steps = 0;
        while self.accumulated_time >= self.config.timestep && steps < self.config.max_substeps {
            self.step_internal(listener);
            self.accumulated_time -= self.config.timestep;
            steps += 1;
        }

        // Drop backlog the substep cap could not absorb
        if steps == self.config.max_substeps && self.accumulated_time >= self.config.timestep {
            log::debug!(
                "Physics fell behind by {:.3}s, discarding",
                self.accumulated_time
            );
            self.accumulated_time = 0.0;
        }
    }

    fn step_internal(&mut self, listener: &mut dyn CollisionListener) {
        let (collision_send, collision_recv) = crossbeam_channel::unbounded();
        let event_handler = ChannelEventCollector {
            collision_events: collision_send,
        };

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &OneWayPlatformHook,
            &event_handler,
        );

        let events: Vec<rapier::CollisionEvent> = collision_recv.try_iter().collect();
        for event in events {
            self.dispatch(event, listener);
        }
    }

    /// Route one rapier event to the listeners of both bodies
    fn dispatch(&mut self, event: rapier::CollisionEvent, listener: &mut dyn CollisionListener) {
        let (c1, c2, kind) = match event {
            rapier::CollisionEvent::Started(c1, c2, _) => (c1, c2, ContactKind::Begin),
            rapier::CollisionEvent::Stopped(c1, c2, _) => (c1, c2, ContactKind::End),
        };

        let (Some(&b1), Some(&b2)) = (self.collider_to_body.get(&c1), self.collider_to_body.get(&c2)) else {
            log::trace!("Dropping collision event for unregistered collider");
            return;
        };
        let (Some(&m1), Some(&m2)) = (self.registry.get(&b1), self.registry.get(&b2)) else {
            return;
        };

        let is_sensor = [c1, c2]
            .iter()
            .any(|&c| self.colliders.get(c).map(|c| c.is_sensor()).unwrap_or(false));

        for (body, meta, other, other_meta) in [(b1, m1, b2, m2), (b2, m2, b1, m1)] {
            let Some(owner) = meta.owner else {
                continue;
            };
            let contact = Contact {
                kind,
                body,
                category: meta.category,
                owner,
                other,
                other_category: other_meta.category,
                other_owner: other_meta.owner,
                is_sensor,
            };
            match kind {
                ContactKind::Begin => listener.on_collision_begin(self, &contact),
                ContactKind::End => listener.on_collision_end(self, &contact),
            }
        }
    }

    // ==================== Debug ====================

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    fn body(&self, handle: BodyHandle) -> Result<&rapier::RigidBody> {
        self.bodies.get(handle.0).ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut rapier::RigidBody> {
        self.bodies.get_mut(handle.0).ok_or(PhysicsError::BodyNotFound(handle))
    }
}

impl BodyControl for PhysicsWorld {
    fn linear_velocity(&self, body: BodyHandle) -> Result<Vec2> {
        let vel = self.body(body)?.linvel();
        Ok(Vec2::new(vel.x, vel.y))
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) -> Result<()> {
        self.body_mut(body)?
            .set_linvel(rapier::Vector::new(velocity.x, velocity.y), true);
        Ok(())
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2, wake_up: bool) -> Result<()> {
        self.body_mut(body)?
            .apply_impulse(rapier::Vector::new(impulse.x, impulse.y), wake_up);
        Ok(())
    }

    fn position(&self, body: BodyHandle) -> Result<(i32, i32)> {
        let pos = *self.body(body)?.translation();
        Ok((
            self.config.meters_to_pixels(pos.x),
            self.config.meters_to_pixels(pos.y),
        ))
    }

    fn set_position(&mut self, body: BodyHandle, x: i32, y: i32) -> Result<()> {
        let translation = rapier::Vector::new(
            self.config.pixels_to_meters(x as f32),
            self.config.pixels_to_meters(y as f32),
        );
        self.body_mut(body)?.set_translation(translation, true);
        Ok(())
    }

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) -> Result<()> {
        let b = self.body_mut(body)?;
        if b.gravity_scale() != scale {
            b.set_gravity_scale(scale, true);
        }
        Ok(())
    }

    fn set_body_kind(&mut self, body: BodyHandle, kind: BodyKind) -> Result<()> {
        let b = self.body_mut(body)?;
        let target: rapier::RigidBodyType = kind.into();
        if b.body_type() != target {
            b.set_body_type(target, true);
        }
        Ok(())
    }
}

/// Channel-based event collector for Rapier
struct ChannelEventCollector {
    collision_events: crossbeam_channel::Sender<rapier::CollisionEvent>,
}

impl rapier::EventHandler for ChannelEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        event: rapier::CollisionEvent,
        _contact_pair: Option<&rapier::ContactPair>,
    ) {
        let _ = self.collision_events.send(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        _contact_pair: &rapier::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCollector;
    use approx::assert_relative_eq;
    use ledge_core::{EntityTag, HandleAllocator};

    #[test]
    fn test_create_world() {
        let world = PhysicsWorld::new(PhysicsConfig::default());
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_create_and_remove_body() {
        let mut world = PhysicsWorld::default();
        let body = world.create_circle(100, 500, 16, BodyKind::Dynamic);

        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);
        assert_eq!(world.position(body).unwrap(), (100, 500));
        assert_eq!(world.category(body).unwrap(), ColliderCategory::Unknown);

        world.remove_body(body);
        assert_eq!(world.body_count(), 0);
        assert!(!world.contains(body));
        assert!(matches!(
            world.position(body),
            Err(PhysicsError::BodyNotFound(_))
        ));
    }

    #[test]
    fn test_gravity_fall() {
        let mut world = PhysicsWorld::default();
        let body = world.create_circle(100, 100, 16, BodyKind::Dynamic);
        let initial_y = world.position(body).unwrap().1;

        for _ in 0..60 {
            world.step(1.0 / 60.0, &mut ());
        }

        let final_y = world.position(body).unwrap().1;
        assert!(final_y > initial_y, "Body should fall toward +Y");
    }

    #[test]
    fn test_zero_gravity_scale_hovers() {
        let mut world = PhysicsWorld::default();
        let body = world.create_circle(100, 100, 16, BodyKind::Dynamic);
        world.set_gravity_scale(body, 0.0).unwrap();
        assert_relative_eq!(world.gravity_scale(body).unwrap(), 0.0);

        for _ in 0..30 {
            world.step(1.0 / 60.0, &mut ());
        }
        assert_eq!(world.position(body).unwrap(), (100, 100));
    }

    #[test]
    fn test_velocity_and_kind() {
        let mut world = PhysicsWorld::default();
        let body = world.create_circle(0, 0, 16, BodyKind::Dynamic);

        world.set_linear_velocity(body, Vec2::new(4.0, -2.5)).unwrap();
        let vel = world.linear_velocity(body).unwrap();
        assert_relative_eq!(vel.x, 4.0);
        assert_relative_eq!(world.y_velocity(body).unwrap(), -2.5);

        world.set_body_kind(body, BodyKind::Kinematic).unwrap();
        assert_eq!(world.body_kind(body).unwrap(), BodyKind::Kinematic);
    }

    #[test]
    fn test_set_position_roundtrip() {
        let mut world = PhysicsWorld::default();
        let body = world.create_circle(10, 10, 8, BodyKind::Dynamic);
        world.set_position(body, 96, 96).unwrap();
        assert_eq!(world.position(body).unwrap(), (96, 96));
    }

    #[test]
    fn test_collision_routed_to_both_listeners() {
        let mut ids: HandleAllocator<EntityTag> = HandleAllocator::new();
        let ball_id = ids.allocate();
        let ground_id = ids.allocate();

        let mut world = PhysicsWorld::default();
        let ball = world.create_circle(100, 100, 16, BodyKind::Dynamic);
        world.set_category(ball, ColliderCategory::Player).unwrap();
        world.set_listener(ball, ball_id).unwrap();

        let ground = world.create_rectangle(100, 200, 400, 20, BodyKind::Static);
        world.set_category(ground, ColliderCategory::Platform).unwrap();
        world.set_listener(ground, ground_id).unwrap();

        let mut collector = EventCollector::new();
        for _ in 0..120 {
            world.step(1.0 / 60.0, &mut collector);
        }

        let ball_hit = collector
            .for_owner(ball_id)
            .find(|c| c.is_begin())
            .expect("ball should touch the ground");
        assert_eq!(ball_hit.other, ground);
        assert_eq!(ball_hit.other_category, ColliderCategory::Platform);
        assert_eq!(ball_hit.other_owner, Some(ground_id));

        let ground_hit = collector
            .for_owner(ground_id)
            .find(|c| c.is_begin())
            .expect("ground should hear about the ball");
        assert_eq!(ground_hit.other_category, ColliderCategory::Player);
    }

    #[test]
    fn test_unowned_bodies_receive_nothing() {
        let mut world = PhysicsWorld::default();
        world.create_circle(100, 100, 16, BodyKind::Dynamic);
        world.create_rectangle(100, 200, 400, 20, BodyKind::Static);

        let mut collector = EventCollector::new();
        for _ in 0..120 {
            world.step(1.0 / 60.0, &mut collector);
        }
        assert!(collector.contacts.is_empty());
    }

    #[test]
    fn test_one_way_platform_passes_from_below() {
        let mut world = PhysicsWorld::default();
        let ball = world.create_circle(100, 300, 8, BodyKind::Dynamic);
        world.set_gravity_scale(ball, 0.0).unwrap();
        world.set_linear_velocity(ball, Vec2::new(0.0, -6.0)).unwrap();

        let platform = world.create_rectangle(100, 250, 200, 10, BodyKind::Static);
        world.set_category(platform, ColliderCategory::PlatformOneWay).unwrap();

        for _ in 0..60 {
            world.step(1.0 / 60.0, &mut ());
        }
        assert!(
            world.position(ball).unwrap().1 < 240,
            "ball moving up should pass through a one-way platform"
        );
    }
}
