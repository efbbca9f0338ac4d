//! Rigid body types and the body mutation API

use crate::error::Result;
use ledge_math::Vec2;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the physics world
///
/// Non-owning: the world may destroy the body, after which every operation
/// on the handle reports `PhysicsError::BodyNotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) rapier::RigidBodyHandle);

impl BodyHandle {
    /// Build a handle from its index and generation
    ///
    /// Mostly useful for `BodyControl` implementations that are not backed
    /// by a [`crate::PhysicsWorld`].
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self(rapier::RigidBodyHandle::from_raw_parts(index, generation))
    }
}

/// Type of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// Never moves, infinite mass
    Static,
    /// Fully simulated
    #[default]
    Dynamic,
    /// Moved by its velocity only; no collision response
    Kinematic,
}

impl From<BodyKind> for rapier::RigidBodyType {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Static => rapier::RigidBodyType::Fixed,
            BodyKind::Dynamic => rapier::RigidBodyType::Dynamic,
            BodyKind::Kinematic => rapier::RigidBodyType::KinematicVelocityBased,
        }
    }
}

impl From<rapier::RigidBodyType> for BodyKind {
    fn from(t: rapier::RigidBodyType) -> Self {
        match t {
            rapier::RigidBodyType::Fixed => BodyKind::Static,
            rapier::RigidBodyType::Dynamic => BodyKind::Dynamic,
            rapier::RigidBodyType::KinematicPositionBased
            | rapier::RigidBodyType::KinematicVelocityBased => BodyKind::Kinematic,
        }
    }
}

/// Description for creating a rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    pub kind: BodyKind,
    /// Initial position in pixels
    pub position: [f32; 2],
    /// Gravity scale (0 = no gravity, 1 = normal)
    pub gravity_scale: f32,
    pub linear_damping: f32,
    /// Keep the body upright
    pub lock_rotation: bool,
    pub can_sleep: bool,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position: [0.0, 0.0],
            gravity_scale: 1.0,
            linear_damping: 0.0,
            lock_rotation: true,
            can_sleep: true,
        }
    }
}

impl BodyDesc {
    pub fn new(kind: BodyKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn dynamic() -> Self {
        Self::new(BodyKind::Dynamic)
    }

    /// Set position in pixels
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Build a Rapier rigid body builder; `pixels_per_meter` converts the position
    pub(crate) fn to_rapier_builder(&self, pixels_per_meter: f32) -> rapier::RigidBodyBuilder {
        let mut builder = rapier::RigidBodyBuilder::new(self.kind.into())
            .translation(rapier::Vector::new(
                self.position[0] / pixels_per_meter,
                self.position[1] / pixels_per_meter,
            ))
            .gravity_scale(self.gravity_scale)
            .linear_damping(self.linear_damping)
            .can_sleep(self.can_sleep);

        if self.lock_rotation {
            builder = builder.lock_rotations();
        }

        builder
    }
}

/// Mutation and query API over bodies owned by a physics world
///
/// Controllers depend on this trait rather than on [`crate::PhysicsWorld`]
/// so they can be driven by any simulation that honors the contract.
/// Positions are integer pixels, velocities and impulses are in world units.
pub trait BodyControl {
    fn linear_velocity(&self, body: BodyHandle) -> Result<Vec2>;

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) -> Result<()>;

    /// Vertical component of the body's velocity
    fn y_velocity(&self, body: BodyHandle) -> Result<f32> {
        Ok(self.linear_velocity(body)?.y)
    }

    /// Apply an impulse at the center of mass
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2, wake_up: bool) -> Result<()>;

    /// Body center in pixels
    fn position(&self, body: BodyHandle) -> Result<(i32, i32)>;

    /// Teleport the body center to a pixel position
    fn set_position(&mut self, body: BodyHandle, x: i32, y: i32) -> Result<()>;

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) -> Result<()>;

    fn set_body_kind(&mut self, body: BodyHandle, kind: BodyKind) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion() {
        for kind in [BodyKind::Static, BodyKind::Dynamic, BodyKind::Kinematic] {
            let raw: rapier::RigidBodyType = kind.into();
            assert_eq!(BodyKind::from(raw), kind);
        }
    }

    #[test]
    fn test_desc_builder() {
        let desc = BodyDesc::dynamic().with_position(96.0, 96.0);
        assert_eq!(desc.kind, BodyKind::Dynamic);
        assert_eq!(desc.position, [96.0, 96.0]);
        assert_eq!(desc.gravity_scale, 1.0);
        assert!(desc.lock_rotation);
        assert_eq!(BodyDesc::new(BodyKind::Kinematic).kind, BodyKind::Kinematic);
    }
}
