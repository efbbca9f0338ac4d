//! Collider shapes and descriptions

use crate::layers::ColliderCategory;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Collision shape, sized in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Circle { radius: f32 },
    /// Rectangle centered on the body
    Rectangle { width: f32, height: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Circle { radius: 16.0 }
    }
}

impl ColliderShape {
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::Rectangle { width, height }
    }

    fn to_rapier(self, pixels_per_meter: f32) -> rapier::SharedShape {
        match self {
            Self::Circle { radius } => rapier::SharedShape::ball(radius / pixels_per_meter),
            Self::Rectangle { width, height } => rapier::SharedShape::cuboid(
                width * 0.5 / pixels_per_meter,
                height * 0.5 / pixels_per_meter,
            ),
        }
    }
}

/// Description for creating a collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    pub category: ColliderCategory,
    /// Sensors report contacts but produce no physical response
    pub is_sensor: bool,
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
    /// Report contacts against every body kind, including static and
    /// kinematic pairs that rapier skips by default
    pub detect_all_kinds: bool,
}

impl Default for ColliderDesc {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            category: ColliderCategory::Unknown,
            is_sensor: false,
            friction: 0.0,
            restitution: 0.0,
            density: 1.0,
            detect_all_kinds: false,
        }
    }
}

impl ColliderDesc {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: ColliderCategory) -> Self {
        self.category = category;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn detecting_all_kinds(mut self) -> Self {
        self.detect_all_kinds = true;
        self
    }

    pub(crate) fn to_rapier_builder(&self, pixels_per_meter: f32) -> rapier::ColliderBuilder {
        let mut hooks = rapier::ActiveHooks::empty();
        if self.category == ColliderCategory::PlatformOneWay {
            hooks |= rapier::ActiveHooks::MODIFY_SOLVER_CONTACTS;
        }

        let collision_types = if self.detect_all_kinds {
            rapier::ActiveCollisionTypes::all()
        } else {
            rapier::ActiveCollisionTypes::default()
        };

        rapier::ColliderBuilder::new(self.shape.to_rapier(pixels_per_meter))
            .sensor(self.is_sensor)
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .user_data(self.category.to_user_data())
            .active_events(rapier::ActiveEvents::COLLISION_EVENTS)
            .active_collision_types(collision_types)
            .active_hooks(hooks)
    }
}
