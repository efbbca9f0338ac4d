//! Ledge Physics - Rapier 2D Integration
//!
//! Rigid-body simulation for the platformer. The world owns every body;
//! gameplay code holds [`BodyHandle`]s and mutates bodies through the
//! [`BodyControl`] trait.
//!
//! # Features
//!
//! - Static, dynamic and kinematic bodies with circle or rectangle colliders
//! - Collider categories that select collision response
//! - One-way platforms (solid from above only)
//! - Collision begin/end events routed to registered listeners
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 PhysicsWorld                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌───────┐ │
//! │  │ RigidBodySet│  │ ColliderSet │  │ hooks │ │
//! │  └─────────────┘  └─────────────┘  └───────┘ │
//! │  ┌──────────────────────────────────────────┐│
//! │  │ registry: BodyHandle -> {category, owner}││
//! │  └──────────────────────────────────────────┘│
//! └──────────────────────────────────────────────┘
//!                        │ step()
//!                        ▼
//!              CollisionListener (both sides)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ledge_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//! let player = physics.create_circle(100, 500, 16, BodyKind::Dynamic);
//! physics.set_category(player, ColliderCategory::Player)?;
//! physics.set_listener(player, player_id)?;
//!
//! physics.apply_impulse(player, Vec2::new(0.0, -2.5), true)?;
//! physics.step(1.0 / 60.0, &mut level);
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod events;
mod hooks;
pub mod layers;
pub mod world;

pub use body::{BodyControl, BodyDesc, BodyHandle, BodyKind};
pub use collider::{ColliderDesc, ColliderShape};
pub use config::PhysicsConfig;
pub use error::{PhysicsError, Result};
pub use events::{CollisionListener, Contact, ContactKind, EventCollector};
pub use layers::ColliderCategory;
pub use world::PhysicsWorld;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyControl, BodyDesc, BodyHandle, BodyKind};
    pub use crate::collider::{ColliderDesc, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{CollisionListener, Contact, ContactKind};
    pub use crate::layers::ColliderCategory;
    pub use crate::world::PhysicsWorld;
    pub use ledge_math::Vec2;
}
