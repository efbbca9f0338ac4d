//! # ledge_math - 2D Math
//!
//! The small set of 2D primitives the platformer needs: a float vector for
//! velocities and impulses, and an axis-aligned rectangle for viewports,
//! platforms and animation frames.

pub mod bounds;
pub mod vector;

pub use bounds::*;
pub use vector::*;
