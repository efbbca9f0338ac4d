//! # ledge_core - Ledge Core
//!
//! Zero-dependency primitives shared by every Ledge crate. The main export is
//! the generational [`Handle`], used to name entities without holding
//! references to them: a handle to a destroyed entity simply stops resolving.

pub mod handle;

pub use handle::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::handle::{EntityId, EntityTag, Handle, HandleAllocator, HandleMap};
}
