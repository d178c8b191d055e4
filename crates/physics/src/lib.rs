//! Physics system using Rapier3D for Starfire.

pub mod boundary;
pub mod physics_world;

pub use boundary::*;
pub use physics_world::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::RigidBodyHandle;
