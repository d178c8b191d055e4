//! Play-volume containment: clamp to a cube and bounce inelastically.

use engine_core::Vec3;
use rapier3d::prelude::RigidBodyHandle;

use crate::physics_world::PhysicsWorld;

/// Half extent of the default play cube.
pub const DEFAULT_BOUNDARY_HALF_EXTENT: f32 = 500.0;

/// Velocity multiplier applied on any wall hit (reverses and halves).
pub const BOUNCE_FACTOR: f32 = -0.5;

/// Corrected motion after a boundary violation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Containment {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Which of x, y, z were clamped.
    pub clamped_axes: [bool; 3],
}

/// Invisible cubic wall centred on the origin.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryPolicy {
    pub half_extent: f32,
    pub bounce_factor: f32,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY_HALF_EXTENT)
    }
}

impl BoundaryPolicy {
    pub fn new(half_extent: f32) -> Self {
        Self {
            half_extent,
            bounce_factor: BOUNCE_FACTOR,
        }
    }

    /// Compute the correction for a state, or `None` when inside the cube.
    ///
    /// Every violating axis is clamped independently; the whole velocity
    /// vector is scaled once regardless of how many axes were hit.
    pub fn contain(&self, position: Vec3, velocity: Vec3) -> Option<Containment> {
        let limit = self.half_extent;
        let mut clamped = position;
        let mut clamped_axes = [false; 3];

        for axis in 0..3 {
            let value = position[axis];
            if value.abs() > limit {
                clamped[axis] = limit.copysign(value);
                clamped_axes[axis] = true;
            }
        }

        if !clamped_axes.iter().any(|&hit| hit) {
            return None;
        }

        Some(Containment {
            position: clamped,
            velocity: velocity * self.bounce_factor,
            clamped_axes,
        })
    }

    /// Apply containment to a body in the world. Returns true on a bounce.
    pub fn enforce(&self, world: &mut PhysicsWorld, handle: RigidBodyHandle) -> bool {
        let Some(state) = world.body_state(handle) else {
            return false;
        };
        match self.contain(state.position, state.linear_velocity) {
            Some(correction) => {
                log::debug!(
                    "Boundary bounce at {:?} (axes {:?}), velocity {:?} -> {:?}",
                    state.position,
                    correction.clamped_axes,
                    state.linear_velocity,
                    correction.velocity
                );
                world.set_body_motion(handle, correction.position, correction.velocity);
                true
            }
            None => false,
        }
    }
}
