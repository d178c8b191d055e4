//! The player's spacecraft: a single persistent rigid body.

use engine_core::{Transform, Vec3};
use physics::{BodyDesc, BodyState, PhysicsWorld, RigidBodyHandle};

#[derive(Debug, Clone, Copy)]
pub struct Spacecraft {
    pub handle: RigidBodyHandle,
    /// Constant mass in kg.
    pub mass: f32,
}

impl Spacecraft {
    /// Spawn the hull into the world at `position`.
    pub fn spawn(world: &mut PhysicsWorld, position: Vec3) -> Self {
        let desc = BodyDesc::spacecraft(position);
        let handle = world.add_dynamic_body(&desc);
        log::info!("Spacecraft spawned at {:?} ({} kg)", position, desc.mass);
        Self {
            handle,
            mass: desc.mass,
        }
    }

    pub fn state(&self, world: &PhysicsWorld) -> Option<BodyState> {
        world.body_state(self.handle)
    }

    pub fn transform(&self, world: &PhysicsWorld) -> Option<Transform> {
        world.body_transform(self.handle)
    }
}
