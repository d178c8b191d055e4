//! Physics world management with Rapier3D.
//!
//! The world runs in vacuum: no gravity, fixed `dt`, and user forces are
//! treated as per-step impulses that are cleared after every `step()`.

use engine_core::{Quat, Transform, Vec3};
use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Default fixed sub-step (120 Hz).
pub const DEFAULT_PHYSICS_DT: f32 = 1.0 / 120.0;

/// Spacecraft hull mass in kilograms.
pub const SPACECRAFT_MASS: f32 = 500.0;

/// Spacecraft hull half extents (a 2 x 0.5 x 4 box).
pub const SPACECRAFT_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.25, 2.0);

/// Quaternion norm error tolerated before an explicit renormalize.
const ROTATION_DRIFT_EPSILON: f32 = 1e-6;

/// Frame a force vector is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceFrame {
    /// Body-local axes; rotated by the body's orientation before applying.
    Local,
    /// World axes.
    World,
}

/// Construction parameters for a dynamic body.
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub position: Vec3,
    pub rotation: Quat,
    /// Mass in kg. Must be positive.
    pub mass: f32,
    pub half_extents: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    /// Spacecraft in vacuum: momentum conserved, spin damped for controllability.
    pub fn spacecraft(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            mass: SPACECRAFT_MASS,
            half_extents: SPACECRAFT_HALF_EXTENTS,
            linear_damping: 0.0,
            angular_damping: 0.5,
        }
    }
}

/// Snapshot of a body's kinematic state after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Mass in kg, as computed from the attached colliders.
    pub mass: f32,
}

impl BodyState {
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }

    pub fn speed(&self) -> f32 {
        self.linear_velocity.length()
    }
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new zero-gravity world stepping at [`DEFAULT_PHYSICS_DT`].
    pub fn new() -> Self {
        Self::with_timestep(DEFAULT_PHYSICS_DT)
    }

    /// Create a new zero-gravity world with a custom fixed step.
    pub fn with_timestep(dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, 0.0, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Step the physics simulation by one fixed sub-step, then clear the
    /// force/torque accumulators and renormalize any drifted orientation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);

            let raw = body.rotation().into_inner();
            if (raw.norm() - 1.0).abs() > ROTATION_DRIFT_EPSILON {
                body.set_rotation(UnitQuaternion::new_normalize(raw), false);
            }
        }
    }

    /// Add a dynamic body with a cuboid hull carrying the whole mass.
    pub fn add_dynamic_body(&mut self, desc: &BodyDesc) -> RigidBodyHandle {
        let pose = Isometry3::from_parts(
            Translation3::new(desc.position.x, desc.position.y, desc.position.z),
            to_na_rotation(desc.rotation),
        );
        let rigid_body = RigidBodyBuilder::dynamic()
            .position(pose)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .can_sleep(false)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);

        let hull = ColliderBuilder::cuboid(
            desc.half_extents.x,
            desc.half_extents.y,
            desc.half_extents.z,
        )
        .mass(desc.mass)
        .build();
        self.collider_set
            .insert_with_parent(hull, handle, &mut self.rigid_body_set);

        log::debug!(
            "Added body {:?}: mass {} kg at {:?}",
            handle,
            desc.mass,
            desc.position
        );
        handle
    }

    /// Accumulate a force for the next step.
    pub fn add_force(&mut self, handle: RigidBodyHandle, force: Vec3, frame: ForceFrame) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let force = match frame {
                ForceFrame::Local => *body.rotation() * to_na(force),
                ForceFrame::World => to_na(force),
            };
            body.add_force(force, true);
        }
    }

    /// Accumulate a world-space torque for the next step.
    pub fn add_torque(&mut self, handle: RigidBodyHandle, torque: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_torque(to_na(torque), true);
        }
    }

    /// Read a body's current kinematic state.
    pub fn body_state(&self, handle: RigidBodyHandle) -> Option<BodyState> {
        self.rigid_body_set.get(handle).map(|body| BodyState {
            position: from_na(body.translation()),
            rotation: from_na_rotation(body.rotation()),
            linear_velocity: from_na(body.linvel()),
            angular_velocity: from_na(body.angvel()),
            mass: body.mass(),
        })
    }

    /// Get the transform of a rigid body.
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.body_state(handle).map(|state| state.transform())
    }

    /// Overwrite position and linear velocity (boundary corrections).
    pub fn set_body_motion(&mut self, handle: RigidBodyHandle, position: Vec3, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(to_na(position), true);
            body.set_linvel(to_na(velocity), true);
        }
    }

    /// Overwrite linear and angular velocity.
    pub fn set_body_velocity(&mut self, handle: RigidBodyHandle, linear: Vec3, angular: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(to_na(linear), true);
            body.set_angvel(to_na(angular), true);
        }
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_na(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_na_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn from_na_rotation(r: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}
