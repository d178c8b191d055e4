//! One flight session: the single-threaded frame loop tying input, physics,
//! weapons, camera and HUD state together.

use std::time::Duration;

use audio::SoundSink;
use engine_core::{Time, Transform, Vec3};
use input::{Control, InputState};
use physics::{BoundaryPolicy, PhysicsWorld};

use crate::camera::ChaseCamera;
use crate::config::GameConfig;
use crate::flight::FlightController;
use crate::spacecraft::Spacecraft;
use crate::state::GameState;
use crate::weapons::{muzzle_transform, ProjectileId, WeaponSystem, WeaponType};

/// What the view layer needs to draw a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub position: Vec3,
    pub kind: WeaponType,
}

pub struct FlightSession {
    time: Time,
    world: PhysicsWorld,
    craft: Spacecraft,
    flight: FlightController,
    boundary: BoundaryPolicy,
    machine_gun: WeaponSystem,
    rocket: WeaponSystem,
    state: GameState,
    camera: ChaseCamera,
    input: InputState,
}

impl FlightSession {
    pub fn new(config: &GameConfig) -> Self {
        let mut time = Time::new();
        time.set_fixed_rate(config.physics_rate_hz);
        time.set_max_substeps(config.max_substeps);

        let mut world = PhysicsWorld::with_timestep(time.fixed_timestep_seconds());
        let craft = Spacecraft::spawn(&mut world, Vec3::ZERO);

        let mut camera = ChaseCamera::default();
        camera.smoothing = config.camera_smoothing;

        let mut state = GameState::new();
        state.set_health(config.starting_health);

        Self {
            time,
            world,
            craft,
            flight: FlightController::default(),
            boundary: BoundaryPolicy::new(config.boundary_half_extent),
            machine_gun: WeaponSystem::new(WeaponType::MachineGun),
            rocket: WeaponSystem::new(WeaponType::Rocket),
            state,
            camera,
            input: InputState::new(),
        }
    }

    /// Key events land here between frames.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Toggle the active weapon.
    pub fn switch_weapon(&mut self) -> WeaponType {
        let weapon = self.state.switch_weapon();
        log::debug!("Switched to {}", weapon.label());
        weapon
    }

    /// Run one display frame of `delta` wall time.
    pub fn frame(&mut self, delta: Duration, audio: &mut dyn SoundSink) {
        if self.input.is_control_pressed(Control::SwitchWeapon) {
            self.switch_weapon();
        }

        self.time.advance(delta);
        while self.time.should_fixed_update() {
            self.flight.tick(&self.input, &mut self.world, &self.craft);
            self.world.step();
            self.boundary.enforce(&mut self.world, self.craft.handle);
        }
        log::trace!("{} physics sub-steps", self.time.substeps_this_frame());

        if let Some(body) = self.craft.state(&self.world) {
            self.state.observe_body(&body);
        }
        self.state.set_fps(self.time.fps());

        // Simulation clock: frame time minus any backlog physics dropped.
        let now = self.time.simulated_elapsed();
        let dt = self.time.simulated_delta().as_secs_f32();
        // The idle weapon never fires but its rounds still fly out their lifetime.
        self.machine_gun.advance(now, dt);
        self.rocket.advance(now, dt);
        if let Some(body) = self.craft.transform(&self.world) {
            let muzzle = muzzle_transform(&body);
            let firing = self.input.is_fire_held();
            let active = match self.state.current_weapon() {
                WeaponType::MachineGun => &mut self.machine_gun,
                WeaponType::Rocket => &mut self.rocket,
            };
            active.try_spawn(now, firing, &muzzle, audio);
        }

        let body = self.craft.transform(&self.world);
        self.camera.update(body.as_ref());
        audio.update_listener(self.camera.position(), self.camera.forward(), self.camera.up());

        self.input.begin_frame();
    }

    /// End of session: forget held keys.
    pub fn end(&mut self) {
        self.input.clear();
        log::info!(
            "Session ended after {:.1}s ({} frames)",
            self.time.elapsed_seconds(),
            self.time.frame_count()
        );
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn camera(&self) -> &ChaseCamera {
        &self.camera
    }

    pub fn craft_transform(&self) -> Option<Transform> {
        self.craft.transform(&self.world)
    }

    pub fn elapsed(&self) -> Duration {
        self.time.elapsed()
    }

    pub fn weapon(&self, kind: WeaponType) -> &WeaponSystem {
        match kind {
            WeaponType::MachineGun => &self.machine_gun,
            WeaponType::Rocket => &self.rocket,
        }
    }

    /// Rounds of the active weapon, in spawn order.
    pub fn projectiles(&self) -> impl Iterator<Item = ProjectileView> + '_ {
        let weapon = self.weapon(self.state.current_weapon());
        let kind = weapon.weapon_type();
        weapon.projectiles().iter().map(move |p| ProjectileView {
            id: p.id,
            position: p.position,
            kind,
        })
    }
}
