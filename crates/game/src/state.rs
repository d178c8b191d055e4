//! Session state shared with the view layer: health, weapon, speed, FPS.
//!
//! Each field has one writer (the subsystem that owns it); the HUD only reads.

use glam::Vec3;
use physics::BodyState;

use crate::weapons::WeaponType;

pub const MAX_HEALTH: f32 = 100.0;

/// Velocity component (m/s) below which an axis does not count as moving.
const DIRECTION_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    health: f32,
    current_weapon: WeaponType,
    /// |velocity| rounded to one decimal.
    speed: f32,
    velocity: Vec3,
    fps: f32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            health: MAX_HEALTH,
            current_weapon: WeaponType::default(),
            speed: 0.0,
            velocity: Vec3::ZERO,
            fps: 0.0,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn current_weapon(&self) -> WeaponType {
        self.current_weapon
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn set_weapon(&mut self, weapon: WeaponType) {
        self.current_weapon = weapon;
    }

    /// Toggle between the two weapons and return the new one.
    pub fn switch_weapon(&mut self) -> WeaponType {
        self.set_weapon(self.current_weapon.toggled());
        self.current_weapon
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = (speed * 10.0).round() / 10.0;
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, MAX_HEALTH);
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    /// Copy velocity and speed from the body after the frame's sub-steps.
    pub fn observe_body(&mut self, body: &BodyState) {
        self.set_velocity(body.linear_velocity);
        self.set_speed(body.speed());
    }

    /// HUD motion text, e.g. "Forward + Left", or "Drifting" when slow.
    pub fn direction_label(&self) -> String {
        let v = self.velocity;
        let t = DIRECTION_THRESHOLD;
        let mut directions = Vec::new();

        if v.z < -t {
            directions.push("Forward");
        }
        if v.z > t {
            directions.push("Backward");
        }
        if v.x > t {
            directions.push("Right");
        }
        if v.x < -t {
            directions.push("Left");
        }
        if v.y > t {
            directions.push("Up");
        }
        if v.y < -t {
            directions.push("Down");
        }

        if directions.is_empty() {
            "Drifting".to_string()
        } else {
            directions.join(" + ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn switch_weapon_twice_restores_initial() {
        let mut state = GameState::new();
        let initial = state.current_weapon();
        state.switch_weapon();
        state.switch_weapon();
        assert_eq!(state.current_weapon(), initial);
    }

    #[test]
    fn odd_switch_count_toggles() {
        let mut state = GameState::new();
        let initial = state.current_weapon();
        for _ in 0..5 {
            state.switch_weapon();
        }
        assert_eq!(state.current_weapon(), initial.toggled());
    }

    #[test]
    fn speed_is_rounded_to_one_decimal() {
        let mut state = GameState::new();
        state.set_speed(12.345);
        assert!((state.speed() - 12.3).abs() < 1e-5);
        state.set_speed(0.06);
        assert!((state.speed() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn health_is_clamped() {
        let mut state = GameState::new();
        assert_eq!(state.health(), 100.0);
        state.set_health(140.0);
        assert_eq!(state.health(), 100.0);
        state.set_health(-3.0);
        assert_eq!(state.health(), 0.0);
    }

    #[test]
    fn observe_body_copies_velocity_and_speed() {
        let mut state = GameState::new();
        state.observe_body(&BodyState {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::new(3.0, 0.0, -4.0),
            angular_velocity: Vec3::ZERO,
            mass: 500.0,
        });
        assert_eq!(state.velocity(), Vec3::new(3.0, 0.0, -4.0));
        assert!((state.speed() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn direction_label_names_each_moving_axis() {
        let mut state = GameState::new();
        assert_eq!(state.direction_label(), "Drifting");

        state.set_velocity(Vec3::new(-2.0, 0.2, -9.0));
        assert_eq!(state.direction_label(), "Forward + Left");

        state.set_velocity(Vec3::new(1.0, -1.0, 0.6));
        assert_eq!(state.direction_label(), "Backward + Right + Down");
    }
}
