//! Flight controller: turns held keys into thrust and yaw torque.
//!
//! Each held translation key contributes a full `mass * g` along its local
//! axis and contributions are summed without normalizing, so diagonal
//! thrust (e.g. forward + strafe) is ~1.41x stronger than a single axis.

use engine_core::Vec3;
use input::{Control, InputState};
use physics::{ForceFrame, PhysicsWorld};

use crate::spacecraft::Spacecraft;

/// Thrust acceleration per axis, in g-equivalent m/s^2.
pub const THRUST_G: f32 = 9.8;

/// Yaw torque in N·m.
pub const YAW_TORQUE: f32 = 10.0;

/// Local-axis direction for each translation control.
const THRUST_AXES: [(Control, Vec3); 6] = [
    (Control::Forward, Vec3::NEG_Z),
    (Control::Backward, Vec3::Z),
    (Control::StrafeLeft, Vec3::NEG_X),
    (Control::StrafeRight, Vec3::X),
    (Control::Ascend, Vec3::Y),
    (Control::Descend, Vec3::NEG_Y),
];

/// Force and torque for one sub-step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThrustCommand {
    /// Body-local force in N.
    pub force: Vec3,
    /// World-space torque in N·m.
    pub torque: Vec3,
}

impl ThrustCommand {
    pub fn is_idle(&self) -> bool {
        self.force == Vec3::ZERO && self.torque == Vec3::ZERO
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlightController {
    pub thrust_g: f32,
    pub yaw_torque: f32,
}

impl Default for FlightController {
    fn default() -> Self {
        Self {
            thrust_g: THRUST_G,
            yaw_torque: YAW_TORQUE,
        }
    }
}

impl FlightController {
    /// Compute the command for the current held keys.
    pub fn thrust_command(&self, input: &InputState, mass: f32) -> ThrustCommand {
        let thrust = mass * self.thrust_g;
        let force = THRUST_AXES
            .iter()
            .filter(|(control, _)| input.is_control_held(*control))
            .fold(Vec3::ZERO, |sum, (_, axis)| sum + *axis * thrust);

        let mut yaw = 0.0;
        if input.is_control_held(Control::YawLeft) {
            yaw += self.yaw_torque;
        }
        if input.is_control_held(Control::YawRight) {
            yaw -= self.yaw_torque;
        }

        ThrustCommand {
            force,
            torque: Vec3::Y * yaw,
        }
    }

    /// Apply this sub-step's command to the spacecraft.
    pub fn tick(&self, input: &InputState, world: &mut PhysicsWorld, craft: &Spacecraft) {
        let command = self.thrust_command(input, craft.mass);
        if command.is_idle() {
            return;
        }
        world.add_force(craft.handle, command.force, ForceFrame::Local);
        world.add_torque(craft.handle, command.torque);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::KeyCode;
    use physics::SPACECRAFT_MASS;

    fn holding(keys: &[KeyCode]) -> InputState {
        let mut input = InputState::new();
        for &key in keys {
            input.press(key);
        }
        input
    }

    #[test]
    fn no_keys_is_idle() {
        let command = FlightController::default().thrust_command(&InputState::new(), 500.0);
        assert!(command.is_idle());
    }

    #[test]
    fn forward_is_one_g_along_negative_z() {
        let command =
            FlightController::default().thrust_command(&holding(&[KeyCode::KeyW]), 500.0);
        assert_eq!(command.force, Vec3::new(0.0, 0.0, -4900.0));
        assert_eq!(command.torque, Vec3::ZERO);
    }

    #[test]
    fn diagonal_thrust_is_not_normalized() {
        let command = FlightController::default()
            .thrust_command(&holding(&[KeyCode::KeyW, KeyCode::KeyA]), 500.0);
        assert_eq!(command.force, Vec3::new(-4900.0, 0.0, -4900.0));
        assert!((command.force.length() - 4900.0 * 2f32.sqrt()).abs() < 0.01);
    }

    #[test]
    fn opposing_keys_cancel() {
        let command = FlightController::default().thrust_command(
            &holding(&[KeyCode::KeyW, KeyCode::KeyS, KeyCode::ArrowLeft, KeyCode::ArrowRight]),
            500.0,
        );
        assert!(command.is_idle());
    }

    #[test]
    fn vertical_and_yaw_keys() {
        let controller = FlightController::default();
        let up = controller.thrust_command(&holding(&[KeyCode::ArrowUp]), 500.0);
        assert_eq!(up.force, Vec3::new(0.0, 4900.0, 0.0));

        let left = controller.thrust_command(&holding(&[KeyCode::ArrowLeft]), 500.0);
        assert_eq!(left.torque, Vec3::new(0.0, 10.0, 0.0));
        let right = controller.thrust_command(&holding(&[KeyCode::ArrowRight]), 500.0);
        assert_eq!(right.torque, Vec3::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn tick_accelerates_the_body_at_one_g() {
        let mut world = PhysicsWorld::new();
        let craft = Spacecraft::spawn(&mut world, Vec3::ZERO);
        let input = holding(&[KeyCode::KeyD]);
        let controller = FlightController::default();

        for _ in 0..60 {
            controller.tick(&input, &mut world, &craft);
            world.step();
        }
        let v = craft.state(&world).unwrap().linear_velocity;
        // Half a second at 9.8 m/s^2.
        assert!((v.x - 4.9).abs() < 0.05, "got {:?}", v);
        assert_eq!(craft.mass, SPACECRAFT_MASS);
    }

    #[test]
    fn releasing_keys_leaves_the_ship_drifting() {
        let mut world = PhysicsWorld::new();
        let craft = Spacecraft::spawn(&mut world, Vec3::ZERO);
        let controller = FlightController::default();
        let mut input = holding(&[KeyCode::KeyW]);

        for _ in 0..30 {
            controller.tick(&input, &mut world, &craft);
            world.step();
        }
        input.release(KeyCode::KeyW);
        let burnout = craft.state(&world).unwrap().linear_velocity;
        for _ in 0..240 {
            controller.tick(&input, &mut world, &craft);
            world.step();
        }
        let drift = craft.state(&world).unwrap().linear_velocity;
        assert!((drift - burnout).length() < 1e-4);
    }
}
