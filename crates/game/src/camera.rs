//! Chase camera that trails the spacecraft.

use engine_core::{Transform, Vec3};

/// Camera offset in the spacecraft's local frame: above and behind (forward is -Z).
pub const CHASE_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 10.0);

/// Fraction of the remaining distance covered each frame.
pub const DEFAULT_SMOOTHING: f32 = 0.1;

/// Distance of the aiming reticle ahead of the nose.
pub const CROSSHAIR_DISTANCE: f32 = 20.0;

/// Where the camera starts before the first update.
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 5.0, 15.0);

#[derive(Debug, Clone)]
pub struct ChaseCamera {
    pub transform: Transform,
    pub offset: Vec3,
    /// Lerp factor in (0, 1]; 1 snaps to the target.
    pub smoothing: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self::new(CAMERA_START)
    }
}

impl ChaseCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            offset: CHASE_OFFSET,
            smoothing: DEFAULT_SMOOTHING,
        }
    }

    /// Desired camera position: the local offset carried through the body's
    /// full world matrix, so roll and pitch move the camera too.
    pub fn target_position(&self, body: &Transform) -> Vec3 {
        body.transform_point(self.offset)
    }

    /// Ease toward the target and re-aim at the body. Skips when there is no body.
    pub fn update(&mut self, body: Option<&Transform>) {
        let Some(body) = body else {
            return;
        };

        let target = self.target_position(body);
        self.transform.position = self.transform.position.lerp(target, self.smoothing);

        // World up unless the body sits straight above or below us.
        let to_body = body.position - self.transform.position;
        let up = if to_body.normalize_or_zero().cross(Vec3::Y).length_squared() > 1e-6 {
            Vec3::Y
        } else {
            body.up()
        };
        self.transform.look_at(body.position, up);
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    pub fn up(&self) -> Vec3 {
        self.transform.up()
    }
}

/// Point `distance` units straight ahead of the body (crosshair placement).
pub fn aim_point(body: &Transform, distance: f32) -> Vec3 {
    body.position + body.forward() * distance
}
