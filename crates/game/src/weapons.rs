//! Weapon system: cooldown-gated projectile spawning and straight-line rounds.

use std::time::Duration;

use audio::SoundSink;
use engine_core::{Transform, Vec3};

/// Weapon mount in the spacecraft's local frame (under the nose).
pub const MUZZLE_OFFSET: Vec3 = Vec3::new(0.0, -0.2, -2.0);

/// Weapon types available to the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WeaponType {
    /// Rapid-fire cannon: auto-repeats while the trigger is held.
    #[default]
    MachineGun,
    /// Burst launcher: one slow rocket per second.
    Rocket,
}

/// Fixed tuning for a weapon type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    /// Minimum time between two spawns.
    pub cooldown: Duration,
    /// Muzzle speed in units per second.
    pub speed: f32,
    /// Age at which a round is removed.
    pub time_to_live: Duration,
    /// Sound cue played on fire.
    pub cue: &'static str,
    pub cue_volume: f64,
}

impl WeaponType {
    pub fn spec(self) -> WeaponSpec {
        match self {
            WeaponType::MachineGun => WeaponSpec {
                cooldown: Duration::from_millis(100),
                speed: 100.0,
                time_to_live: Duration::from_secs(2),
                cue: "machinegun",
                cue_volume: 0.3,
            },
            WeaponType::Rocket => WeaponSpec {
                cooldown: Duration::from_millis(1000),
                speed: 50.0,
                time_to_live: Duration::from_secs(5),
                cue: "rocket",
                cue_volume: 0.4,
            },
        }
    }

    /// The other weapon.
    pub fn toggled(self) -> Self {
        match self {
            WeaponType::MachineGun => WeaponType::Rocket,
            WeaponType::Rocket => WeaponType::MachineGun,
        }
    }

    /// HUD name.
    pub fn label(self) -> &'static str {
        match self {
            WeaponType::MachineGun => "Machine Gun",
            WeaponType::Rocket => "Rockets",
        }
    }
}

pub type ProjectileId = u64;

/// A round in flight. Velocity never changes after spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub spawn_time: Duration,
}

impl Projectile {
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawn_time)
    }
}

/// World-space muzzle pose for a spacecraft transform.
pub fn muzzle_transform(body: &Transform) -> Transform {
    Transform::from_position_rotation(body.transform_point(MUZZLE_OFFSET), body.rotation)
}

/// One weapon instance and the rounds it owns.
#[derive(Debug, Clone)]
pub struct WeaponSystem {
    weapon_type: WeaponType,
    spec: WeaponSpec,
    last_fired: Option<Duration>,
    /// Spawn order.
    projectiles: Vec<Projectile>,
    next_id: ProjectileId,
}

impl WeaponSystem {
    pub fn new(weapon_type: WeaponType) -> Self {
        Self {
            weapon_type,
            spec: weapon_type.spec(),
            last_fired: None,
            projectiles: Vec::new(),
            next_id: 0,
        }
    }

    pub fn weapon_type(&self) -> WeaponType {
        self.weapon_type
    }

    /// Live rounds in spawn order.
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Check if the cooldown has elapsed at `now`.
    pub fn can_fire(&self, now: Duration) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.spec.cooldown,
        }
    }

    /// Spawn a round if the trigger is held and the cooldown has elapsed.
    ///
    /// The fire cue is best-effort; a sink error is logged and dropped.
    pub fn try_spawn(
        &mut self,
        now: Duration,
        firing: bool,
        muzzle: &Transform,
        audio: &mut dyn SoundSink,
    ) -> Option<ProjectileId> {
        if !firing || !self.can_fire(now) {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.projectiles.push(Projectile {
            id,
            position: muzzle.position,
            velocity: muzzle.forward() * self.spec.speed,
            spawn_time: now,
        });
        self.last_fired = Some(now);
        log::debug!(
            "{} fired round {} at {:.3}s",
            self.weapon_type.label(),
            id,
            now.as_secs_f32()
        );

        if let Err(e) = audio.play_cue(self.spec.cue, muzzle.position, self.spec.cue_volume) {
            log::debug!("Fire cue '{}' failed: {}", self.spec.cue, e);
        }

        Some(id)
    }

    /// Move every round by `velocity * dt`, then drop rounds whose age
    /// reached the time-to-live.
    pub fn advance(&mut self, now: Duration, dt: f32) {
        for projectile in &mut self.projectiles {
            projectile.position += projectile.velocity * dt;
        }
        let ttl = self.spec.time_to_live;
        self.projectiles.retain(|p| p.age(now) < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use audio::SilentAudio;

    #[derive(Default)]
    struct RecordingAudio {
        cues: Vec<(String, f64)>,
    }

    impl SoundSink for RecordingAudio {
        fn play_cue(&mut self, name: &str, _position: Vec3, volume: f64) -> Result<()> {
            self.cues.push((name.to_string(), volume));
            Ok(())
        }
    }

    struct BusyAudio;

    impl SoundSink for BusyAudio {
        fn play_cue(&mut self, _name: &str, _position: Vec3, _volume: f64) -> Result<()> {
            Err(anyhow!("device busy"))
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn hold_trigger(weapon: &mut WeaponSystem, until_ms: u64) -> Vec<Duration> {
        let muzzle = Transform::default();
        let mut spawns = Vec::new();
        for t in 0..until_ms {
            if weapon
                .try_spawn(ms(t), true, &muzzle, &mut SilentAudio)
                .is_some()
            {
                spawns.push(ms(t));
            }
        }
        spawns
    }

    #[test]
    fn rapid_fire_spawns_once_per_cooldown_window() {
        let mut gun = WeaponSystem::new(WeaponType::MachineGun);
        let spawns = hold_trigger(&mut gun, 1000);
        let expected: Vec<_> = (0..10).map(|i| ms(i * 100)).collect();
        assert_eq!(spawns, expected);
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let mut gun = WeaponSystem::new(WeaponType::MachineGun);
        let spawns = hold_trigger(&mut gun, 1050);
        // Exactly 100 ms after the previous shot is already allowed.
        assert_eq!(spawns.len(), 11);
        assert_eq!(spawns.last(), Some(&ms(1000)));
        assert!(!gun.can_fire(ms(1099)));
        assert!(gun.can_fire(ms(1100)));
    }

    #[test]
    fn rocket_fires_once_per_second_while_held() {
        let mut launcher = WeaponSystem::new(WeaponType::Rocket);
        let spawns = hold_trigger(&mut launcher, 2500);
        assert_eq!(spawns, vec![ms(0), ms(1000), ms(2000)]);
    }

    #[test]
    fn released_trigger_never_spawns() {
        let mut gun = WeaponSystem::new(WeaponType::MachineGun);
        let muzzle = Transform::default();
        assert!(gun.try_spawn(ms(0), false, &muzzle, &mut SilentAudio).is_none());
        assert!(gun.projectiles().is_empty());
        // An unfired gun is never cooling down.
        assert!(gun.can_fire(ms(1)));
    }

    #[test]
    fn round_is_culled_once_its_age_reaches_ttl() {
        let mut gun = WeaponSystem::new(WeaponType::MachineGun);
        gun.try_spawn(ms(0), true, &Transform::default(), &mut SilentAudio);

        gun.advance(ms(1999), 0.0);
        assert_eq!(gun.projectiles().len(), 1);
        gun.advance(ms(2001), 0.0);
        assert!(gun.projectiles().is_empty());
    }

    #[test]
    fn rounds_fly_straight_along_muzzle_forward() {
        let mut launcher = WeaponSystem::new(WeaponType::Rocket);
        let muzzle = Transform::from_position_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            glam::Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        launcher.try_spawn(ms(0), true, &muzzle, &mut SilentAudio);

        for step in 1..=10 {
            launcher.advance(ms(step * 100), 0.1);
        }
        let round = &launcher.projectiles()[0];
        // 50 u/s along -X for one second.
        assert!((round.position - Vec3::new(-49.0, 2.0, 3.0)).length() < 1e-3);
        assert!((round.velocity - Vec3::new(-50.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn culling_keeps_spawn_order_of_survivors() {
        let mut gun = WeaponSystem::new(WeaponType::MachineGun);
        hold_trigger(&mut gun, 501);
        gun.advance(ms(2250), 0.0);
        let ids: Vec<_> = gun.projectiles().iter().map(|p| p.id).collect();
        // Rounds from 0 and 100 and 200 ms are gone.
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn fire_cue_uses_weapon_sound_and_volume() {
        let mut audio = RecordingAudio::default();
        let muzzle = Transform::default();
        WeaponSystem::new(WeaponType::MachineGun).try_spawn(ms(0), true, &muzzle, &mut audio);
        WeaponSystem::new(WeaponType::Rocket).try_spawn(ms(0), true, &muzzle, &mut audio);
        assert_eq!(
            audio.cues,
            vec![("machinegun".to_string(), 0.3), ("rocket".to_string(), 0.4)]
        );
    }

    #[test]
    fn audio_failure_does_not_block_spawning() {
        let mut gun = WeaponSystem::new(WeaponType::MachineGun);
        let id = gun.try_spawn(ms(0), true, &Transform::default(), &mut BusyAudio);
        assert_eq!(id, Some(0));
        assert_eq!(gun.projectiles().len(), 1);
        assert!(!gun.can_fire(ms(50)));
    }

    #[test]
    fn muzzle_sits_under_the_nose() {
        let body = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        let muzzle = muzzle_transform(&body);
        assert!((muzzle.position - Vec3::new(10.0, -0.2, -2.0)).length() < 1e-5);
        assert_eq!(muzzle.rotation, body.rotation);
    }

    #[test]
    fn toggled_is_an_involution() {
        for weapon in [WeaponType::MachineGun, WeaponType::Rocket] {
            assert_ne!(weapon.toggled(), weapon);
            assert_eq!(weapon.toggled().toggled(), weapon);
        }
    }
}
