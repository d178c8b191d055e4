//! Starfire - space-combat flight simulation core, flown headless by a scripted pilot.

mod camera;
mod config;
mod flight;
mod pilot;
mod session;
mod spacecraft;
mod state;
mod weapons;

use anyhow::Result;
use audio::{AudioSystem, SilentAudio, SoundSink};
use std::time::Duration;

use camera::{aim_point, CROSSHAIR_DISTANCE};
use config::GameConfig;
use pilot::PilotScript;
use session::FlightSession;
use weapons::WeaponType;

/// Sound cues and their file names inside `sound_dir`.
const SOUND_FILES: [(&str, &str); 2] = [("machinegun", "machinegun.mp3"), ("rocket", "rocket.mp3")];

/// Open the audio device and load the fire cues. `None` when no device.
fn open_audio(config: &GameConfig) -> Option<AudioSystem> {
    let mut system = match AudioSystem::new() {
        Ok(system) => system,
        Err(e) => {
            log::warn!("Audio unavailable ({}); continuing without sound", e);
            return None;
        }
    };
    system.set_master_volume(config.master_volume);
    for (name, file) in SOUND_FILES {
        let path = config.sound_dir.join(file);
        if let Err(e) = system.load_sound(name, &path) {
            log::warn!("Could not load sound '{}' from {:?}: {}", name, path, e);
        }
    }
    Some(system)
}

/// Once-per-second flight recorder line (what the HUD would show).
fn log_hud(session: &FlightSession) {
    let state = session.state();
    let Some(body) = session.craft_transform() else {
        return;
    };
    let aim = aim_point(&body, CROSSHAIR_DISTANCE);
    let live_rounds = session.weapon(WeaponType::MachineGun).projectiles().len()
        + session.weapon(WeaponType::Rocket).projectiles().len();
    log::info!(
        "t={:>5.1}s | Health: {}% | Weapon: {} | Speed: {} m/s | Direction: {} | pos ({:.1}, {:.1}, {:.1}) | aim ({:.1}, {:.1}, {:.1}) | rounds {} | {:.0} fps",
        session.elapsed().as_secs_f32(),
        state.health(),
        state.current_weapon().label(),
        state.speed(),
        state.direction_label(),
        body.position.x,
        body.position.y,
        body.position.z,
        aim.x,
        aim.y,
        aim.z,
        live_rounds,
        state.fps(),
    );

    let velocity = state.velocity();
    let camera = session.camera().position();
    log::debug!(
        "vel ({:.2}, {:.2}, {:.2}) | camera ({:.1}, {:.1}, {:.1})",
        velocity.x,
        velocity.y,
        velocity.z,
        camera.x,
        camera.y,
        camera.z
    );
    if let Some(round) = session.projectiles().last() {
        log::debug!(
            "Newest {} round #{} at ({:.1}, {:.1}, {:.1})",
            round.kind.label(),
            round.id,
            round.position.x,
            round.position.y,
            round.position.z
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Starfire flight simulation");

    let config = GameConfig::load();
    let mut audio_system = open_audio(&config);
    let mut silent = SilentAudio;

    let mut session = FlightSession::new(&config);
    let mut pilot = PilotScript::demo();
    let frame = Duration::from_secs_f64(1.0 / config.frame_rate_hz.max(1.0));
    let mut next_report = 0.0_f32;

    while session.elapsed().as_secs_f32() < config.demo_seconds {
        pilot.apply_due(session.elapsed().as_secs_f32(), session.input_mut());

        let sink: &mut dyn SoundSink = match audio_system.as_mut() {
            Some(system) => system,
            None => &mut silent,
        };
        session.frame(frame, sink);

        if let Some(system) = audio_system.as_mut() {
            system.cleanup();
        }
        if session.elapsed().as_secs_f32() >= next_report {
            log_hud(&session);
            next_report += 1.0;
        }
    }

    if !pilot.is_finished() {
        log::debug!("Demo ended before the pilot script ran out");
    }
    session.end();
    if let Some(system) = audio_system.as_mut() {
        system.stop_all();
    }
    Ok(())
}
