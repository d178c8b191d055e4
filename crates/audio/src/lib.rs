//! Audio system using Kira for spatial sound.
//!
//! Gameplay code only sees [`SoundSink`]: cues are fire-and-forget and a
//! failed cue never affects the simulation.

use anyhow::{anyhow, Result};
use engine_core::Vec3;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    spatial::{
        emitter::{EmitterHandle, EmitterSettings},
        listener::{ListenerHandle, ListenerSettings},
        scene::{SpatialSceneHandle, SpatialSceneSettings},
    },
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;

/// Something that can play named sound cues.
pub trait SoundSink {
    /// Play a named cue at a world position.
    fn play_cue(&mut self, name: &str, position: Vec3, volume: f64) -> Result<()>;

    /// Move the listener (usually the camera). Default: ignore.
    fn update_listener(&mut self, _position: Vec3, _forward: Vec3, _up: Vec3) {}
}

/// Sink used when no audio device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl SoundSink for SilentAudio {
    fn play_cue(&mut self, _name: &str, _position: Vec3, _volume: f64) -> Result<()> {
        Ok(())
    }
}

/// A playing sound and the emitter it is routed through.
struct ActiveSound {
    handle: StaticSoundHandle,
    _emitter: EmitterHandle,
}

/// Main audio system managing sounds and spatial audio.
pub struct AudioSystem {
    manager: AudioManager,
    spatial_scene: SpatialSceneHandle,
    listener: ListenerHandle,
    sounds: HashMap<String, StaticSoundData>,
    active_sounds: Vec<ActiveSound>,
}

impl AudioSystem {
    /// Create a new audio system. Fails when no output device is available.
    pub fn new() -> Result<Self> {
        let mut manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;

        let mut spatial_scene = manager.add_spatial_scene(SpatialSceneSettings::default())?;

        let listener = spatial_scene.add_listener(
            mint::Vector3 { x: 0.0, y: 0.0, z: 0.0 },
            mint::Quaternion { v: mint::Vector3 { x: 0.0, y: 0.0, z: 0.0 }, s: 1.0 },
            ListenerSettings::default(),
        )?;

        Ok(Self {
            manager,
            spatial_scene,
            listener,
            sounds: HashMap::new(),
            active_sounds: Vec::new(),
        })
    }

    /// Load a sound from a file.
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        let sound_data = StaticSoundData::from_file(path)?;
        self.sounds.insert(name.to_string(), sound_data);
        log::debug!("Loaded sound '{}' from {:?}", name, path);
        Ok(())
    }

    /// Play a sound at a 3D position with a volume multiplier.
    pub fn play_at_position(&mut self, name: &str, position: Vec3, volume: f64) -> Result<()> {
        let sound_data = self
            .sounds
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("sound '{}' is not loaded", name))?;

        let emitter = self.spatial_scene.add_emitter(
            mint::Vector3 { x: position.x, y: position.y, z: position.z },
            EmitterSettings::default(),
        )?;
        let settings = StaticSoundSettings::new()
            .output_destination(&emitter)
            .volume(volume);
        let handle = self.manager.play(sound_data.with_settings(settings))?;
        // The emitter is kept with the sound so it lives until playback ends.
        self.active_sounds.push(ActiveSound {
            handle,
            _emitter: emitter,
        });
        Ok(())
    }

    /// Clean up finished sounds.
    pub fn cleanup(&mut self) {
        self.active_sounds
            .retain(|sound| sound.handle.state() != kira::sound::PlaybackState::Stopped);
    }

    /// Stop all sounds.
    pub fn stop_all(&mut self) {
        for sound in &mut self.active_sounds {
            let _ = sound.handle.stop(Tween::default());
        }
        self.active_sounds.clear();
    }

    /// Set master volume (0.0 to 1.0).
    pub fn set_master_volume(&mut self, volume: f64) {
        let _ = self.manager.main_track().set_volume(volume, Tween::default());
    }
}

impl SoundSink for AudioSystem {
    fn play_cue(&mut self, name: &str, position: Vec3, volume: f64) -> Result<()> {
        self.play_at_position(name, position, volume)
    }

    fn update_listener(&mut self, position: Vec3, forward: Vec3, up: Vec3) {
        // Compute orientation quaternion from forward and up vectors
        let right = forward.cross(up).normalize_or_zero();
        if right == Vec3::ZERO {
            return;
        }
        let corrected_up = right.cross(forward).normalize();

        let rotation = glam::Mat3::from_cols(right, corrected_up, -forward);
        let quat = glam::Quat::from_mat3(&rotation);

        self.listener.set_position(
            mint::Vector3 { x: position.x, y: position.y, z: position.z },
            Tween::default(),
        );
        self.listener.set_orientation(
            mint::Quaternion {
                v: mint::Vector3 { x: quat.x, y: quat.y, z: quat.z },
                s: quat.w,
            },
            Tween::default(),
        );
    }
}

// Re-export for convenience
pub use kira;
