//! Ambient audio side-channel.
//!
//! Two looping channels whose levels can be changed at any time, regardless
//! of what the timer is doing. A level of zero stops the channel; any
//! positive level makes sure it is playing. Playback that fails to start is
//! logged and otherwise ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::AudioConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioChannel {
    Lofi,
    WhiteNoise,
}

impl AudioChannel {
    pub const ALL: [AudioChannel; 2] = [AudioChannel::Lofi, AudioChannel::WhiteNoise];

    fn index(self) -> usize {
        match self {
            AudioChannel::Lofi => 0,
            AudioChannel::WhiteNoise => 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The platform refused to start playback without user interaction.
    #[error("playback blocked: {0}")]
    Blocked(String),
    #[error("audio source unavailable: {0}")]
    Source(String),
}

/// Something that can loop a source on a channel.
pub trait AudioBackend: Send {
    /// Start looping `source` on `channel`.
    fn play(&mut self, channel: AudioChannel, source: &str) -> Result<(), PlaybackError>;

    fn stop(&mut self, channel: AudioChannel);

    fn set_volume(&mut self, channel: AudioChannel, level: f32);
}

/// Backend that only records and logs what it would play.
#[derive(Debug, Default)]
pub struct SilentBackend {
    playing: [bool; 2],
}

impl SilentBackend {
    pub fn is_playing(&self, channel: AudioChannel) -> bool {
        self.playing[channel.index()]
    }
}

impl AudioBackend for SilentBackend {
    fn play(&mut self, channel: AudioChannel, source: &str) -> Result<(), PlaybackError> {
        tracing::info!(?channel, source, "ambient channel playing");
        self.playing[channel.index()] = true;
        Ok(())
    }

    fn stop(&mut self, channel: AudioChannel) {
        tracing::info!(?channel, "ambient channel stopped");
        self.playing[channel.index()] = false;
    }

    fn set_volume(&mut self, channel: AudioChannel, level: f32) {
        tracing::debug!(?channel, level, "ambient volume");
    }
}

/// Level and playback state of both ambient channels.
pub struct AmbientMixer<B: AudioBackend> {
    backend: B,
    sources: [String; 2],
    levels: [f32; 2],
    playing: [bool; 2],
}

impl<B: AudioBackend> AmbientMixer<B> {
    /// Both channels start silent.
    pub fn new(backend: B, config: &AudioConfig) -> Self {
        Self {
            backend,
            sources: [config.lofi_source.clone(), config.white_noise_source.clone()],
            levels: [0.0; 2],
            playing: [false; 2],
        }
    }

    pub fn level(&self, channel: AudioChannel) -> f32 {
        self.levels[channel.index()]
    }

    pub fn is_playing(&self, channel: AudioChannel) -> bool {
        self.playing[channel.index()]
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set a channel's level, clamped to `[0.0, 1.0]` (NaN counts as zero).
    ///
    /// If playback fails to start the channel stays stopped; the next
    /// positive level tries again.
    pub fn set_level(&mut self, channel: AudioChannel, level: f32) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        let i = channel.index();
        self.levels[i] = level;
        self.backend.set_volume(channel, level);

        if level > 0.0 {
            if !self.playing[i] {
                match self.backend.play(channel, &self.sources[i]) {
                    Ok(()) => self.playing[i] = true,
                    Err(e) => tracing::warn!(?channel, error = %e, "ambient playback prevented"),
                }
            }
        } else if self.playing[i] {
            self.backend.stop(channel);
            self.playing[i] = false;
        }
    }

    /// Silence both channels.
    pub fn stop_all(&mut self) {
        for channel in AudioChannel::ALL {
            self.set_level(channel, 0.0);
        }
    }
}
