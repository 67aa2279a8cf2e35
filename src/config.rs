use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_BUFFER_SIZE: usize = 4096;
pub const DEFAULT_BAR_COUNT: usize = 50;
pub const DEFAULT_FPS: u32 = 60;

pub const MIN_FREQ: f32 = 20.0;
pub const MAX_FREQ: f32 = 20000.0;

/// Hand-tuned frequency points for legacy band placement.
///
/// Read verbatim, including the repeated 15360 entries near the top: the
/// resulting zero-width bands are part of the legacy look.
pub const LEGACY_FREQ_TABLE: [f32; 56] = [
    1.0, 3.0, 5.0, 10.0, 16.0, 22.0, 26.0, 31.0, 39.0, 42.0, 45.0, 55.0, 60.0,
    65.0, 70.0, 80.0, 90.0, 100.0, 120.0, 140.0, 160.0, 200.0, 240.0, 280.0,
    320.0, 400.0, 480.0, 560.0, 590.0, 640.0, 720.0, 800.0, 960.0, 1024.0,
    1120.0, 1280.0, 1600.0, 1920.0, 2240.0, 2560.0, 3200.0, 3340.0, 3590.0,
    3720.0, 3840.0, 4480.0, 5120.0, 6400.0, 7680.0, 8960.0, 10240.0, 12800.0,
    15360.0, 15360.0, 15360.0, 17800.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VisualizerMode {
    /// Hand-tuned band table with slow ramps and a black backdrop.
    Legacy,
    /// Log-spaced bands with perceptual loudness weighting.
    Modern,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Device name fragment or index as text; None picks the default input.
    pub device: Option<String>,
    pub sample_rate: u32,
    pub buffer_size: usize,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Bar animation dynamics. Legacy and modern mode run the same animator;
/// only this tuple differs between them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnimationSettings {
    pub amplitude_scale: f32,
    pub growth_rate: f32,
    pub decay_rate: f32,
    pub trigger_threshold: f32,
    pub min_height: f32,
    pub beat_boost: f32,
}

impl AnimationSettings {
    pub fn for_mode(mode: VisualizerMode) -> Self {
        match mode {
            VisualizerMode::Legacy => Self {
                amplitude_scale: 15.0,
                growth_rate: 0.01,
                decay_rate: 0.015,
                trigger_threshold: 2.5,
                min_height: 6.0,
                beat_boost: 10.0,
            },
            VisualizerMode::Modern => Self {
                amplitude_scale: 50.0,
                growth_rate: 0.2,
                decay_rate: 0.08,
                trigger_threshold: 1.0,
                min_height: 3.0,
                beat_boost: 6.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BeatSettings {
    /// Instantaneous energy must exceed the running average by this ratio.
    pub threshold: f32,
    /// Half-life of the energy running average, in milliseconds.
    pub half_life_ms: f32,
    /// Minimum spacing between flagged beats, in milliseconds.
    pub cooldown_ms: f32,
    /// Energy below this never counts as a beat.
    pub silence_floor: f32,
}

impl Default for BeatSettings {
    fn default() -> Self {
        Self {
            threshold: 1.5,
            half_life_ms: 20.0,
            cooldown_ms: 100.0,
            silence_floor: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSettings {
    pub enabled: bool,
    pub count: usize,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub mode: VisualizerMode,
    pub bar_count: usize,
    pub fps: u32,
    #[serde(default)]
    pub audio: AudioSettings,
    pub animation: AnimationSettings,
    #[serde(default)]
    pub beat: BeatSettings,
    #[serde(default)]
    pub particles: ParticleSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: VisualizerMode::Modern,
            bar_count: DEFAULT_BAR_COUNT,
            fps: DEFAULT_FPS,
            audio: AudioSettings::default(),
            animation: AnimationSettings::for_mode(VisualizerMode::Modern),
            beat: BeatSettings::default(),
            particles: ParticleSettings::default(),
        }
    }
}

impl Settings {
    /// Defaults tuned for legacy mode.
    pub fn legacy() -> Self {
        Self {
            mode: VisualizerMode::Legacy,
            animation: AnimationSettings::for_mode(VisualizerMode::Legacy),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::NonPositive { field, value })
            }
        }

        positive("bar_count", self.bar_count as f64)?;
        positive("fps", self.fps as f64)?;
        positive("sample_rate", self.audio.sample_rate as f64)?;
        if !self.audio.buffer_size.is_power_of_two() {
            return Err(ConfigError::BufferSize(self.audio.buffer_size));
        }
        positive("amplitude_scale", self.animation.amplitude_scale as f64)?;
        positive("growth_rate", self.animation.growth_rate as f64)?;
        positive("decay_rate", self.animation.decay_rate as f64)?;
        positive("trigger_threshold", self.animation.trigger_threshold as f64)?;
        if !(self.animation.min_height >= 0.0) {
            return Err(ConfigError::MinHeight(self.animation.min_height));
        }
        positive("beat.threshold", self.beat.threshold as f64)?;
        positive("beat.half_life_ms", self.beat.half_life_ms as f64)?;
        positive("beat.cooldown_ms", self.beat.cooldown_ms as f64)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Settings::default().validate().unwrap();
        Settings::legacy().validate().unwrap();
    }

    #[test]
    fn rejects_non_power_of_two_buffer() {
        let mut settings = Settings::default();
        settings.audio.buffer_size = 1000;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::BufferSize(1000))
        ));
    }

    #[test]
    fn rejects_zero_bar_count() {
        let mut settings = Settings::default();
        settings.bar_count = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn legacy_table_is_non_decreasing() {
        for pair in LEGACY_FREQ_TABLE.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn settings_round_trip_json() {
        let settings = Settings::legacy();
        let text = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&text).unwrap();
        assert_eq!(back.mode, VisualizerMode::Legacy);
        assert_eq!(back.bar_count, settings.bar_count);
    }
}
