use crate::config::BeatSettings;

/// Onset detection over the per-tick total band energy.
///
/// Keeps an exponentially-decaying running average with a short half-life and
/// flags a beat when the instantaneous energy jumps past the average by a
/// configurable ratio. A cooldown window enforces minimum inter-beat spacing
/// so sustained loud passages don't fire continuously.
pub struct BeatDetector {
    average: f32,
    primed: bool,
    /// Per-tick retention factor derived from the configured half-life.
    alpha: f32,
    threshold: f32,
    silence_floor: f32,
    cooldown_ticks: u32,
    cooldown: u32,
    intensity: f32,
}

impl BeatDetector {
    pub fn new(settings: &BeatSettings, fps: u32) -> Self {
        let fps = fps.max(1) as f32;
        let half_life_ticks = (settings.half_life_ms / 1000.0 * fps).max(1.0);
        let cooldown_ticks = (settings.cooldown_ms / 1000.0 * fps).round().max(1.0) as u32;

        Self {
            average: 0.0,
            primed: false,
            alpha: 0.5f32.powf(1.0 / half_life_ticks),
            threshold: settings.threshold,
            silence_floor: settings.silence_floor,
            cooldown_ticks,
            cooldown: 0,
            intensity: 0.0,
        }
    }

    /// Feed one tick's total energy; returns whether this tick is a beat.
    pub fn update(&mut self, energy: f32) -> bool {
        let energy = if energy.is_finite() && energy > 0.0 {
            energy
        } else {
            0.0
        };

        if self.primed {
            self.average = self.alpha * self.average + (1.0 - self.alpha) * energy;
        } else {
            self.average = energy;
            self.primed = true;
        }

        self.intensity = if self.average > 1e-6 {
            (energy / self.average).min(5.0)
        } else {
            0.0
        };

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return false;
        }

        let beat = energy > self.average * self.threshold && energy > self.silence_floor;
        if beat {
            self.cooldown = self.cooldown_ticks;
        }
        beat
    }

    /// Ratio of the last energy to the running average, capped at 5.0.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn reset(&mut self) {
        self.average = 0.0;
        self.primed = false;
        self.cooldown = 0;
        self.intensity = 0.0;
    }
}
