use crate::config::AnimationSettings;

/// Per-band rise/decay state machine.
///
/// Each bar holds one piece of cross-tick state: its current height. Growth
/// and decay rates are tuned independently so visual attack and release can
/// be shaped separately. The same code path serves both visualizer modes;
/// only the parameter tuple changes.
pub struct BarAnimator {
    heights: Vec<f32>,
    growth_rate: f32,
    decay_rate: f32,
    trigger_threshold: f32,
    min_height: f32,
    beat_boost: f32,
}

impl BarAnimator {
    pub fn new(settings: &AnimationSettings, bar_count: usize) -> Self {
        Self {
            heights: vec![settings.min_height; bar_count],
            growth_rate: settings.growth_rate,
            decay_rate: settings.decay_rate,
            trigger_threshold: settings.trigger_threshold,
            min_height: settings.min_height,
            beat_boost: settings.beat_boost,
        }
    }

    /// Advance every bar one tick toward its raw magnitude.
    ///
    /// Magnitudes that are NaN, infinite, or negative clamp to zero; they are
    /// transient input anomalies, never errors.
    pub fn step(&mut self, magnitudes: &[f32], is_beat: bool) -> &[f32] {
        for (i, height) in self.heights.iter_mut().enumerate() {
            let raw = magnitudes.get(i).copied().unwrap_or(0.0);
            let raw = if raw.is_finite() && raw > 0.0 { raw } else { 0.0 };

            if raw > *height + self.trigger_threshold {
                // Attack: exponential approach toward the target, with an
                // extra kick on beats.
                *height += self.growth_rate * (raw - *height);
                if is_beat {
                    *height += self.beat_boost;
                }
            } else {
                // Release: exponential decay toward silence.
                *height -= self.decay_rate * *height;
            }

            if *height < self.min_height {
                *height = self.min_height;
            }
        }
        &self.heights
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn bar_count(&self) -> usize {
        self.heights.len()
    }

    /// Drop every bar back to the floor (mode switch / band-count change).
    pub fn reset(&mut self) {
        self.heights.fill(self.min_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn animator(bar_count: usize) -> BarAnimator {
        BarAnimator::new(
            &AnimationSettings {
                amplitude_scale: 15.0,
                growth_rate: 0.1,
                decay_rate: 0.05,
                trigger_threshold: 2.0,
                min_height: 4.0,
                beat_boost: 10.0,
            },
            bar_count,
        )
    }

    #[test]
    fn starts_at_min_height() {
        let animator = animator(8);
        assert!(animator.heights().iter().all(|&h| h == 4.0));
    }

    #[test]
    fn never_drops_below_min_height() {
        let mut animator = animator(4);
        for magnitudes in [[100.0; 4], [0.0; 4], [f32::NAN; 4], [-5.0; 4]] {
            for _ in 0..50 {
                animator.step(&magnitudes, false);
                assert!(animator.heights().iter().all(|&h| h >= 4.0));
            }
        }
    }

    #[test]
    fn zero_input_decays_strictly_until_clamped() {
        let mut animator = animator(1);
        for _ in 0..20 {
            animator.step(&[200.0], false);
        }
        let mut prev = animator.heights()[0];
        assert!(prev > 4.0);

        let mut clamped = false;
        for _ in 0..500 {
            let h = animator.step(&[0.0], false)[0];
            if clamped {
                assert_relative_eq!(h, 4.0);
            } else if h == 4.0 {
                clamped = true;
            } else {
                assert!(h < prev, "decay must be strict above the floor");
            }
            prev = h;
        }
        assert!(clamped, "bar never reached the floor");
    }

    #[test]
    fn sub_threshold_rise_follows_pure_decay() {
        let mut grown = animator(1);
        let mut decayed = animator(1);
        for _ in 0..20 {
            grown.step(&[200.0], false);
            decayed.step(&[200.0], false);
        }
        let h = grown.heights()[0];

        // A target only 1.9 above current is below the 2.0 trigger.
        let sub_threshold = grown.step(&[h + 1.9], false)[0];
        let pure_decay = decayed.step(&[0.0], false)[0];
        assert_relative_eq!(sub_threshold, pure_decay);
    }

    #[test]
    fn growth_approaches_target_exponentially() {
        let mut animator = animator(1);
        let before = animator.heights()[0];
        let after = animator.step(&[100.0], false)[0];
        assert_relative_eq!(after, before + 0.1 * (100.0 - before));
    }

    #[test]
    fn beat_boost_only_applies_on_growth() {
        let mut animator = animator(2);
        // Bar 0 gets a strong target, bar 1 stays silent.
        let heights = animator.step(&[100.0, 0.0], true);
        let expected_grown = 4.0 + 0.1 * (100.0 - 4.0) + 10.0;
        assert_relative_eq!(heights[0], expected_grown);
        assert_relative_eq!(heights[1], 4.0);
    }

    #[test]
    fn missing_magnitudes_read_as_zero() {
        let mut animator = animator(3);
        let heights = animator.step(&[50.0], false);
        assert!(heights[0] > 4.0);
        assert_relative_eq!(heights[1], 4.0);
        assert_relative_eq!(heights[2], 4.0);
    }

    #[test]
    fn reset_returns_to_floor() {
        let mut animator = animator(4);
        for _ in 0..10 {
            animator.step(&[100.0; 4], true);
        }
        animator.reset();
        assert!(animator.heights().iter().all(|&h| h == 4.0));
    }
}
