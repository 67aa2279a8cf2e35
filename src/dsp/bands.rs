use crate::config::{LEGACY_FREQ_TABLE, MAX_FREQ, MIN_FREQ, VisualizerMode};
use crate::error::ConfigError;

/// Frequency ranges backing each visual bar.
///
/// Immutable after construction; rebuilt (and all bar state reset) when the
/// mode or bar count changes. Legacy mode keeps the raw table points around
/// because its aggregation samples three table frequencies per bar instead of
/// integrating the edge range.
pub struct BandSpec {
    edges: Vec<(f32, f32)>,
    legacy_points: Option<Vec<f32>>,
}

impl BandSpec {
    pub fn new(
        mode: VisualizerMode,
        bar_count: usize,
        sample_rate: u32,
    ) -> Result<Self, ConfigError> {
        if bar_count == 0 {
            return Err(ConfigError::NonPositive {
                field: "bar_count",
                value: 0.0,
            });
        }

        let (points, legacy_points) = match mode {
            VisualizerMode::Legacy => {
                // Clamped indexing: bar counts beyond the table reuse its
                // last entry.
                let point = |k: usize| LEGACY_FREQ_TABLE[k.min(LEGACY_FREQ_TABLE.len() - 1)];
                let edges: Vec<f32> = (0..=bar_count).map(point).collect();
                // Aggregation reads points i+1..=i+3 for bar i.
                let raw: Vec<f32> = (0..bar_count + 4).map(point).collect();
                (edges, Some(raw))
            }
            VisualizerMode::Modern => {
                let min_freq = MIN_FREQ;
                let max_freq = MAX_FREQ.min(sample_rate as f32 / 2.0);
                let log_min = min_freq.ln();
                let log_max = max_freq.ln();
                let points = (0..=bar_count)
                    .map(|i| {
                        let t = i as f32 / bar_count as f32;
                        (log_min + t * (log_max - log_min)).exp()
                    })
                    .collect();
                (points, None)
            }
        };

        let edges: Vec<(f32, f32)> = points.windows(2).map(|w| (w[0], w[1])).collect();
        for (index, &(lo, hi)) in edges.iter().enumerate() {
            if lo > hi {
                return Err(ConfigError::BandOrder { index, lo, hi });
            }
        }

        Ok(Self {
            edges,
            legacy_points,
        })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge(&self, index: usize) -> (f32, f32) {
        self.edges[index]
    }

    pub fn edges(&self) -> &[(f32, f32)] {
        &self.edges
    }

    /// Table frequency point `k`, present in legacy mode only.
    pub fn legacy_point(&self, k: usize) -> Option<f32> {
        self.legacy_points
            .as_ref()
            .map(|points| points[k.min(points.len() - 1)])
    }

    pub fn center(&self, index: usize) -> f32 {
        let (lo, hi) = self.edges[index];
        (lo + hi) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_spec_has_requested_length() {
        let spec = BandSpec::new(VisualizerMode::Legacy, 50, 44100).unwrap();
        assert_eq!(spec.len(), 50);
        assert_eq!(spec.edge(0), (1.0, 3.0));
    }

    #[test]
    fn legacy_preserves_table_plateau() {
        let spec = BandSpec::new(VisualizerMode::Legacy, 55, 44100).unwrap();
        // Entries 52..=54 of the hand-authored table repeat 15360 Hz.
        assert_eq!(spec.edge(52), (15360.0, 15360.0));
        assert_eq!(spec.edge(53), (15360.0, 15360.0));
    }

    #[test]
    fn modern_spec_is_log_spaced_and_monotonic() {
        let spec = BandSpec::new(VisualizerMode::Modern, 50, 44100).unwrap();
        assert_eq!(spec.len(), 50);
        assert!((spec.edge(0).0 - 20.0).abs() < 1e-3);
        assert!((spec.edge(49).1 - 20000.0).abs() < 1.0);
        for &(lo, hi) in spec.edges() {
            assert!(lo < hi);
        }
    }

    #[test]
    fn modern_spec_caps_at_nyquist() {
        let spec = BandSpec::new(VisualizerMode::Modern, 10, 16000).unwrap();
        assert!(spec.edge(9).1 <= 8000.0 + 1.0);
    }

    #[test]
    fn zero_bar_count_is_rejected() {
        assert!(BandSpec::new(VisualizerMode::Modern, 0, 44100).is_err());
    }
}
