use std::sync::Arc;

use apodize::hanning_iter;
use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use crate::config::{Settings, VisualizerMode};
use crate::dsp::bands::BandSpec;
use crate::error::ConfigError;

/// Windows one buffer of samples, transforms it, and aggregates the magnitude
/// spectrum into per-bar band values.
///
/// Produces raw per-tick magnitudes only; temporal smoothing is the
/// animator's job. The Hann window is required for stable readings - without
/// it band values jitter visibly from spectral leakage.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    sample_rate: u32,
    mode: VisualizerMode,
    amplitude_scale: f32,
    spec: BandSpec,
    window: Vec<f32>,
    fft_buf: Vec<Complex32>,
    scratch: Vec<Complex32>,
    magnitudes: Vec<f32>,
    /// Perceptual loudness weight per FFT bin (modern mode).
    bin_weights: Vec<f32>,
    bands: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let fft_size = settings.audio.buffer_size;
        let sample_rate = settings.audio.sample_rate;
        let spec = BandSpec::new(settings.mode, settings.bar_count, sample_rate)?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex32::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        let freq_resolution = sample_rate as f32 / fft_size as f32;
        let bin_weights = (0..fft_size / 2)
            .map(|bin| a_weight(bin as f32 * freq_resolution))
            .collect();

        Ok(Self {
            fft,
            fft_size,
            sample_rate,
            mode: settings.mode,
            amplitude_scale: settings.animation.amplitude_scale,
            spec,
            window: hanning_iter(fft_size).map(|x| x as f32).collect(),
            fft_buf: vec![Complex32::new(0.0, 0.0); fft_size],
            scratch,
            magnitudes: vec![0.0; fft_size / 2],
            bin_weights,
            bands: vec![0.0; settings.bar_count],
        })
    }

    pub fn band_spec(&self) -> &BandSpec {
        &self.spec
    }

    pub fn bar_count(&self) -> usize {
        self.spec.len()
    }

    pub fn set_amplitude_scale(&mut self, amplitude_scale: f32) {
        if amplitude_scale > 0.0 && amplitude_scale.is_finite() {
            self.amplitude_scale = amplitude_scale;
        }
    }

    /// Analyze one window of samples into per-band magnitudes.
    ///
    /// `samples` shorter than the FFT size are zero-padded, longer input is
    /// truncated. Non-finite samples clamp to silence rather than poisoning
    /// the whole spectrum.
    pub fn analyze(&mut self, samples: &[f32]) -> &[f32] {
        let mut anomalies = 0usize;
        for i in 0..self.fft_size {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            let sample = if sample.is_finite() {
                sample
            } else {
                anomalies += 1;
                0.0
            };
            self.fft_buf[i] = Complex32::new(sample * self.window[i], 0.0);
        }
        if anomalies > 0 {
            log::debug!("clamped {anomalies} non-finite samples before FFT");
        }

        self.fft
            .process_with_scratch(&mut self.fft_buf, &mut self.scratch);

        for (bin, magnitude) in self.magnitudes.iter_mut().enumerate() {
            *magnitude = self.fft_buf[bin].norm();
        }

        match self.mode {
            VisualizerMode::Legacy => self.aggregate_legacy(),
            VisualizerMode::Modern => self.aggregate_modern(),
        }
        &self.bands
    }

    /// Legacy aggregation: for bar i, a 1:2:1 weighted average
    /// of the three FFT bins nearest table points i+1..i+3, square-root
    /// compressed, then tilted upward with bar index to compensate for
    /// naturally declining high-frequency energy.
    fn aggregate_legacy(&mut self) {
        let freq_resolution = self.sample_rate as f32 / self.fft_size as f32;
        let nyquist = self.sample_rate as f32 / 2.0;
        let amp = self.amplitude_scale;
        let half_bars = self.spec.len() as f32 / 2.0;

        for i in 0..self.spec.len() {
            if self.spec.edge(i).0 >= nyquist {
                self.bands[i] = 0.0;
                continue;
            }

            let magnitude_at = |freq: f32| {
                let bin = (freq / freq_resolution) as usize;
                self.magnitudes[bin.min(self.magnitudes.len() - 1)]
            };
            let m1 = magnitude_at(self.spec.legacy_point(i + 1).unwrap_or(0.0));
            let m2 = magnitude_at(self.spec.legacy_point(i + 2).unwrap_or(0.0));
            let m3 = magnitude_at(self.spec.legacy_point(i + 3).unwrap_or(0.0));

            let val = (m1 + 2.0 * m2 + m3) / 4.0;
            let tilt = (i as f32 / half_bars) + 0.8;
            self.bands[i] = (val * amp).sqrt() * amp * tilt;
        }
    }

    /// Energy aggregation: sum of squared loudness-weighted magnitudes of
    /// every bin whose center frequency falls in [lo, hi), mapped back to the
    /// amplitude domain for the animator.
    fn aggregate_modern(&mut self) {
        let freq_resolution = self.sample_rate as f32 / self.fft_size as f32;
        let nyquist = self.sample_rate as f32 / 2.0;
        let norm = 2.0 / self.fft_size as f32;

        for i in 0..self.spec.len() {
            let (lo, hi) = self.spec.edge(i);
            if lo >= nyquist {
                self.bands[i] = 0.0;
                continue;
            }

            let lo_bin = (lo / freq_resolution).ceil() as usize;
            let mut hi_bin = (hi / freq_resolution).ceil() as usize;
            // At least one bin per band, so narrow low bands still register.
            hi_bin = hi_bin.max(lo_bin + 1);
            let lo_bin = lo_bin.min(self.magnitudes.len());
            let hi_bin = hi_bin.min(self.magnitudes.len());

            let energy: f32 = self.magnitudes[lo_bin..hi_bin]
                .iter()
                .zip(&self.bin_weights[lo_bin..hi_bin])
                .map(|(&magnitude, &weight)| {
                    let weighted = magnitude * weight;
                    weighted * weighted
                })
                .sum();

            self.bands[i] = energy.sqrt() * norm * self.amplitude_scale;
        }
    }
}

/// Simplified A-weighting curve, normalized to 1.0 at 1 kHz: attenuates bass
/// below ~200 Hz, boosts 1-4 kHz, rolls off above 10 kHz.
fn a_weight(freq: f32) -> f32 {
    (raw_a_weight(freq) / raw_a_weight(1000.0)) as f32
}

fn raw_a_weight(freq: f32) -> f64 {
    let f = freq.clamp(20.0, 20000.0) as f64;
    let f2 = f * f;
    let c1 = 20.6f64 * 20.6;
    let c2 = 107.7f64 * 107.7;
    let c3 = 737.9f64 * 737.9;
    let c4 = 12194.0f64 * 12194.0;
    (c4 * f2 * f2) / ((f2 + c1) * ((f2 + c2) * (f2 + c3)).sqrt() * (f2 + c4))
}
