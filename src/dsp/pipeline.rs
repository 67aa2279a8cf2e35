use ringbuf::traits::{Consumer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use crate::config::Settings;
use crate::dsp::analyzer::SpectrumAnalyzer;
use crate::dsp::animator::BarAnimator;
use crate::dsp::beat::BeatDetector;
use crate::dsp::buffer::SampleBuffer;
use crate::error::ConfigError;

/// Capture ring sized to hold a few windows of backlog between frames.
pub const RING_WINDOWS: usize = 4;

/// Immutable per-tick output handed to the renderer.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub heights: Vec<f32>,
    pub is_beat: bool,
    pub beat_intensity: f32,
    pub peak_level: f32,
    pub rms_level: f32,
}

/// Runs one full analysis pass per rendering frame.
///
/// The capture callback is the producer on the lock-free ring; this driver is
/// the only consumer, and it owns every other piece of pipeline state. A tick
/// never blocks on audio: if no new samples arrived it re-analyzes the stale
/// (or zero-padded) window and lets the animator decay naturally.
pub struct PipelineDriver {
    source: HeapCons<f32>,
    buffer: SampleBuffer,
    window: Vec<f32>,
    drain: Vec<f32>,
    analyzer: SpectrumAnalyzer,
    beat: BeatDetector,
    animator: BarAnimator,
    fed_last_tick: bool,
}

impl PipelineDriver {
    pub fn new(settings: &Settings, source: HeapCons<f32>) -> Result<Self, ConfigError> {
        settings.validate()?;
        let buffer_size = settings.audio.buffer_size;
        Ok(Self {
            source,
            buffer: SampleBuffer::new(buffer_size),
            window: vec![0.0; buffer_size],
            drain: vec![0.0; 1024],
            analyzer: SpectrumAnalyzer::new(settings)?,
            beat: BeatDetector::new(&settings.beat, settings.fps),
            animator: BarAnimator::new(&settings.animation, settings.bar_count),
            fed_last_tick: true,
        })
    }

    /// Build a driver together with the producer half of its capture ring.
    pub fn with_ring(settings: &Settings) -> Result<(Self, HeapProd<f32>), ConfigError> {
        let ring = HeapRb::<f32>::new(settings.audio.buffer_size * RING_WINDOWS);
        let (producer, consumer) = ring.split();
        Ok((Self::new(settings, consumer)?, producer))
    }

    /// Swap in a fresh capture ring (device change restarts the stream).
    pub fn replace_source(&mut self, source: HeapCons<f32>) {
        self.source = source;
        self.buffer.clear();
    }

    /// Rebuild band mapping and tuning from a new settings snapshot.
    ///
    /// Required on mode or bar-count changes; resets every bar to the floor
    /// and clears beat history.
    pub fn reconfigure(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.analyzer = SpectrumAnalyzer::new(settings)?;
        self.animator = BarAnimator::new(&settings.animation, settings.bar_count);
        self.beat = BeatDetector::new(&settings.beat, settings.fps);
        if settings.audio.buffer_size != self.buffer.capacity() {
            self.buffer = SampleBuffer::new(settings.audio.buffer_size);
            self.window = vec![0.0; settings.audio.buffer_size];
        }
        log::info!(
            "pipeline reconfigured: {:?} mode, {} bars",
            settings.mode,
            settings.bar_count
        );
        Ok(())
    }

    pub fn bar_count(&self) -> usize {
        self.animator.bar_count()
    }

    pub fn heights(&self) -> &[f32] {
        self.animator.heights()
    }

    /// One analysis tick: drain capture, transform, detect, animate.
    pub fn tick(&mut self) -> FrameSnapshot {
        let mut received = 0usize;
        loop {
            let n = self.source.pop_slice(&mut self.drain);
            if n == 0 {
                break;
            }
            self.buffer.push(&self.drain[..n]);
            received += n;
        }

        // Starvation is not an error; note transitions at debug level only.
        if received == 0 && self.fed_last_tick {
            log::debug!("no new samples this tick; analyzing stale window");
        }
        self.fed_last_tick = received > 0;

        self.buffer.write_latest(&mut self.window);

        let mut peak_level = 0.0f32;
        let mut square_sum = 0.0f32;
        for &sample in &self.window {
            let sample = if sample.is_finite() { sample } else { 0.0 };
            peak_level = peak_level.max(sample.abs());
            square_sum += sample * sample;
        }
        let rms_level = (square_sum / self.window.len() as f32).sqrt();

        let bands = self.analyzer.analyze(&self.window);
        let total_energy: f32 = bands.iter().filter(|b| b.is_finite()).sum();

        let is_beat = self.beat.update(total_energy);
        let heights = self.animator.step(bands, is_beat).to_vec();

        FrameSnapshot {
            heights,
            is_beat,
            beat_intensity: self.beat.intensity(),
            peak_level,
            rms_level,
        }
    }
}
