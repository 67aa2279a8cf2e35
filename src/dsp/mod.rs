pub mod analyzer;
pub mod animator;
pub mod bands;
pub mod beat;
pub mod buffer;
pub mod pipeline;

pub use analyzer::SpectrumAnalyzer;
pub use animator::BarAnimator;
pub use bands::BandSpec;
pub use beat::BeatDetector;
pub use buffer::SampleBuffer;
pub use pipeline::{FrameSnapshot, PipelineDriver};
