use thiserror::Error;

/// Construction-time configuration failures.
///
/// These are the only hard errors the pipeline surfaces; once a pipeline is
/// built, bad input data is clamped locally and never propagated.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("band edges must be non-decreasing (band {index}: {lo} Hz > {hi} Hz)")]
    BandOrder { index: usize, lo: f32, hi: f32 },

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("buffer size must be a power of two (got {0})")]
    BufferSize(usize),

    #[error("minimum bar height must be >= 0 (got {0})")]
    MinHeight(f32),

    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
