//! Real-time audio-reactive spectrum visualizer.
//!
//! Captures live audio, decomposes it into perceptually spaced frequency
//! bands, detects beats, and animates a bar graph with independently tunable
//! rise/decay dynamics. The analysis pipeline in [`dsp`] runs once per
//! rendered frame and never blocks on audio I/O.

pub mod app;
pub mod audio;
pub mod config;
pub mod dsp;
pub mod error;
pub mod ui;
