pub mod capture;
pub mod devices;

pub use capture::AudioCapture;
