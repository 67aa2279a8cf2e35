pub mod bars;
pub mod menu;
pub mod particles;

pub use bars::BarView;
pub use menu::{MenuResponse, draw_settings_panel};
pub use particles::ParticleSystem;
