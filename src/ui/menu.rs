use eframe::egui;

use crate::config::{AnimationSettings, Settings, VisualizerMode};

/// What the settings panel asked the app to do this frame.
#[derive(Default)]
pub struct MenuResponse {
    pub apply: bool,
    pub save: bool,
}

/// Settings side panel. Edits a pending copy of the settings; nothing takes
/// effect until the user hits Apply, which triggers a pipeline reconfigure.
pub fn draw_settings_panel(
    ui: &mut egui::Ui,
    pending: &mut Settings,
    devices: &[String],
    selected_device: &mut usize,
) -> MenuResponse {
    let mut response = MenuResponse::default();

    ui.heading("Settings");
    ui.separator();

    ui.label("Visualization");
    let previous_mode = pending.mode;
    egui::ComboBox::from_label("Mode")
        .selected_text(match pending.mode {
            VisualizerMode::Legacy => "Legacy",
            VisualizerMode::Modern => "Modern",
        })
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut pending.mode, VisualizerMode::Legacy, "Legacy");
            ui.selectable_value(&mut pending.mode, VisualizerMode::Modern, "Modern");
        });
    if pending.mode != previous_mode {
        // Each mode carries its own animation tuning.
        pending.animation = AnimationSettings::for_mode(pending.mode);
    }

    ui.add(egui::Slider::new(&mut pending.bar_count, 10..=55).text("Bars"));

    ui.separator();
    ui.label("Bar animation");
    ui.add(
        egui::Slider::new(&mut pending.animation.amplitude_scale, 1.0..=100.0)
            .text("Amplitude scale"),
    );
    ui.add(
        egui::Slider::new(&mut pending.animation.growth_rate, 0.001..=0.5)
            .logarithmic(true)
            .text("Growth rate"),
    );
    ui.add(
        egui::Slider::new(&mut pending.animation.decay_rate, 0.005..=0.5)
            .logarithmic(true)
            .text("Decay rate"),
    );
    ui.add(
        egui::Slider::new(&mut pending.animation.trigger_threshold, 0.1..=5.0)
            .text("Trigger threshold"),
    );
    ui.add(egui::Slider::new(&mut pending.animation.min_height, 0.0..=10.0).text("Minimum height"));
    ui.add(egui::Slider::new(&mut pending.animation.beat_boost, 0.0..=20.0).text("Beat boost"));

    ui.separator();
    ui.label("Beat detection");
    ui.add(egui::Slider::new(&mut pending.beat.threshold, 1.0..=3.0).text("Energy ratio"));
    ui.add(egui::Slider::new(&mut pending.beat.cooldown_ms, 50.0..=500.0).text("Cooldown (ms)"));

    ui.separator();
    ui.label("Particles");
    ui.checkbox(&mut pending.particles.enabled, "Enabled");
    ui.add(egui::Slider::new(&mut pending.particles.count, 0..=300).text("Count"));

    ui.separator();
    ui.label("Audio device");
    let selected_text = devices
        .get(*selected_device)
        .map(String::as_str)
        .unwrap_or("None");
    egui::ComboBox::from_label("Input")
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for (i, name) in devices.iter().enumerate() {
                ui.selectable_value(selected_device, i, name);
            }
        });

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            response.apply = true;
        }
        if ui.button("Save Settings").clicked() {
            response.save = true;
        }
    });

    response
}
