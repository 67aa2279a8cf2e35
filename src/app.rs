use std::path::PathBuf;

use eframe::{App, CreationContext, egui};
use ringbuf::HeapRb;
use ringbuf::traits::Split;

use crate::audio::AudioCapture;
use crate::audio::devices::{default_input_name, find_input_device, list_input_devices};
use crate::config::{AnimationSettings, Settings, VisualizerMode};
use crate::dsp::PipelineDriver;
use crate::dsp::pipeline::RING_WINDOWS;
use crate::ui::{BarView, ParticleSystem, draw_settings_panel};

pub struct VisualizerApp {
    settings: Settings,
    /// Copy edited by the settings panel; swapped in on Apply.
    pending: Settings,
    config_path: PathBuf,
    host: cpal::Host,
    devices: Vec<String>,
    selected_device: usize,
    pipeline: PipelineDriver,
    capture: Option<AudioCapture>,
    bar_view: BarView,
    particles: ParticleSystem,
    show_menu: bool,
    last_error: Option<String>,
}

impl VisualizerApp {
    pub fn new(
        _cc: &CreationContext,
        settings: Settings,
        config_path: PathBuf,
    ) -> anyhow::Result<Self> {
        settings.validate()?;

        let host = cpal::default_host();
        let devices = list_input_devices(&host);
        let selected_device = initial_device_index(&devices, &settings, &host);

        let (pipeline, producer) = PipelineDriver::with_ring(&settings)?;

        let mut app = Self {
            bar_view: BarView::new(settings.bar_count),
            particles: ParticleSystem::new(settings.particles.count),
            pending: settings.clone(),
            settings,
            config_path,
            host,
            devices,
            selected_device,
            pipeline,
            capture: None,
            show_menu: false,
            last_error: None,
        };
        app.particles.enabled = app.settings.particles.enabled;

        // A missing device shouldn't kill the UI; bars just sit at the floor.
        match find_input_device(&app.host, app.settings.audio.device.as_deref()) {
            Ok(device) => match AudioCapture::start(&device, producer) {
                Ok(capture) => {
                    app.sync_sample_rate(capture.sample_rate);
                    app.capture = Some(capture);
                }
                Err(e) => {
                    log::warn!("audio capture unavailable: {e:#}");
                    app.last_error = Some(format!("{e:#}"));
                }
            },
            Err(e) => {
                log::warn!("no usable input device: {e:#}");
                app.last_error = Some(format!("{e:#}"));
            }
        }

        Ok(app)
    }

    /// Adopt the device's native rate so band edges map to real frequencies.
    fn sync_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate != self.settings.audio.sample_rate {
            log::info!(
                "device sample rate {} Hz overrides configured {} Hz",
                sample_rate,
                self.settings.audio.sample_rate
            );
            self.settings.audio.sample_rate = sample_rate;
            self.pending.audio.sample_rate = sample_rate;
            if let Err(e) = self.pipeline.reconfigure(&self.settings) {
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn restart_capture(&mut self) {
        self.capture = None;

        let ring = HeapRb::<f32>::new(self.settings.audio.buffer_size * RING_WINDOWS);
        let (producer, consumer) = ring.split();
        self.pipeline.replace_source(consumer);

        let selector = self.devices.get(self.selected_device).cloned();
        let result = find_input_device(&self.host, selector.as_deref())
            .and_then(|device| AudioCapture::start(&device, producer));
        match result {
            Ok(capture) => {
                self.settings.audio.device = selector;
                self.pending.audio.device = self.settings.audio.device.clone();
                self.sync_sample_rate(capture.sample_rate);
                self.capture = Some(capture);
                self.last_error = None;
            }
            Err(e) => {
                log::warn!("failed to restart capture: {e:#}");
                self.last_error = Some(format!("{e:#}"));
            }
        }
    }

    fn apply_pending(&mut self) {
        if let Err(e) = self.pending.validate() {
            self.last_error = Some(e.to_string());
            return;
        }

        let device_changed =
            self.devices.get(self.selected_device) != self.settings.audio.device.as_ref();
        let buffer_changed = self.pending.audio.buffer_size != self.settings.audio.buffer_size;

        if let Err(e) = self.pipeline.reconfigure(&self.pending) {
            self.last_error = Some(e.to_string());
            return;
        }
        self.settings = self.pending.clone();
        self.bar_view.reset(self.settings.bar_count);
        self.particles.enabled = self.settings.particles.enabled;
        self.particles.set_count(self.settings.particles.count);
        self.last_error = None;

        if device_changed || buffer_changed {
            self.restart_capture();
        }
    }

    fn switch_mode(&mut self) {
        self.pending.mode = match self.settings.mode {
            VisualizerMode::Legacy => VisualizerMode::Modern,
            VisualizerMode::Modern => VisualizerMode::Legacy,
        };
        self.pending.animation = AnimationSettings::for_mode(self.pending.mode);
        self.apply_pending();
    }

    fn save_settings(&mut self) {
        match self.settings.save(&self.config_path) {
            Ok(()) => log::info!("settings saved to {}", self.config_path.display()),
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (menu, particles, mode, save, quit) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::M),
                i.key_pressed(egui::Key::P),
                i.key_pressed(egui::Key::V),
                i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::Q),
            )
        });
        if menu {
            self.show_menu = !self.show_menu;
        }
        if particles {
            self.particles.enabled = !self.particles.enabled;
            self.settings.particles.enabled = self.particles.enabled;
            self.pending.particles.enabled = self.particles.enabled;
        }
        if mode {
            self.switch_mode();
        }
        if save {
            self.save_settings();
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

fn initial_device_index(devices: &[String], settings: &Settings, host: &cpal::Host) -> usize {
    if let Some(wanted) = settings.audio.device.as_deref() {
        let wanted = wanted.to_lowercase();
        if let Some(i) = devices.iter().position(|n| n.to_lowercase().contains(&wanted)) {
            return i;
        }
    }
    if let Some(default) = default_input_name(host) {
        if let Some(i) = devices.iter().position(|n| *n == default) {
            return i;
        }
    }
    0
}

impl App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        // One analysis tick per rendered frame; never blocks on audio.
        let snapshot = self.pipeline.tick();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                if ui.button("Menu").clicked() {
                    self.show_menu = !self.show_menu;
                }
                ui.label(match self.settings.mode {
                    VisualizerMode::Legacy => "Legacy",
                    VisualizerMode::Modern => "Modern",
                });
                if ui.button("Switch Mode").clicked() {
                    self.switch_mode();
                }
                ui.separator();
                match (&self.capture, &self.last_error) {
                    (Some(capture), _) => {
                        ui.label(format!(
                            "{} @ {} Hz",
                            capture.device_name, capture.sample_rate
                        ));
                    }
                    (None, Some(error)) => {
                        ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error);
                    }
                    (None, None) => {
                        ui.label("no capture");
                    }
                }
                if snapshot.is_beat {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), "beat");
                }
            });
        });

        if self.show_menu {
            egui::SidePanel::right("settings_panel").show(ctx, |ui| {
                let response = draw_settings_panel(
                    ui,
                    &mut self.pending,
                    &self.devices,
                    &mut self.selected_device,
                );
                if let Some(error) = &self.last_error {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error);
                }
                if response.apply {
                    self.apply_pending();
                }
                if response.save {
                    self.save_settings();
                }
            });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.particles.fit(rect.size());
                self.particles.update();
                self.bar_view
                    .show(ui, &snapshot, self.settings.mode, &self.particles);
            });

        // Keep ticking at display rate even when the window is idle.
        ctx.request_repaint();
    }
}
