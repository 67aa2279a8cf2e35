use eframe::egui;

use crate::config::VisualizerMode;
use crate::dsp::FrameSnapshot;
use crate::ui::particles::ParticleSystem;

/// Animator heights are tuned against this reference; the view rescales them
/// to whatever height the panel actually has.
const REFERENCE_MAX_HEIGHT: f32 = 200.0;

const PEAK_GRAVITY: f32 = 0.5;
const HUE_STEP: f32 = 0.01;
const BEAT_PULSE_DECAY: f32 = 0.8;

pub fn lerp_color(from: egui::Color32, to: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    egui::Color32::from_rgb(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
    )
}

/// Sine-wave rainbow: three phase-shifted channels walking slowly along the
/// bar row.
fn rainbow_color(phase: f32, offset: f32) -> egui::Color32 {
    let channel = |shift: f32| (127.0 * (phase + offset + shift).sin() + 128.0).abs() as u8;
    egui::Color32::from_rgb(channel(0.0), channel(2.094), channel(4.188))
}

/// Stateful bar-graph view: falling peak markers, color cycling, and a beat
/// pulse that briefly brightens everything.
pub struct BarView {
    peaks: Vec<f32>,
    peak_velocities: Vec<f32>,
    hue_phase: f32,
    beat_pulse: f32,
}

impl BarView {
    pub fn new(bar_count: usize) -> Self {
        Self {
            peaks: vec![0.0; bar_count],
            peak_velocities: vec![0.0; bar_count],
            hue_phase: 1.0,
            beat_pulse: 0.0,
        }
    }

    /// Reset per-bar view state; call after mode or bar-count changes.
    pub fn reset(&mut self, bar_count: usize) {
        self.peaks = vec![0.0; bar_count];
        self.peak_velocities = vec![0.0; bar_count];
        self.beat_pulse = 0.0;
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        snapshot: &FrameSnapshot,
        mode: VisualizerMode,
        particles: &ParticleSystem,
    ) {
        if self.peaks.len() != snapshot.heights.len() {
            self.reset(snapshot.heights.len());
        }

        if snapshot.is_beat {
            self.beat_pulse = (self.beat_pulse + 0.5).min(1.0);
        } else {
            self.beat_pulse *= BEAT_PULSE_DECAY;
        }
        self.hue_phase -= HUE_STEP;
        if self.hue_phase < 0.0 {
            self.hue_phase += std::f32::consts::TAU;
        }

        let response = ui.allocate_rect(
            egui::Rect::from_min_size(ui.min_rect().min, ui.available_size()),
            egui::Sense::hover(),
        );
        let rect = response.rect;
        let painter = ui.painter();

        // Background
        let background = match mode {
            VisualizerMode::Legacy => egui::Color32::BLACK,
            VisualizerMode::Modern => egui::Color32::from_rgb(10, 10, 15),
        };
        painter.rect_filled(rect, 0.0, background);
        if self.beat_pulse > 0.1 {
            let alpha = (20.0 * self.beat_pulse) as u8;
            painter.rect_filled(
                rect,
                0.0,
                egui::Color32::from_rgba_unmultiplied(50, 30, 60, alpha),
            );
        }

        // Dust layer sits between the background and the bars.
        particles.draw(painter, rect);

        let bar_count = snapshot.heights.len();
        let margin = 50.0f32;
        let spacing = 2.0f32;
        let available = (rect.width() - 2.0 * margin).max(bar_count as f32);
        let bar_width = ((available - (bar_count - 1) as f32 * spacing) / bar_count as f32).max(2.0);
        let base_y = rect.top() + rect.height() * 0.8;
        let max_px = rect.height() * 0.7;
        let scale = max_px / REFERENCE_MAX_HEIGHT;

        self.update_peaks(&snapshot.heights);

        for (i, &height) in snapshot.heights.iter().enumerate() {
            let x = rect.left() + margin + i as f32 * (bar_width + spacing);
            let px = (height * scale).min(max_px);
            if px < 1.0 {
                continue;
            }

            let mut color = rainbow_color(self.hue_phase, i as f32 * 0.02);
            if self.beat_pulse > 0.1 {
                color = lerp_color(color, egui::Color32::WHITE, self.beat_pulse * 0.4);
            }

            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(x, base_y - px),
                    egui::pos2(x + bar_width, base_y),
                ),
                2.0,
                color,
            );
            // Rounded cap
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(x, base_y - px - 2.0),
                    egui::pos2(x + bar_width, base_y - px + 3.0),
                ),
                3.0,
                color,
            );

            // Falling peak marker, modern mode only
            if mode == VisualizerMode::Modern {
                let peak_px = (self.peaks[i] * scale).min(max_px);
                if peak_px > 5.0 {
                    painter.rect_filled(
                        egui::Rect::from_min_max(
                            egui::pos2(x, base_y - peak_px - 3.0),
                            egui::pos2(x + bar_width, base_y - peak_px),
                        ),
                        1.0,
                        color,
                    );
                }
            }
        }

        // Base line: thick dark line with a thin bright one on top.
        let line_left = rect.left() + margin - 10.0;
        let line_right = rect.right() - margin + 10.0;
        painter.line_segment(
            [
                egui::pos2(line_left, base_y + 3.0),
                egui::pos2(line_right, base_y + 3.0),
            ],
            egui::Stroke::new(6.0, egui::Color32::from_rgb(20, 20, 20)),
        );
        painter.line_segment(
            [
                egui::pos2(line_left, base_y + 1.0),
                egui::pos2(line_right, base_y + 1.0),
            ],
            egui::Stroke::new(2.0, egui::Color32::from_rgb(245, 245, 245)),
        );
    }

    fn update_peaks(&mut self, heights: &[f32]) {
        for (i, &height) in heights.iter().enumerate() {
            if height > self.peaks[i] {
                self.peaks[i] = height;
                self.peak_velocities[i] = 0.0;
            } else {
                self.peak_velocities[i] += PEAK_GRAVITY;
                self.peaks[i] = (self.peaks[i] - self.peak_velocities[i]).max(height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peaks_hold_then_fall() {
        let mut view = BarView::new(1);
        view.update_peaks(&[100.0]);
        assert_eq!(view.peaks[0], 100.0);

        view.update_peaks(&[10.0]);
        let first_fall = view.peaks[0];
        assert!(first_fall < 100.0);

        view.update_peaks(&[10.0]);
        assert!(view.peaks[0] < first_fall);
    }

    #[test]
    fn peaks_never_fall_below_current_height() {
        let mut view = BarView::new(1);
        view.update_peaks(&[100.0]);
        for _ in 0..100 {
            view.update_peaks(&[40.0]);
        }
        assert_eq!(view.peaks[0], 40.0);
    }

    #[test]
    fn rainbow_channels_stay_in_range() {
        for i in 0..100 {
            let _ = rainbow_color(i as f32 * 0.1, 0.0);
        }
    }
}
