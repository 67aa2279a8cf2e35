use eframe::egui;
use rand::Rng;

const DRIFT_DIVISOR: f32 = 75.0;

struct Particle {
    x: f32,
    y: f32,
    size: f32,
    dx: f32,
    dy: f32,
    alpha: u8,
}

impl Particle {
    fn random(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        // Size classes 1/2/3, skewed toward small dots.
        let raw_size: f32 = rng.random_range(1.0..12.0);
        let size = if raw_size < 7.0 {
            1.0
        } else if raw_size < 11.0 {
            2.0
        } else {
            3.0
        };

        Self {
            x: rng.random_range(0.0..width.max(1.0)),
            y: rng.random_range(0.0..height.max(1.0)),
            size,
            dx: rng.random_range(1.0..3.0) / DRIFT_DIVISOR * 3.0,
            dy: (rng.random_range(0.0..6.0) - 3.0) / DRIFT_DIVISOR,
            alpha: rng.random_range(100..=255),
        }
    }
}

/// Ambient floating-dot layer behind the bars, drifting slowly rightward and
/// wrapping at the edges.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    pub enabled: bool,
}

impl ParticleSystem {
    pub fn new(count: usize) -> Self {
        let mut system = Self {
            particles: Vec::new(),
            width: 800.0,
            height: 300.0,
            enabled: true,
        };
        system.set_count(count);
        system
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }

    pub fn set_count(&mut self, count: usize) {
        let mut rng = rand::rng();
        while self.particles.len() < count {
            self.particles
                .push(Particle::random(&mut rng, self.width, self.height));
        }
        self.particles.truncate(count);
    }

    /// Scale particle positions when the drawing area changes.
    pub fn fit(&mut self, size: egui::Vec2) {
        if (size.x - self.width).abs() < 0.5 && (size.y - self.height).abs() < 0.5 {
            return;
        }
        let x_scale = if self.width > 0.0 { size.x / self.width } else { 1.0 };
        let y_scale = if self.height > 0.0 { size.y / self.height } else { 1.0 };
        for p in &mut self.particles {
            p.x *= x_scale;
            p.y *= y_scale;
        }
        self.width = size.x;
        self.height = size.y;
    }

    pub fn update(&mut self) {
        if !self.enabled {
            return;
        }
        for p in &mut self.particles {
            p.x += p.dx;
            p.y += p.dy;

            if p.x > self.width {
                p.x = 0.0;
            } else if p.x < 0.0 {
                p.x = self.width;
            }
            if p.y > self.height {
                p.y = 0.0;
            } else if p.y < 0.0 {
                p.y = self.height;
            }
        }
    }

    pub fn draw(&self, painter: &egui::Painter, rect: egui::Rect) {
        if !self.enabled {
            return;
        }
        for p in &self.particles {
            painter.circle_filled(
                rect.min + egui::vec2(p.x, p.y),
                p.size,
                egui::Color32::from_rgba_unmultiplied(245, 245, 245, p.alpha),
            );
        }
    }

    pub fn reset(&mut self) {
        let mut rng = rand::rng();
        for p in &mut self.particles {
            *p = Particle::random(&mut rng, self.width, self.height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_count_grows_and_shrinks() {
        let mut system = ParticleSystem::new(10);
        assert_eq!(system.count(), 10);
        system.set_count(25);
        assert_eq!(system.count(), 25);
        system.set_count(5);
        assert_eq!(system.count(), 5);
    }

    #[test]
    fn particles_stay_in_bounds_after_updates() {
        let mut system = ParticleSystem::new(50);
        for _ in 0..1000 {
            system.update();
        }
        for p in &system.particles {
            assert!(p.x >= 0.0 && p.x <= system.width);
            assert!(p.y >= 0.0 && p.y <= system.height);
        }
    }

    #[test]
    fn disabled_system_does_not_move() {
        let mut system = ParticleSystem::new(5);
        system.enabled = false;
        let before: Vec<(f32, f32)> = system.particles.iter().map(|p| (p.x, p.y)).collect();
        system.update();
        let after: Vec<(f32, f32)> = system.particles.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(before, after);
    }
}
