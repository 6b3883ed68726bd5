//! Cursor splash: short-lived coloured blobs left behind by pointer motion.
//!
//! A lightweight particle field rather than a fluid simulation. Motion
//! spawns one splat per sample, sized by pointer speed; a press spawns a
//! ring burst. Splats drift, slow down and fade out over their lifetime.

use questlog_protocol::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Oldest splats are dropped beyond this count.
    pub max_splats: usize,
    /// Seconds a splat lives.
    pub lifetime: f64,
    pub base_radius: f64,
    pub max_radius: f64,
    /// Extra radius per pixel/second of pointer speed.
    pub speed_scale: f64,
    /// Velocity decay per second, as a fraction.
    pub drag: f64,
    pub burst_count: usize,
    pub burst_speed: f64,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            max_splats: 96,
            lifetime: 1.2,
            base_radius: 6.0,
            max_radius: 36.0,
            speed_scale: 0.015,
            drag: 2.5,
            burst_count: 10,
            burst_speed: 140.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splat {
    pub position: Point,
    pub velocity: Point,
    pub radius: f64,
    /// Seconds since spawn.
    pub age: f64,
    /// Hue in `[0, 1)`.
    pub hue: f64,
}

#[derive(Debug, Clone)]
pub struct SplashField {
    config: SplashConfig,
    splats: Vec<Splat>,
    last_pointer: Option<Point>,
    hue: f64,
}

// Golden-ratio step spreads consecutive hues evenly around the wheel.
const HUE_STEP: f64 = 0.618_033_988_75;

impl SplashField {
    pub fn new(config: SplashConfig) -> Self {
        Self {
            config,
            splats: Vec::new(),
            last_pointer: None,
            hue: 0.0,
        }
    }

    pub fn splats(&self) -> &[Splat] {
        &self.splats
    }

    pub fn is_idle(&self) -> bool {
        self.splats.is_empty()
    }

    /// Pointer sample. `dt` is the time since the previous sample in
    /// seconds and is used to estimate speed.
    pub fn pointer_moved(&mut self, position: Point, dt: f64) {
        let Some(prev) = self.last_pointer.replace(position) else {
            return;
        };
        let delta = Point::new(position.x - prev.x, position.y - prev.y);
        let distance = delta.length();
        if distance <= f64::EPSILON {
            return;
        }
        let dt = dt.max(1e-3);
        let speed = distance / dt;
        let radius = (self.config.base_radius + speed * self.config.speed_scale)
            .min(self.config.max_radius);
        let velocity = Point::new(delta.x / dt * 0.2, delta.y / dt * 0.2);
        self.spawn(position, velocity, radius);
    }

    /// Pointer left the surface; the next move starts a fresh trail.
    pub fn pointer_left(&mut self) {
        self.last_pointer = None;
    }

    /// Ring burst around a press.
    pub fn pointer_pressed(&mut self, position: Point) {
        let n = self.config.burst_count.max(1);
        for i in 0..n {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            let velocity = Point::new(
                angle.cos() * self.config.burst_speed,
                angle.sin() * self.config.burst_speed,
            );
            self.spawn(position, velocity, self.config.base_radius * 1.5);
        }
    }

    /// Age, move and expire splats.
    pub fn step(&mut self, dt: f64) {
        let keep = (1.0 - self.config.drag * dt).clamp(0.0, 1.0);
        for s in &mut self.splats {
            s.age += dt;
            s.position.x += s.velocity.x * dt;
            s.position.y += s.velocity.y * dt;
            s.velocity.x *= keep;
            s.velocity.y *= keep;
        }
        let lifetime = self.config.lifetime;
        self.splats.retain(|s| s.age < lifetime);
    }

    /// Opacity, fading linearly from 1 at spawn to 0 at end of life.
    pub fn alpha(&self, splat: &Splat) -> f64 {
        if self.config.lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - splat.age / self.config.lifetime).clamp(0.0, 1.0)
    }

    pub fn clear(&mut self) {
        self.splats.clear();
        self.last_pointer = None;
    }

    fn spawn(&mut self, position: Point, velocity: Point, radius: f64) {
        self.hue = (self.hue + HUE_STEP).fract();
        self.splats.push(Splat {
            position,
            velocity,
            radius,
            age: 0.0,
            hue: self.hue,
        });
        if self.splats.len() > self.config.max_splats {
            let excess = self.splats.len() - self.config.max_splats;
            self.splats.drain(..excess);
        }
    }
}

impl Default for SplashField {
    fn default() -> Self {
        Self::new(SplashConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_only_anchors() {
        let mut f = SplashField::default();
        f.pointer_moved(Point::new(10.0, 10.0), 0.016);
        assert!(f.is_idle());
        f.pointer_moved(Point::new(20.0, 10.0), 0.016);
        assert_eq!(f.splats().len(), 1);
    }

    #[test]
    fn faster_motion_gives_larger_splat() {
        let mut f = SplashField::default();
        f.pointer_moved(Point::new(0.0, 0.0), 0.016);
        f.pointer_moved(Point::new(2.0, 0.0), 0.016);
        f.pointer_moved(Point::new(40.0, 0.0), 0.016);
        let s = f.splats();
        assert!(s[1].radius > s[0].radius);
        assert!(s[1].radius <= SplashConfig::default().max_radius);
    }

    #[test]
    fn splats_fade_and_expire() {
        let mut f = SplashField::default();
        f.pointer_pressed(Point::new(0.0, 0.0));
        assert_eq!(f.splats().len(), 10);
        f.step(0.6);
        let a = f.alpha(&f.splats()[0]);
        assert!((a - 0.5).abs() < 1e-9);
        f.step(0.7);
        assert!(f.is_idle());
    }

    #[test]
    fn field_is_bounded() {
        let mut f = SplashField::new(SplashConfig {
            max_splats: 5,
            ..SplashConfig::default()
        });
        for _ in 0..4 {
            f.pointer_pressed(Point::new(0.0, 0.0));
        }
        assert_eq!(f.splats().len(), 5);
    }

    #[test]
    fn leaving_breaks_the_trail() {
        let mut f = SplashField::default();
        f.pointer_moved(Point::new(0.0, 0.0), 0.016);
        f.pointer_left();
        f.pointer_moved(Point::new(500.0, 0.0), 0.016);
        assert!(f.is_idle());
    }
}
